//! Prompt Specifications
//!
//! Declarative descriptions of the questions the session asks, plus the
//! [`Prompter`] capability that renders them.
//!
//! # Question Kinds
//! - [`TextPrompt`]: free text, checked by a [`Validator`] and re-asked until it passes
//! - [`ChoicePrompt`]: single choice from a labeled list; never fails validation
//!
//! Prompt values are built fresh for every flow (see [`crate::questions`]) and
//! dropped once answered.

use std::collections::HashMap;
use tracing::debug;

use crate::error::{RosterError, Result};

pub mod terminal;
pub mod validate;

pub use terminal::DialoguerPrompter;

/// Validation predicate for a free-text answer
///
/// Returns the rejection message shown to the operator.
pub type Validator = fn(&str) -> std::result::Result<(), &'static str>;

/// Key carried by an entity choice; `None` is a sentinel such as "No Manager"
pub type Key = Option<i64>;

/// Renders prompts and returns raw answers
///
/// Implementations block until the operator answers. There is no timeout.
pub trait Prompter {
    /// Read one free-text answer for `prompt`
    ///
    /// Implementations may validate inline; [`TextPrompt::ask`] validates again
    /// and calls [`Prompter::rejected`] before asking once more.
    fn text(&mut self, prompt: &TextPrompt) -> Result<String>;

    /// Present `labels` and return the index of the chosen one
    fn select(&mut self, message: &str, labels: &[&str]) -> Result<usize>;

    /// Called when an answer from [`Prompter::text`] was rejected by the validator
    fn rejected(&mut self, prompt: &TextPrompt, reason: &str) {
        debug!(field = prompt.name, reason, "answer rejected");
    }
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn text(&mut self, prompt: &TextPrompt) -> Result<String> {
        (**self).text(prompt)
    }

    fn select(&mut self, message: &str, labels: &[&str]) -> Result<usize> {
        (**self).select(message, labels)
    }

    fn rejected(&mut self, prompt: &TextPrompt, reason: &str) {
        (**self).rejected(prompt, reason);
    }
}

/// A free-text question
#[derive(Debug, Clone)]
pub struct TextPrompt {
    /// Field name the answer is stored under
    pub name: &'static str,
    pub message: &'static str,
    pub validate: Validator,
}

impl TextPrompt {
    pub const fn new(name: &'static str, message: &'static str, validate: Validator) -> Self {
        Self { name, message, validate }
    }

    /// Run the validator, as a `Validation` error carrying its fixed message
    pub fn check(&self, input: &str) -> Result<()> {
        (self.validate)(input).map_err(RosterError::validation)
    }

    /// Ask until the validator accepts, with the same message every time
    pub fn ask<P: Prompter + ?Sized>(&self, prompter: &mut P) -> Result<String> {
        loop {
            let answer = prompter.text(self)?;
            match self.check(&answer) {
                Ok(()) => return Ok(answer),
                Err(e) => prompter.rejected(self, &e.message()),
            }
        }
    }
}

/// One selectable option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption<T> {
    pub label: String,
    pub value: T,
}

impl<T> ChoiceOption<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self { label: label.into(), value }
    }
}

/// A single-choice question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoicePrompt<T> {
    /// Field name the answer is stored under
    pub name: &'static str,
    pub message: String,
    pub options: Vec<ChoiceOption<T>>,
}

impl<T: Clone> ChoicePrompt<T> {
    pub fn new(name: &'static str, message: impl Into<String>, options: Vec<ChoiceOption<T>>) -> Self {
        Self { name, message: message.into(), options }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|option| option.label.as_str()).collect()
    }

    /// Present the options and return the chosen one
    pub fn ask<P: Prompter + ?Sized>(&self, prompter: &mut P) -> Result<ChoiceOption<T>> {
        if self.options.is_empty() {
            return Err(RosterError::invalid_input(format!(
                "No choices available for '{}'",
                self.name
            )));
        }

        let index = prompter.select(&self.message, &self.labels())?;
        self.options.get(index).cloned().ok_or_else(|| {
            RosterError::prompt_failed(format!(
                "Selection {index} is out of range for '{}' ({} options)",
                self.name,
                self.options.len()
            ))
        })
    }
}

/// One entry of a prompt set
#[derive(Debug, Clone)]
pub enum Question {
    Text(TextPrompt),
    Choice(ChoicePrompt<Key>),
}

impl Question {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text(prompt) => prompt.name,
            Self::Choice(prompt) => prompt.name,
        }
    }
}

/// An accepted answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Choice(ChoiceOption<Key>),
}

/// Answers to a prompt set, keyed by field name
#[derive(Debug, Default)]
pub struct Answers {
    values: HashMap<&'static str, Answer>,
}

impl Answers {
    pub fn insert(&mut self, name: &'static str, answer: Answer) {
        self.values.insert(name, answer);
    }

    /// Free-text answer for `name`
    pub fn text(&self, name: &str) -> Result<&str> {
        match self.values.get(name) {
            Some(Answer::Text(text)) => Ok(text.as_str()),
            _ => Err(missing(name, "text")),
        }
    }

    /// Chosen option for `name`
    pub fn choice(&self, name: &str) -> Result<&ChoiceOption<Key>> {
        match self.values.get(name) {
            Some(Answer::Choice(option)) => Ok(option),
            _ => Err(missing(name, "choice")),
        }
    }

    /// Chosen key for `name`; `None` when a sentinel was picked
    pub fn key(&self, name: &str) -> Result<Key> {
        self.choice(name).map(|option| option.value)
    }

    /// Chosen key for `name` in a list without sentinels
    pub fn required_key(&self, name: &str) -> Result<i64> {
        self.key(name)?
            .ok_or_else(|| RosterError::invalid_input(format!("A selection is required for '{name}'")))
    }

    /// Label of the chosen option for `name`
    pub fn label(&self, name: &str) -> Result<&str> {
        self.choice(name).map(|option| option.label.as_str())
    }
}

fn missing(name: &str, kind: &str) -> RosterError {
    RosterError::invalid_input(format!("No {kind} answer recorded for '{name}'"))
}

/// Ask every question in order and collect the answers
pub fn ask_all<P: Prompter + ?Sized>(prompter: &mut P, questions: &[Question]) -> Result<Answers> {
    let mut answers = Answers::default();
    for question in questions {
        let answer = match question {
            Question::Text(prompt) => Answer::Text(prompt.ask(prompter)?),
            Question::Choice(prompt) => Answer::Choice(prompt.ask(prompter)?),
        };
        answers.insert(question.name(), answer);
    }
    Ok(answers)
}
