//! Interactive terminal prompter backed by `dialoguer`

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use tracing::debug;

use super::{Prompter, TextPrompt};
use crate::error::{RosterError, Result};

/// Renders prompts on the controlling terminal
///
/// Validation messages are shown inline beneath the question, and the question
/// stays on screen until the answer passes.
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self { theme: ColorfulTheme::default() }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn text(&mut self, prompt: &TextPrompt) -> Result<String> {
        let validate = prompt.validate;
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt.message)
            .allow_empty(true)
            .validate_with(move |input: &String| validate(input))
            .interact_text()
            .map_err(|e| RosterError::prompt_failed(format!("{}: {e}", prompt.name)))
    }

    fn select(&mut self, message: &str, labels: &[&str]) -> Result<usize> {
        debug!(message, options = labels.len(), "presenting choice");
        Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(labels)
            .default(0)
            .interact()
            .map_err(|e| RosterError::prompt_failed(format!("{message}: {e}")))
    }
}
