//! Shared fakes and fixtures for the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use roster::output::{Console, Status, Table};
use roster::prompt::{Prompter, TextPrompt};
use roster::{
    Catalog, ChoiceRow, ConnectionConfig, DatabaseType, Department, DepartmentBudget,
    EmployeeListing, NewEmployee, NewRole, RoleListing, RosterError, SqliteEngine,
};
use tempfile::TempDir;

// ============================================================================
// Scripted Prompter
// ============================================================================

/// One scripted operator answer
#[derive(Debug, Clone)]
pub enum Step {
    /// Type this text
    Type(&'static str),
    /// Pick the option with this label
    Pick(&'static str),
}

pub use Step::{Pick, Type};

/// Answers prompts from a fixed script
///
/// Fails with `PromptFailed` when the script runs out or a step does not fit
/// the prompt, the same way a closed terminal would.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    script: VecDeque<Step>,
    /// Message of every prompt shown, in order
    pub asked: Vec<String>,
    /// Labels of every choice prompt shown, in order
    pub menus: Vec<Vec<String>>,
    /// Validation messages for rejected answers
    pub rejections: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(script: impl IntoIterator<Item = Step>) -> Self {
        Self { script: script.into_iter().collect(), ..Default::default() }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Labels shown by the choice prompt with `message`
    pub fn menu_for(&self, message: &str) -> Option<&Vec<String>> {
        let choice_messages = self.asked.iter().filter(|asked| !asked.starts_with("text:"));
        choice_messages.zip(&self.menus).find(|(asked, _)| *asked == message).map(|(_, menu)| menu)
    }
}

impl Prompter for ScriptedPrompter {
    fn text(&mut self, prompt: &TextPrompt) -> roster::Result<String> {
        self.asked.push(format!("text:{}", prompt.message));
        match self.script.pop_front() {
            Some(Step::Type(answer)) => Ok(answer.to_string()),
            Some(other) => Err(RosterError::prompt_failed(format!(
                "expected text for '{}', script has {other:?}",
                prompt.message
            ))),
            None => Err(RosterError::prompt_failed("script exhausted")),
        }
    }

    fn select(&mut self, message: &str, labels: &[&str]) -> roster::Result<usize> {
        self.asked.push(message.to_string());
        self.menus.push(labels.iter().map(|label| (*label).to_string()).collect());
        match self.script.pop_front() {
            Some(Step::Pick(wanted)) => labels.iter().position(|label| *label == wanted).ok_or_else(|| {
                RosterError::prompt_failed(format!("'{wanted}' is not among {labels:?}"))
            }),
            Some(other) => Err(RosterError::prompt_failed(format!(
                "expected a pick for '{message}', script has {other:?}"
            ))),
            None => Err(RosterError::prompt_failed("script exhausted")),
        }
    }

    fn rejected(&mut self, _prompt: &TextPrompt, reason: &str) {
        self.rejections.push(reason.to_string());
    }
}

// ============================================================================
// Recording Console
// ============================================================================

#[derive(Debug, Default)]
pub struct RecordingConsole {
    pub tables: Vec<Table>,
    pub statuses: Vec<(Status, String)>,
}

impl RecordingConsole {
    pub fn messages(&self, status: Status) -> Vec<&str> {
        self.statuses
            .iter()
            .filter(|(s, _)| *s == status)
            .map(|(_, message)| message.as_str())
            .collect()
    }
}

impl Console for RecordingConsole {
    fn table(&mut self, table: &Table) {
        self.tables.push(table.clone());
    }

    fn status(&mut self, status: Status, message: &str) {
        self.statuses.push((status, message.to_string()));
    }
}

// ============================================================================
// Close-Counting Catalog
// ============================================================================

/// Delegates to a [`SqliteEngine`] and counts calls to [`Catalog::close`]
pub struct CountingCatalog {
    inner: SqliteEngine,
    closes: Arc<AtomicUsize>,
}

impl CountingCatalog {
    /// Wrap `inner`; the returned counter outlives the catalog
    pub fn new(inner: SqliteEngine) -> (Self, Arc<AtomicUsize>) {
        let closes = Arc::new(AtomicUsize::new(0));
        (Self { inner, closes: Arc::clone(&closes) }, closes)
    }
}

pub fn close_count(closes: &AtomicUsize) -> usize {
    closes.load(Ordering::SeqCst)
}

impl Catalog for CountingCatalog {
    fn engine(&self) -> DatabaseType {
        self.inner.engine()
    }

    async fn server_version(&mut self) -> roster::Result<String> {
        self.inner.server_version().await
    }

    async fn ensure_schema(&mut self) -> roster::Result<()> {
        self.inner.ensure_schema().await
    }

    async fn list_departments(&mut self) -> roster::Result<Vec<Department>> {
        self.inner.list_departments().await
    }

    async fn insert_department(&mut self, name: &str) -> roster::Result<i64> {
        self.inner.insert_department(name).await
    }

    async fn delete_department(&mut self, id: i64) -> roster::Result<()> {
        self.inner.delete_department(id).await
    }

    async fn list_roles(&mut self) -> roster::Result<Vec<RoleListing>> {
        self.inner.list_roles().await
    }

    async fn insert_role(&mut self, role: &NewRole) -> roster::Result<i64> {
        self.inner.insert_role(role).await
    }

    async fn delete_role(&mut self, id: i64) -> roster::Result<()> {
        self.inner.delete_role(id).await
    }

    async fn list_employees(&mut self) -> roster::Result<Vec<EmployeeListing>> {
        self.inner.list_employees().await
    }

    async fn list_employees_by_manager(&mut self, manager_id: i64) -> roster::Result<Vec<EmployeeListing>> {
        self.inner.list_employees_by_manager(manager_id).await
    }

    async fn list_employees_by_department(
        &mut self,
        department_id: i64,
    ) -> roster::Result<Vec<EmployeeListing>> {
        self.inner.list_employees_by_department(department_id).await
    }

    async fn insert_employee(&mut self, employee: &NewEmployee) -> roster::Result<i64> {
        self.inner.insert_employee(employee).await
    }

    async fn update_employee_role(&mut self, employee_id: i64, role_id: i64) -> roster::Result<()> {
        self.inner.update_employee_role(employee_id, role_id).await
    }

    async fn update_employee_manager(
        &mut self,
        employee_id: i64,
        manager_id: Option<i64>,
    ) -> roster::Result<()> {
        self.inner.update_employee_manager(employee_id, manager_id).await
    }

    async fn list_managers(&mut self) -> roster::Result<Vec<ChoiceRow>> {
        self.inner.list_managers().await
    }

    async fn list_employee_names(&mut self) -> roster::Result<Vec<ChoiceRow>> {
        self.inner.list_employee_names().await
    }

    async fn list_role_titles(&mut self) -> roster::Result<Vec<ChoiceRow>> {
        self.inner.list_role_titles().await
    }

    async fn list_department_names(&mut self) -> roster::Result<Vec<ChoiceRow>> {
        self.inner.list_department_names().await
    }

    async fn department_budgets(&mut self) -> roster::Result<Vec<DepartmentBudget>> {
        self.inner.department_budgets().await
    }

    async fn close(self) -> roster::Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.close().await
    }
}

// ============================================================================
// Database Fixtures
// ============================================================================

pub fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("employees.db")
}

/// Open (creating if needed) the database at `path` with the tables in place
pub async fn open(path: &Path) -> SqliteEngine {
    let mut engine = SqliteEngine::open(&ConnectionConfig::sqlite(path.to_path_buf()))
        .expect("Failed to open test database");
    engine.ensure_schema().await.expect("Failed to create tables");
    engine
}

pub async fn department(engine: &mut SqliteEngine, name: &str) -> i64 {
    engine.insert_department(name).await.expect("Failed to insert department")
}

pub async fn role(engine: &mut SqliteEngine, title: &str, salary: i64, department_id: Option<i64>) -> i64 {
    let role = NewRole { title: title.to_string(), salary, department_id };
    engine.insert_role(&role).await.expect("Failed to insert role")
}

pub async fn employee(
    engine: &mut SqliteEngine,
    first_name: &str,
    last_name: &str,
    role_id: i64,
    manager_id: Option<i64>,
) -> i64 {
    let employee = NewEmployee {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        role_id,
        manager_id,
    };
    engine.insert_employee(&employee).await.expect("Failed to insert employee")
}
