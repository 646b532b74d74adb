//! Console Output
//!
//! Tables and status lines shown to the operator. Catalog projections become
//! [`Table`]s through [`TableRow`]; display column labels and the salary
//! display format live here, never in the catalog.
//!
//! # Status Colors
//! - `Success`: green
//! - `Removed`, `Failure`: red (failures go to stderr)
//! - `Info`: cyan
//! - `Farewell`: blue

use dialoguer::console::style;
use std::io::{self, Write};

use crate::config::ConnectionSummary;
use crate::model::{Department, DepartmentBudget, EmployeeListing, RoleListing};

/// A rendered-to-be grid of text cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_rows<R: TableRow>(rows: &[R]) -> Self {
        Self {
            headers: R::HEADERS.to_vec(),
            rows: rows.iter().map(TableRow::cells).collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A projection that can be shown as one table row
pub trait TableRow {
    const HEADERS: &'static [&'static str];

    /// One cell per header, in header order
    fn cells(&self) -> Vec<String>;
}

impl TableRow for Department {
    const HEADERS: &'static [&'static str] = &["id", "name"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone()]
    }
}

impl TableRow for RoleListing {
    const HEADERS: &'static [&'static str] = &["id", "title", "salary", "department"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            format_salary(self.salary),
            optional(self.department.as_deref()),
        ]
    }
}

impl TableRow for EmployeeListing {
    const HEADERS: &'static [&'static str] =
        &["id", "full name", "job title", "salary", "department", "manager"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.full_name.clone(),
            optional(self.job_title.as_deref()),
            self.salary.map(format_salary).unwrap_or_default(),
            optional(self.department.as_deref()),
            optional(self.manager.as_deref()),
        ]
    }
}

impl TableRow for DepartmentBudget {
    const HEADERS: &'static [&'static str] = &["id", "department", "employees", "utilized budget"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.headcount.to_string(),
            format_salary(self.utilized_budget),
        ]
    }
}

impl TableRow for ConnectionSummary {
    const HEADERS: &'static [&'static str] = &["name", "connection", "default"];

    fn cells(&self) -> Vec<String> {
        let default = if self.is_default { "*" } else { "" };
        vec![self.name.clone(), self.target.clone(), default.to_string()]
    }
}

fn optional(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// Display a stored salary in thousands, e.g. `85000` as `$85 K`
///
/// Fractional thousands keep only significant digits: `85500` is `$85.5 K`.
#[must_use]
pub fn format_salary(salary: i64) -> String {
    let sign = if salary < 0 { "-" } else { "" };
    let amount = salary.unsigned_abs();
    let (thousands, rest) = (amount / 1000, amount % 1000);
    if rest == 0 {
        format!("{sign}${thousands} K")
    } else {
        let fraction = format!("{rest:03}");
        format!("{sign}${thousands}.{} K", fraction.trim_end_matches('0'))
    }
}

/// Render `table` as an ASCII grid
///
/// Column width is the widest cell (or header) counted in characters.
#[must_use]
pub fn render_table(table: &Table) -> String {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };

    let mut out = Vec::with_capacity(table.rows.len() + 4);
    out.push(border.clone());
    out.push(render_line(&widths, table.headers.iter().copied()));
    out.push(border.clone());
    for row in &table.rows {
        out.push(render_line(&widths, row.iter().map(String::as_str)));
    }
    if !table.is_empty() {
        out.push(border);
    }
    out.join("\n")
}

fn render_line<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for (width, cell) in widths.iter().zip(cells) {
        let padding = width - cell.chars().count();
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(padding + 1));
        line.push('|');
    }
    line
}

/// Kind of status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A row was added or updated
    Success,
    /// A row was deleted
    Removed,
    /// Nothing to show or nothing to do
    Info,
    /// Session end
    Farewell,
    /// A flow failed; the session continues
    Failure,
}

/// Sink for everything the session shows besides prompts
pub trait Console {
    fn table(&mut self, table: &Table);

    fn status(&mut self, status: Status, message: &str);
}

impl<C: Console + ?Sized> Console for &mut C {
    fn table(&mut self, table: &Table) {
        (**self).table(table);
    }

    fn status(&mut self, status: Status, message: &str) {
        (**self).status(status, message);
    }
}

/// Writes tables and colored status lines to the terminal
#[derive(Debug, Default)]
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn table(&mut self, table: &Table) {
        let mut stdout = io::stdout().lock();
        // Output errors (closed pipe) are not worth ending the session over
        let _ = writeln!(stdout, "\n{}\n", render_table(table));
    }

    fn status(&mut self, status: Status, message: &str) {
        let styled = match status {
            Status::Success => style(message).green(),
            Status::Removed | Status::Failure => style(message).red(),
            Status::Info => style(message).cyan(),
            Status::Farewell => style(message).blue(),
        };
        if status == Status::Failure {
            let _ = writeln!(io::stderr().lock(), "{styled}");
        } else {
            let _ = writeln!(io::stdout().lock(), "{styled}");
        }
    }
}
