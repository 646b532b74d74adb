//! Database Engine Traits and Core Types
//!
//! This module defines the query catalog every engine exposes.
//! Each engine (`MySQL`, `SQLite`) implements the [`Catalog`] trait over one
//! long-lived connection.
//!
//! # Session-Scoped Connection
//! An engine is opened once at startup and owned by the session. All catalog
//! methods run against that connection, one at a time. [`Catalog::close`]
//! consumes the engine, so the connection cannot be closed twice or used after
//! closing.
//!
//! # Engine Isolation
//! Each engine implementation is completely independent and carries its own SQL
//! text. No shared SQL helpers or cross-engine abstractions. Every statement is
//! a compile-time constant; user-supplied values are always bound parameters.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::Result;
use crate::model::{
    ChoiceRow, Department, DepartmentBudget, EmployeeListing, NewEmployee, NewRole, RoleListing,
};

// Engine-specific implementations
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "mysql")]
pub mod mysql;

/// Supported database engine types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// `MySQL` database (includes `MariaDB`)
    MySQL,
    /// `SQLite` database
    SQLite,
}

impl DatabaseType {
    /// Get the engine name as a string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MySQL => "mysql",
            Self::SQLite => "sqlite",
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DatabaseType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Self::MySQL),
            "sqlite" | "sqlite3" => Ok(Self::SQLite),
            other => Err(format!("Unknown database engine '{other}' (expected mysql or sqlite)")),
        }
    }
}

/// Connection configuration for database engines
///
/// Fields are engine-specific (e.g., `file` only applies to `SQLite`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Database engine type
    pub engine: DatabaseType,

    /// Hostname (for mysql)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Port number (for mysql)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Username (for mysql)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Password (for mysql)
    /// WARNING: Sensitive data. Never serialized, never logged.
    #[serde(skip)]
    pub password: Option<String>,

    /// Database name (for mysql)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Database file path (for sqlite)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl ConnectionConfig {
    /// Create a new `MySQL` connection config
    #[must_use]
    pub const fn mysql(
        host: String,
        port: u16,
        user: String,
        password: String,
        database: String,
    ) -> Self {
        Self {
            engine: DatabaseType::MySQL,
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password: Some(password),
            database: Some(database),
            file: None,
        }
    }

    /// Create a new `SQLite` connection config
    #[must_use]
    pub const fn sqlite(file: PathBuf) -> Self {
        Self {
            engine: DatabaseType::SQLite,
            host: None,
            port: None,
            user: None,
            password: None,
            database: None,
            file: Some(file),
        }
    }

    /// Short description safe for logs (no credentials)
    #[must_use]
    pub fn describe(&self) -> String {
        match self.engine {
            DatabaseType::MySQL => format!(
                "mysql://{}@{}:{}/{}",
                self.user.as_deref().unwrap_or("?"),
                self.host.as_deref().unwrap_or("?"),
                self.port.map_or_else(|| "?".to_string(), |p| p.to_string()),
                self.database.as_deref().unwrap_or("?"),
            ),
            DatabaseType::SQLite => format!(
                "sqlite://{}",
                self.file.as_ref().map_or_else(|| "?".to_string(), |f| f.display().to_string())
            ),
        }
    }
}

/// The query catalog
///
/// Every read and write the session issues is one named method here. Reads
/// return typed projections; inserts return the new row id.
///
/// Delete operations reject the delete with
/// [`RosterError::ReferentialIntegrity`](crate::RosterError::ReferentialIntegrity)
/// while dependent rows exist.
pub trait Catalog {
    /// Engine behind this catalog
    fn engine(&self) -> DatabaseType;

    /// Server version string, used as a connection probe
    fn server_version(&mut self) -> impl Future<Output = Result<String>> + Send;

    /// Create the three tables if they do not exist yet
    fn ensure_schema(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// All departments ordered by name
    fn list_departments(&mut self) -> impl Future<Output = Result<Vec<Department>>> + Send;

    fn insert_department(&mut self, name: &str) -> impl Future<Output = Result<i64>> + Send;

    fn delete_department(&mut self, id: i64) -> impl Future<Output = Result<()>> + Send;

    /// Roles outer-joined to departments, ordered by department then salary
    fn list_roles(&mut self) -> impl Future<Output = Result<Vec<RoleListing>>> + Send;

    fn insert_role(&mut self, role: &NewRole) -> impl Future<Output = Result<i64>> + Send;

    fn delete_role(&mut self, id: i64) -> impl Future<Output = Result<()>> + Send;

    /// Employees ordered by department ascending, salary descending
    fn list_employees(&mut self) -> impl Future<Output = Result<Vec<EmployeeListing>>> + Send;

    /// Direct reports of one manager; empty when there are none
    fn list_employees_by_manager(
        &mut self,
        manager_id: i64,
    ) -> impl Future<Output = Result<Vec<EmployeeListing>>> + Send;

    /// Employees whose role belongs to one department; empty when there are none
    fn list_employees_by_department(
        &mut self,
        department_id: i64,
    ) -> impl Future<Output = Result<Vec<EmployeeListing>>> + Send;

    fn insert_employee(
        &mut self,
        employee: &NewEmployee,
    ) -> impl Future<Output = Result<i64>> + Send;

    /// Point exactly one employee at a new role
    fn update_employee_role(
        &mut self,
        employee_id: i64,
        role_id: i64,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Set or clear exactly one employee's manager
    ///
    /// No cycle check is performed.
    fn update_employee_manager(
        &mut self,
        employee_id: i64,
        manager_id: Option<i64>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Employees with no manager, labeled "First Last (Title)"
    fn list_managers(&mut self) -> impl Future<Output = Result<Vec<ChoiceRow>>> + Send;

    /// Every employee, labeled "First Last (Title)"
    fn list_employee_names(&mut self) -> impl Future<Output = Result<Vec<ChoiceRow>>> + Send;

    fn list_role_titles(&mut self) -> impl Future<Output = Result<Vec<ChoiceRow>>> + Send;

    fn list_department_names(&mut self) -> impl Future<Output = Result<Vec<ChoiceRow>>> + Send;

    /// Headcount and summed employee salaries per department
    fn department_budgets(&mut self)
        -> impl Future<Output = Result<Vec<DepartmentBudget>>> + Send;

    /// Close the connection
    fn close(self) -> impl Future<Output = Result<()>> + Send
    where
        Self: Sized;
}
