//! Roster - Interactive Organization Database CLI
//!
//! Roster manages a small organizational dataset (departments, roles and
//! employees) stored in a relational database. The operator moves through
//! hierarchical menus; every flow collects validated input, issues one
//! parameterized statement and returns to the top-level menu.
//!
//! # Architecture
//! - The query catalog ([`Catalog`]) is the only path to the database. Each
//!   engine carries its own SQL text.
//! - Prompts are plain data ([`prompt`], [`questions`]) rendered by a
//!   [`Prompter`]; choice lists are rebuilt from live rows before each prompt.
//! - The [`Session`] drives the menu state machine ([`menu`]) and writes
//!   results through a [`Console`].
//!
//! # Module Organization
//! - [`error`] - Error types and handling
//! - [`model`] - Entity and projection records
//! - [`engine`] - Query catalog trait and engine implementations
//! - [`prompt`] - Prompt specifications, validators and the terminal prompter
//! - [`choice`] - Choice-list builder and sentinel options
//! - [`questions`] - Prompt sets for each flow
//! - [`menu`] - Categories, actions and session states
//! - [`output`] - Tables and status lines
//! - [`session`] - The interactive session
//! - [`seed`] - Sample data
//! - [`config`] - Connection resolution and stored connections

pub mod choice;
pub mod config;
pub mod engine;
pub mod error;
pub mod menu;
pub mod model;
pub mod output;
pub mod prompt;
pub mod questions;
pub mod seed;
pub mod session;

// Re-export commonly used types for convenience
pub use config::{
    list_connections, resolve_connection, save_connection, ConfigLocation, ConnectionOverrides,
    ConnectionRegistry, StoredConnection,
};
pub use engine::{Catalog, ConnectionConfig, DatabaseType};
pub use error::{Result, RosterError};
pub use menu::{Action, Category, State};
pub use model::{
    ChoiceRow, Department, DepartmentBudget, EmployeeListing, NewEmployee, NewRole, RoleListing,
};
pub use output::{Console, Status, Table, TerminalConsole};
pub use prompt::{DialoguerPrompter, Prompter};
pub use session::Session;

#[cfg(feature = "mysql")]
pub use engine::mysql::MySqlEngine;
#[cfg(feature = "sqlite")]
pub use engine::sqlite::SqliteEngine;
