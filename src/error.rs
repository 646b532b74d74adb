//! Error Handling Infrastructure
//!
//! This module defines all error types used throughout roster.
//! Every error maps to a stable error code and a human-readable message that is
//! shown to the operator as a status line.
//!
//! # Error Categories
//! - `Validation`: Rejected operator input (recovered by re-prompting)
//! - `QueryFailed`: Any failure reported by the persistence boundary
//! - `ReferentialIntegrity`: A query failure caused by dependent rows
//! - `ConnectionFailed`: Database connection errors
//! - `InvalidInput`: Input that passed its prompt but cannot be used
//! - `EngineError`: Engine-specific database errors
//! - `ConfigError`: Configuration file or connection registry errors
//! - `PromptFailed`: The interactive terminal itself failed

use thiserror::Error;

/// Main error type for roster operations
#[derive(Error, Debug)]
pub enum RosterError {
    /// Operator input rejected by a prompt validator
    #[error("{0}")]
    Validation(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Delete or insert blocked by rows that reference (or are referenced by) the target
    #[error("Referential integrity: {0}")]
    ReferentialIntegrity(String),

    /// Database connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid input or missing required parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Engine-specific database error
    #[error("Engine error ({engine}): {detail}")]
    EngineError { engine: String, detail: String },

    /// Configuration error (file not found, invalid JSON, etc.)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The prompt renderer could not read an answer
    #[error("Prompt failed: {0}")]
    PromptFailed(String),
}

impl RosterError {
    /// Convert error to a stable error code string
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::QueryFailed(_) => "QUERY_FAILED",
            Self::ReferentialIntegrity(_) => "REFERENTIAL_INTEGRITY",
            Self::ConnectionFailed(_) => "CONNECTION_FAILED",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::EngineError { .. } => "ENGINE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::PromptFailed(_) => "PROMPT_FAILED",
        }
    }

    /// Get human-readable error message
    ///
    /// Never contains credentials.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Whether this error came from the persistence boundary
    #[must_use]
    pub const fn is_query_error(&self) -> bool {
        matches!(
            self,
            Self::QueryFailed(_)
                | Self::ReferentialIntegrity(_)
                | Self::ConnectionFailed(_)
                | Self::EngineError { .. }
        )
    }

    /// Whether the session can report this error and return to the top-level menu
    ///
    /// Prompt failures mean nobody can answer the next menu, and configuration
    /// errors happen before a session exists.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::PromptFailed(_) | Self::ConfigError(_))
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a query failed error
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self::QueryFailed(message.into())
    }

    /// Create a referential integrity error
    pub fn referential_integrity(message: impl Into<String>) -> Self {
        Self::ReferentialIntegrity(message.into())
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed(message.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an engine-specific error
    pub fn engine_error(engine: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::EngineError { engine: engine.into(), detail: detail.into() }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a prompt failure error
    pub fn prompt_failed(message: impl Into<String>) -> Self {
        Self::PromptFailed(message.into())
    }
}

/// Result type alias for roster operations
pub type Result<T> = std::result::Result<T, RosterError>;
