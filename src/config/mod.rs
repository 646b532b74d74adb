//! Configuration Management
//!
//! Resolves the database connection for a run and stores named connections.
//!
//! # Configuration Locations
//! - Local: `.roster/config.json` (per working directory)
//! - Global: `<config dir>/roster/connections.json` (per user)
//!
//! # Resolution Precedence
//! 1. Command-line flags (highest priority)
//! 2. Named stored connection (`--connection`, or the registry default)
//! 3. Environment (`DB_ENGINE`, `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASS`,
//!    `DB_NAME`, `DB_FILE`), after `.env` has been loaded
//!
//! # Passwords
//! Passwords are never written to disk. A stored connection names the
//! environment variable that holds its password (`password_env`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::engine::{ConnectionConfig, DatabaseType};
use crate::error::{Result, RosterError};

pub const ENV_ENGINE: &str = "DB_ENGINE";
pub const ENV_HOST: &str = "DB_HOST";
pub const ENV_PORT: &str = "DB_PORT";
pub const ENV_USER: &str = "DB_USER";
pub const ENV_PASSWORD: &str = "DB_PASS";
pub const ENV_DATABASE: &str = "DB_NAME";
pub const ENV_FILE: &str = "DB_FILE";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_USER: &str = "root";
pub const DEFAULT_DATABASE: &str = "employees_db";
pub const DEFAULT_FILE: &str = "employees.db";

/// Named connections plus an optional default
///
/// Example:
/// ```json
/// {
///   "connections": {
///     "local": { "engine": "sqlite", "file": "employees.db" },
///     "office": { "engine": "mysql", "host": "db", "port": 3306, "user": "hr",
///                 "database": "employees_db", "password_env": "HR_DB_PASS" }
///   },
///   "default": "local"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRegistry {
    #[serde(default)]
    pub connections: BTreeMap<String, StoredConnection>,

    /// Name of the default connection (must exist in `connections`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// A connection as written to a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConnection {
    #[serde(flatten)]
    pub config: ConnectionConfig,

    /// Environment variable holding the password (`DB_PASS` when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,
}

impl StoredConnection {
    /// Fill in the password from the environment
    ///
    /// A missing variable leaves the password unset; servers that require one
    /// will refuse the connection.
    pub fn resolve(&self, lookup: impl Fn(&str) -> Option<String>) -> ConnectionConfig {
        let mut config = self.config.clone();
        let var = self.password_env.as_deref().unwrap_or(ENV_PASSWORD);
        config.password = lookup(var);
        if config.password.is_none() && config.engine == DatabaseType::MySQL {
            warn!(variable = var, "password variable is not set; connecting without a password");
        }
        config
    }
}

/// Configuration file location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLocation {
    Local,
    Global,
}

/// Values given on the command line; each one wins over every other source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionOverrides {
    pub engine: Option<DatabaseType>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub database: Option<String>,
    pub file: Option<PathBuf>,
}

impl ConnectionOverrides {
    fn apply(&self, config: &mut ConnectionConfig) {
        if let Some(engine) = self.engine {
            config.engine = engine;
        }
        if let Some(host) = &self.host {
            config.host = Some(host.clone());
        }
        if let Some(port) = self.port {
            config.port = Some(port);
        }
        if let Some(user) = &self.user {
            config.user = Some(user.clone());
        }
        if let Some(database) = &self.database {
            config.database = Some(database.clone());
        }
        if let Some(file) = &self.file {
            config.file = Some(file.clone());
        }
    }
}

/// Get path to local config file (`.roster/config.json`)
pub fn local_config_path() -> Result<PathBuf> {
    let current_dir = std::env::current_dir().map_err(|e| {
        RosterError::config_error(format!("Could not determine current directory: {e}"))
    })?;

    Ok(current_dir.join(".roster").join("config.json"))
}

/// Get path to global config file (`<config dir>/roster/connections.json`)
pub fn global_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| RosterError::config_error("Could not determine user config directory"))?;

    Ok(config_dir.join("roster").join("connections.json"))
}

fn location_path(location: ConfigLocation) -> Result<PathBuf> {
    match location {
        ConfigLocation::Local => local_config_path(),
        ConfigLocation::Global => global_config_path(),
    }
}

/// Load a registry file; a missing file is an empty registry
pub fn load_registry(path: &Path) -> Result<ConnectionRegistry> {
    if !path.exists() {
        return Ok(ConnectionRegistry::default());
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RosterError::config_error(format!("Could not read config file {}: {e}", path.display()))
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        RosterError::config_error(format!("Invalid config file {}: {e}", path.display()))
    })
}

/// Write a registry file, creating its directory
pub fn save_registry(path: &Path, registry: &ConnectionRegistry) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            RosterError::config_error(format!("Could not create config directory: {e}"))
        })?;
    }

    let contents = serde_json::to_string_pretty(registry)
        .map_err(|e| RosterError::config_error(format!("Could not serialize config: {e}")))?;

    fs::write(path, contents)
        .map_err(|e| RosterError::config_error(format!("Could not write config file: {e}")))
}

/// Merge two registries; `local` wins for connections with the same name and
/// for the default pointer
#[must_use]
pub fn merge(global: ConnectionRegistry, local: ConnectionRegistry) -> ConnectionRegistry {
    let mut merged = global;
    merged.connections.extend(local.connections);
    if local.default.is_some() {
        merged.default = local.default;
    }
    merged
}

/// Load the local and global files and merge them
pub fn load_merged(local: &Path, global: &Path) -> Result<ConnectionRegistry> {
    Ok(merge(load_registry(global)?, load_registry(local)?))
}

/// Merged view of the standard local and global files
pub fn load_with_precedence() -> Result<ConnectionRegistry> {
    load_merged(&local_config_path()?, &global_config_path()?)
}

/// Connection described by the environment alone
pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<ConnectionConfig> {
    let engine = match lookup(ENV_ENGINE) {
        Some(value) => value
            .parse::<DatabaseType>()
            .map_err(|e| RosterError::config_error(format!("{ENV_ENGINE}: {e}")))?,
        None => DatabaseType::MySQL,
    };

    let mut config = match engine {
        DatabaseType::SQLite => ConnectionConfig::sqlite(PathBuf::new()),
        DatabaseType::MySQL => ConnectionConfig {
            engine,
            host: None,
            port: None,
            user: None,
            password: lookup(ENV_PASSWORD),
            database: None,
            file: None,
        },
    };
    fill_from_env(&mut config, &lookup)?;
    Ok(config)
}

/// Fill the fields `config.engine` needs that are still unset
fn fill_from_env(
    config: &mut ConnectionConfig,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<()> {
    match config.engine {
        DatabaseType::MySQL => {
            if config.host.is_none() {
                config.host = Some(lookup(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string()));
            }
            if config.port.is_none() {
                config.port = Some(match lookup(ENV_PORT) {
                    Some(port) => port.trim().parse::<u16>().map_err(|e| {
                        RosterError::config_error(format!("{ENV_PORT} '{port}' is not a port: {e}"))
                    })?,
                    None => DEFAULT_PORT,
                });
            }
            if config.user.is_none() {
                config.user = Some(lookup(ENV_USER).unwrap_or_else(|| DEFAULT_USER.to_string()));
            }
            if config.database.is_none() {
                config.database =
                    Some(lookup(ENV_DATABASE).unwrap_or_else(|| DEFAULT_DATABASE.to_string()));
            }
        }
        DatabaseType::SQLite => {
            let unset = config.file.as_ref().map_or(true, |f| f.as_os_str().is_empty());
            if unset {
                config.file = Some(PathBuf::from(
                    lookup(ENV_FILE).unwrap_or_else(|| DEFAULT_FILE.to_string()),
                ));
            }
        }
    }
    Ok(())
}

/// Resolve the connection for this run against an already loaded registry
///
/// `name` picks a stored connection; without it the registry default is used,
/// and without a default the environment describes the connection.
pub fn resolve_with(
    registry: &ConnectionRegistry,
    name: Option<&str>,
    overrides: &ConnectionOverrides,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ConnectionConfig> {
    let chosen = name.or(registry.default.as_deref());

    let mut config = match chosen {
        Some(chosen) => {
            let stored = registry.connections.get(chosen).ok_or_else(|| {
                let available: Vec<_> = registry.connections.keys().collect();
                RosterError::config_error(format!(
                    "Connection '{chosen}' not found. Available connections: {available:?}"
                ))
            })?;
            debug!(connection = chosen, "using stored connection");
            stored.resolve(&lookup)
        }
        None => from_env_with(&lookup)?,
    };

    let engine_before = config.engine;
    overrides.apply(&mut config);
    if config.engine == DatabaseType::MySQL && engine_before != DatabaseType::MySQL {
        config.password = lookup(ENV_PASSWORD);
    }
    fill_from_env(&mut config, &lookup)?;

    debug!(connection = %config.describe(), "resolved connection");
    Ok(config)
}

/// Resolve the connection for this run from files and the process environment
pub fn resolve_connection(
    name: Option<&str>,
    overrides: &ConnectionOverrides,
) -> Result<ConnectionConfig> {
    let registry = load_with_precedence()?;
    resolve_with(&registry, name, overrides, |key| std::env::var(key).ok())
}

/// Store `config` under `name` in the registry file at `path`
///
/// The first connection stored in a file becomes its default.
pub fn save_connection_to(
    path: &Path,
    name: &str,
    config: ConnectionConfig,
    password_env: Option<String>,
) -> Result<()> {
    let mut registry = load_registry(path)?;

    let is_first_connection = registry.connections.is_empty();
    registry.connections.insert(name.to_string(), StoredConnection { config, password_env });
    if is_first_connection {
        registry.default = Some(name.to_string());
    }

    save_registry(path, &registry)
}

/// Store `config` under `name` at `location`; returns the file written
pub fn save_connection(
    name: &str,
    config: ConnectionConfig,
    password_env: Option<String>,
    location: ConfigLocation,
) -> Result<PathBuf> {
    let path = location_path(location)?;
    save_connection_to(&path, name, config, password_env)?;
    Ok(path)
}

/// One stored connection as listed by `roster connections`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSummary {
    pub name: String,
    pub target: String,
    pub is_default: bool,
}

/// Summaries of every stored connection, ordered by name
#[must_use]
pub fn summarize(registry: &ConnectionRegistry) -> Vec<ConnectionSummary> {
    registry
        .connections
        .iter()
        .map(|(name, stored)| ConnectionSummary {
            name: name.clone(),
            target: stored.config.describe(),
            is_default: registry.default.as_deref() == Some(name.as_str()),
        })
        .collect()
}

/// Summaries from the merged local and global files
pub fn list_connections() -> Result<Vec<ConnectionSummary>> {
    Ok(summarize(&load_with_precedence()?))
}
