//! Roster CLI Entry Point
//!
//! Subcommands:
//! - `run` (default) - Interactive menu session
//! - `init` - Create the tables, optionally loading sample data
//! - `connect` - Validate the resolved connection and store it by name
//! - `connections` - List stored connections
//!
//! Tables and status lines go to stdout, prompts and logs to stderr.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use roster::config::{self, ConfigLocation, ConnectionOverrides};
use roster::output::{render_table, Console, Status, Table, TerminalConsole};
use roster::{seed, Catalog, ConnectionConfig, DatabaseType, DialoguerPrompter, Session};

#[cfg(feature = "mysql")]
use roster::MySqlEngine;
#[cfg(feature = "sqlite")]
use roster::SqliteEngine;

/// Roster - manage departments, roles and employees from the terminal
#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Interactive menu-driven CLI for managing departments, roles and employees")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Connection selection, shared by every subcommand
#[derive(Args)]
struct ConnectionArgs {
    /// Stored connection to use (defaults to the registry default)
    #[arg(long, global = true)]
    connection: Option<String>,

    /// Database engine: mysql or sqlite
    #[arg(long, global = true)]
    engine: Option<DatabaseType>,

    /// Server host (mysql)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Server port (mysql)
    #[arg(long, global = true)]
    port: Option<u16>,

    /// User name (mysql)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Database name (mysql)
    #[arg(long, global = true)]
    database: Option<String>,

    /// Database file (sqlite)
    #[arg(long, global = true)]
    file: Option<PathBuf>,
}

impl ConnectionArgs {
    fn overrides(&self) -> ConnectionOverrides {
        ConnectionOverrides {
            engine: self.engine,
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            database: self.database.clone(),
            file: self.file.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Database(DatabaseCommand),

    /// List stored connections
    Connections,
}

/// Subcommands that open the resolved connection
#[derive(Subcommand)]
enum DatabaseCommand {
    /// Start the interactive session (default)
    Run,

    /// Create the tables if they do not exist
    Init {
        /// Load sample departments, roles and employees into an empty database
        #[arg(long)]
        seed: bool,
    },

    /// Validate the resolved connection and store it under a name
    Connect {
        /// Name to store the connection under
        #[arg(long)]
        name: String,

        /// Environment variable that holds the password (default DB_PASS)
        #[arg(long)]
        password_env: Option<String>,

        /// Store in the user config directory instead of .roster/config.json
        #[arg(long)]
        global: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Credentials may live in .env; a missing file is fine
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ROSTER_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let command = match cli.command {
        None => DatabaseCommand::Run,
        Some(Commands::Database(command)) => command,
        Some(Commands::Connections) => return list_connections(),
    };

    let connection =
        config::resolve_connection(cli.connection.connection.as_deref(), &cli.connection.overrides())
            .context("Could not resolve database connection")?;
    info!(connection = %connection.describe(), "opening database");

    match connection.engine {
        #[cfg(feature = "sqlite")]
        DatabaseType::SQLite => {
            let engine = SqliteEngine::open(&connection).context("SQLite connection failed")?;
            execute(engine, connection, command).await
        }
        #[cfg(not(feature = "sqlite"))]
        DatabaseType::SQLite => anyhow::bail!("SQLite engine not enabled. Build with --features sqlite"),

        #[cfg(feature = "mysql")]
        DatabaseType::MySQL => {
            let engine = MySqlEngine::open(&connection).await.context("MySQL connection failed")?;
            execute(engine, connection, command).await
        }
        #[cfg(not(feature = "mysql"))]
        DatabaseType::MySQL => anyhow::bail!("MySQL engine not enabled. Build with --features mysql"),
    }
}

/// Run `command` against an open catalog, closing it exactly once
async fn execute<C: Catalog>(
    mut catalog: C,
    connection: ConnectionConfig,
    command: DatabaseCommand,
) -> Result<()> {
    let version = match catalog.server_version().await {
        Ok(version) => version,
        Err(e) => {
            catalog.close().await.ok();
            return Err(e).context("Connection probe failed");
        }
    };
    info!(engine = %catalog.engine(), version = %version, "connected");

    match command {
        DatabaseCommand::Run => {
            if let Err(e) = catalog.ensure_schema().await {
                catalog.close().await.ok();
                return Err(e).context("Could not create tables");
            }
            let session = Session::new(catalog, DialoguerPrompter::new(), TerminalConsole);
            session.run().await.context("Session ended unexpectedly")
        }
        DatabaseCommand::Init { seed } => {
            let outcome = initialize(&mut catalog, seed).await;
            catalog.close().await.context("Could not close connection")?;
            outcome
        }
        DatabaseCommand::Connect { name, password_env, global } => {
            catalog.close().await.context("Could not close connection")?;
            let location = if global { ConfigLocation::Global } else { ConfigLocation::Local };
            let path = config::save_connection(&name, connection, password_env, location)
                .context("Could not store connection")?;
            TerminalConsole.status(
                Status::Success,
                &format!("Saved connection '{name}' ({version}) to {}", path.display()),
            );
            Ok(())
        }
    }
}

async fn initialize<C: Catalog>(catalog: &mut C, with_sample: bool) -> Result<()> {
    catalog.ensure_schema().await.context("Could not create tables")?;
    let mut console = TerminalConsole;
    console.status(Status::Success, "Tables are ready.");

    if with_sample {
        if seed::seed(catalog).await.context("Could not load sample data")? {
            console.status(Status::Success, "Loaded sample data.");
        } else {
            console.status(Status::Info, "Database already has data; sample data skipped.");
        }
    }
    Ok(())
}

fn list_connections() -> Result<()> {
    let connections = config::list_connections().context("Could not read stored connections")?;
    if connections.is_empty() {
        TerminalConsole.status(Status::Info, "No stored connections. Use 'roster connect' to add one.");
    } else {
        println!("{}", render_table(&Table::from_rows(&connections)));
    }
    Ok(())
}
