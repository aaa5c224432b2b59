//! # Spycat CLI Module
//!
//! This module implements the CLI interface for Spycat.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server (default)
//! - `status` - Show entity counts
//! - `init` - Initialize a new database
//! - `breeds` - List recognized breeds or check one name

mod commands;

use crate::breeds::ClientError;
use crate::config::{BackendKind, Config, ConfigError};
use clap::{Parser, Subcommand};
use spycat_core::AgencyError;
use std::path::PathBuf;
use thiserror::Error;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Spycat - Spy Cat Agency Server
///
/// Registers cats, missions and targets, and enforces the mission lifecycle.
#[derive(Parser, Debug)]
#[command(name = "spycat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the config file (default: ./spycat.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the database (overrides [storage] path)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Storage backend: "redb" (ACID database) or "memory" (volatile)
    #[arg(short = 'B', long, global = true)]
    pub backend: Option<String>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides [server] host)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides [server] port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show entity counts
    Status,

    /// Initialize a new empty database
    Init {
        /// Replace an existing database
        #[arg(short, long)]
        force: bool,
    },

    /// List recognized breeds
    Breeds {
        /// Check a single breed name instead of listing
        #[arg(long)]
        check: Option<String>,
    },
}

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Agency(#[from] AgencyError),

    #[error(transparent)]
    Breeds(#[from] ClientError),

    #[error("Database already exists at {0}. Use --force to overwrite.")]
    AlreadyExists(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Build the effective configuration: file, then environment, then flags.
pub fn resolve_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env()?;

    if let Some(ref path) = cli.database {
        config.storage.path = path.clone();
    }
    if let Some(ref backend) = cli.backend {
        config.storage.backend = backend.parse::<BackendKind>()?;
    }
    if let Some(Commands::Server { host, port }) = &cli.command {
        if let Some(host) = host {
            config.server.host = host.clone();
        }
        if let Some(port) = port {
            config.server.port = *port;
        }
    }

    Ok(config)
}

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), CliError> {
    let config = resolve_config(&cli)?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { .. }) | None => cmd_server(&config).await,
        Some(Commands::Status) => cmd_status(&config, json_mode),
        Some(Commands::Init { force }) => cmd_init(&config, force),
        Some(Commands::Breeds { check }) => cmd_breeds(&config, json_mode, check.as_deref()).await,
    }
}
