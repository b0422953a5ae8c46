//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::config::Config;

/// Serve command arguments.
///
/// Flags override the loaded configuration for this run only.
#[derive(Debug, Default, Args)]
pub struct ServeCommand {
    /// Address to listen on (default 0.0.0.0)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (default 5000)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Database file (default motion_logs.db)
    #[arg(short, long, value_name = "FILE")]
    pub database: Option<PathBuf>,
}

impl ServeCommand {
    /// Apply the flag overrides to `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(database) = &self.database {
            config.storage.database_path.clone_from(database);
        }
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Database file to read instead of the configured one
    #[arg(short, long, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One `id timestamp` pair per line
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
