//! `motionlog` - CLI for the motion event recorder
//!
//! Runs the HTTP service and offers a few maintenance commands for
//! inspecting stored events and configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fmt::Write;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use motionlog::cli::{Cli, Command, ConfigCommand, ListCommand, OutputFormat, ServeCommand};
use motionlog::{init_logging, Config, MotionLogEntry, Server, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Serve(serve_cmd) => handle_serve(config, &serve_cmd).await,
        Command::List(list_cmd) => handle_list(&config, &list_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

async fn handle_serve(mut config: Config, cmd: &ServeCommand) -> anyhow::Result<()> {
    cmd.apply(&mut config);
    config.validate()?;

    let server = Server::bind(&config).await.with_context(|| {
        format!(
            "starting server on {}:{}",
            config.server.host, config.server.port
        )
    })?;

    server.serve(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let path = cmd.database.clone().unwrap_or_else(|| config.database_path());
    let storage = Storage::open(&path)?;
    storage.initialize()?;
    let entries = storage.list_all()?;

    print!("{}", format_entries(&entries, cmd.format)?);
    Ok(())
}

fn format_entries(entries: &[MotionLogEntry], format: OutputFormat) -> anyhow::Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Json => {
            out.push_str(&serde_json::to_string_pretty(entries)?);
            out.push('\n');
        }
        OutputFormat::Plain => {
            for entry in entries {
                writeln!(out, "{}\t{}", entry.id, entry.timestamp)?;
            }
        }
        OutputFormat::Table => {
            let width = entries
                .iter()
                .map(|e| e.id.to_string().len())
                .max()
                .unwrap_or(0)
                .max(2);
            writeln!(out, "{:>width$}  TIMESTAMP", "ID")?;
            for entry in entries {
                writeln!(out, "{:>width$}  {}", entry.id, entry.timestamp)?;
            }
            writeln!(out, "({} entries)", entries.len())?;
        }
    }
    Ok(out)
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Host:               {}", config.server.host);
                println!("  Port:               {}", config.server.port);
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<MotionLogEntry> {
        vec![
            MotionLogEntry::new(12, "2024-01-01T00:00:02Z"),
            MotionLogEntry::new(3, 1_704_067_200_i64),
        ]
    }

    #[test]
    fn test_format_plain() {
        let out = format_entries(&sample(), OutputFormat::Plain).unwrap();
        assert_eq!(out, "12\t2024-01-01T00:00:02Z\n3\t1704067200\n");
    }

    #[test]
    fn test_format_table() {
        let out = format_entries(&sample(), OutputFormat::Table).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ID  TIMESTAMP");
        assert_eq!(lines[1], "12  2024-01-01T00:00:02Z");
        assert_eq!(lines[2], " 3  1704067200");
        assert_eq!(lines[3], "(2 entries)");
    }

    #[test]
    fn test_format_json() {
        let out = format_entries(&sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["id"], 12);
        assert_eq!(value[1]["timestamp"], 1_704_067_200_i64);
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_entries(&[], OutputFormat::Plain).unwrap(), "");
        assert_eq!(format_entries(&[], OutputFormat::Json).unwrap(), "[]\n");
    }
}
