//! CLI module for the SDB sample
//!
//! - `serve`: run the HTTP API
//! - `migrate`: apply or revert the PostgreSQL schema
//! - `client`: drive the user page against a running backend

pub mod client;
pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// SDB Sample - user CRUD backend and client
#[derive(Parser)]
#[command(name = "sdb-sample")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,

    /// Manage the PostgreSQL schema
    Migrate(migrate::MigrateArgs),

    /// Talk to a running backend
    Client(client::ClientArgs),
}

/// Load `.env`, layered configuration and install logging
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["sdb-sample", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));
    }

    #[test]
    fn test_parse_client_add() {
        let cli = Cli::try_parse_from([
            "sdb-sample",
            "client",
            "add",
            "--email",
            "a@b.com",
            "--name",
            "Alice",
        ])
        .unwrap();

        match cli.command {
            Command::Client(args) => match args.command {
                client::ClientCommand::Add { email, name } => {
                    assert_eq!(email, "a@b.com");
                    assert_eq!(name.as_deref(), Some("Alice"));
                }
                _ => panic!("expected add"),
            },
            _ => panic!("expected client"),
        }
    }

    #[test]
    fn test_parse_client_delete_and_base_url() {
        let cli = Cli::try_parse_from([
            "sdb-sample",
            "client",
            "--api-url",
            "http://backend:3001",
            "delete",
            "7",
        ])
        .unwrap();

        match cli.command {
            Command::Client(args) => {
                assert_eq!(args.api_url.as_deref(), Some("http://backend:3001"));
                assert!(matches!(args.command, client::ClientCommand::Delete { ref id } if id == "7"));
            }
            _ => panic!("expected client"),
        }
    }

    #[test]
    fn test_parse_migrate_revert() {
        let cli = Cli::try_parse_from(["sdb-sample", "migrate", "--revert"]).unwrap();
        assert!(matches!(cli.command, Command::Migrate(args) if args.revert));
    }

    #[test]
    fn test_requires_subcommand() {
        assert!(Cli::try_parse_from(["sdb-sample"]).is_err());
    }
}
