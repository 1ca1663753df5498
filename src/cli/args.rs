//! CLI argument definitions using clap
//!
//! Commands:
//! - portfolio-admin serve [--config <path>] [--host <host>] [--port <port>]
//! - portfolio-admin collections [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Portfolio admin API: generic CRUD over the site's document store
#[derive(Parser, Debug)]
#[command(name = "portfolio-admin")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log filter, e.g. `info` or `portfolio_admin=debug` (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Optional JSON configuration file; environment variables override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the store's collection names as JSON and exit
    Collections {
        /// Optional JSON configuration file; environment variables override it
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from([
            "portfolio-admin",
            "--log-level",
            "debug",
            "serve",
            "--port",
            "9000",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Command::Serve { config, host, port } => {
                assert!(config.is_none());
                assert!(host.is_none());
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_collections() {
        let cli =
            Cli::try_parse_from(["portfolio-admin", "collections", "--config", "site.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Collections { config: Some(path) } if path == PathBuf::from("site.json")
        ));
    }
}
