//! CLI module for the portfolio admin API
//!
//! Provides command-line interface for:
//! - serve: connect to the store and run the HTTP server
//! - collections: print collection names and exit

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    build_services, collections, init_tracing, load_config, run, run_command, serve,
};
pub use errors::{CliError, CliErrorCode, CliResult};
