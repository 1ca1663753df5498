//! CLI command implementations
//!
//! Each command loads configuration, builds a tokio runtime and blocks on
//! its async body. Configuration problems fail before any connection is
//! attempted.

use std::path::Path;

use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::auth::AdminGate;
use crate::config::AppConfig;
use crate::contact::create_email_sender;
use crate::crud::{CrudService, RequestRouter};
use crate::http_server::{AppServices, HttpServer};
use crate::store::StoreGateway;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::print_response;

/// Parse arguments, install logging and run the command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.log_level.as_deref());
    run_command(cli.command)
}

/// Install the global subscriber. `level` wins over `RUST_LOG`; the
/// default is `info`. Logs go to stderr so command output stays clean.
pub fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    // a second install (tests) is not an error worth reporting
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run a CLI command
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, host, port } => serve(config.as_deref(), host, port),
        Command::Collections { config } => collections(config.as_deref()),
    }
}

/// Load configuration and apply command-line overrides
pub fn load_config(
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
) -> CliResult<AppConfig> {
    let mut config = AppConfig::load(config_path)?;
    if let Some(host) = host {
        config.http.host = host;
    }
    if let Some(port) = port {
        config.http.port = port;
    }
    Ok(config)
}

/// Wire the request router, gate and mailer around a connected gateway
pub fn build_services(gateway: StoreGateway, config: &AppConfig) -> CliResult<AppServices> {
    let gate = AdminGate::new(config.admin.password.clone());
    if !gate.is_configured() {
        warn!("ADMIN_PASSWORD is not set; admin login will fail");
    }

    Ok(AppServices {
        requests: RequestRouter::new(CrudService::new(gateway)),
        gate,
        mailer: create_email_sender(config.mail.clone())?,
    })
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))
}

/// Connect to the store and serve the HTTP API
pub fn serve(config_path: Option<&Path>, host: Option<String>, port: Option<u16>) -> CliResult<()> {
    let config = load_config(config_path, host, port)?;

    runtime()?.block_on(async move {
        let gateway = StoreGateway::connect(&config.store).await?;
        let services = build_services(gateway, &config)?;

        info!(addr = %config.http.socket_addr(), "starting HTTP server");
        HttpServer::new(config.http.clone(), services)
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Print `{"collections": [...]}` for the configured database
pub fn collections(config_path: Option<&Path>) -> CliResult<()> {
    let config = AppConfig::load(config_path)?;

    let names = runtime()?.block_on(async {
        let gateway = StoreGateway::connect(&config.store).await?;
        let crud = CrudService::new(gateway);
        Ok::<_, CliError>(crud.collection_names().await?)
    })?;

    print_response(json!({ "collections": names }))
}
