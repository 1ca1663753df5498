//! HTTP Server Configuration
//!
//! Where the admin API listens and which browser origins may call it.

use std::io;
use std::net::SocketAddr;

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use tracing::warn;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// The site's dev server, on both loopback spellings
const SITE_DEV_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed to call the API; empty allows any origin
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_cors_origins() -> Vec<String> {
    SITE_DEV_ORIGINS.iter().map(|o| o.to_string()).collect()
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self::bind(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl HttpServerConfig {
    /// Listen on `host:port`, allowing the site's dev origins
    pub fn bind(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            cors_origins: default_cors_origins(),
        }
    }

    /// `host:port`, bracketing IPv6 literals
    pub fn socket_addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Listen address. Hostnames are not resolved; `host` must be an IP.
    pub fn listen_addr(&self) -> io::Result<SocketAddr> {
        let addr = self.socket_addr();
        addr.parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid socket address {}: {}", addr, e),
            )
        })
    }

    /// Parsed CORS allow-list, or `None` when any origin may call.
    /// Entries that are not valid header values are skipped.
    pub fn origin_allow_list(&self) -> Option<Vec<HeaderValue>> {
        if self.cors_origins.is_empty() {
            return None;
        }
        let origins = self
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(%origin, "ignoring unparsable CORS origin");
                    None
                }
            })
            .collect();
        Some(origins)
    }
}
