//! # Application Configuration
//!
//! Settings come from an optional JSON file and are then overridden by
//! environment variables. The connection string is required; everything
//! else has a default.
//!
//! | Variable              | Field                         |
//! |-----------------------|-------------------------------|
//! | `MONGO_URI`           | `store.uri`                   |
//! | `MONGO_DB`            | `store.database`              |
//! | `MONGO_MAX_POOL_SIZE` | `store.max_pool_size`         |
//! | `MONGO_MIN_POOL_SIZE` | `store.min_pool_size`         |
//! | `MONGO_TLS`           | `store.tls`                   |
//! | `ADMIN_PASSWORD`      | `admin.password`              |
//! | `HOST` / `PORT`       | `http.host` / `http.port`     |
//! | `CORS_ORIGINS`        | `http.cors_origins` (comma separated) |
//! | `SMTP_HOST` ...       | `mail` (built when `SMTP_HOST` is set) |

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::contact::mailer::{default_from, default_smtp_port};
use crate::contact::MailConfig;
use crate::http_server::HttpServerConfig;
use crate::store::StoreConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MONGO_URI is not set")]
    MissingConnectionString,

    #[error("Failed to read config {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Admin gate settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Shared admin password; login fails with a configuration error when unset
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub http: HttpServerConfig,

    /// Contact relay; `None` records submissions without sending them
    #[serde(default)]
    pub mail: Option<MailConfig>,
}

impl AppConfig {
    /// Load from an optional JSON file, then apply process environment
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Parse a JSON config file without validating it
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Build from environment-style lookups alone
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_overrides(lookup)
    }

    /// Apply lookups on top of `self` and validate the result
    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // blank variables count as unset
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(uri) = get("MONGO_URI") {
            self.store.uri = uri;
        }
        if let Some(db) = get("MONGO_DB") {
            self.store.database = Some(db);
        }
        if let Some(size) = get("MONGO_MAX_POOL_SIZE") {
            self.store.max_pool_size = parse_value("MONGO_MAX_POOL_SIZE", &size)?;
        }
        if let Some(size) = get("MONGO_MIN_POOL_SIZE") {
            self.store.min_pool_size = Some(parse_value("MONGO_MIN_POOL_SIZE", &size)?);
        }
        if let Some(tls) = get("MONGO_TLS") {
            self.store.tls = Some(parse_value("MONGO_TLS", &tls)?);
        }

        if let Some(password) = get("ADMIN_PASSWORD") {
            self.admin.password = Some(password);
        }

        if let Some(host) = get("HOST") {
            self.http.host = host;
        }
        if let Some(port) = get("PORT") {
            self.http.port = parse_value("PORT", &port)?;
        }
        if let Some(origins) = get("CORS_ORIGINS") {
            self.http.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(smtp_host) = get("SMTP_HOST") {
            let mut mail = self.mail.take().unwrap_or_else(|| MailConfig {
                smtp_host: String::new(),
                smtp_port: default_smtp_port(),
                smtp_user: String::new(),
                smtp_password: String::new(),
                from: default_from(),
                to: String::new(),
            });
            mail.smtp_host = smtp_host;
            self.mail = Some(mail);
        }
        if let Some(mail) = self.mail.as_mut() {
            if let Some(port) = get("SMTP_PORT") {
                mail.smtp_port = parse_value("SMTP_PORT", &port)?;
            }
            if let Some(user) = get("SMTP_USER") {
                mail.smtp_user = user;
            }
            if let Some(password) = get("SMTP_PASSWORD") {
                mail.smtp_password = password;
            }
            if let Some(from) = get("MAIL_FROM") {
                mail.from = from;
            }
            if let Some(to) = get("CONTACT_TO") {
                mail.to = to;
            }
            // the owner address defaults to the SMTP account
            if mail.to.is_empty() {
                mail.to = mail.smtp_user.clone();
            }
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.store.uri.trim().is_empty() {
            return Err(ConfigError::MissingConnectionString);
        }
        if self.store.max_pool_size == 0 {
            return Err(ConfigError::Invalid {
                key: "MONGO_MAX_POOL_SIZE",
                value: "0".to_string(),
            });
        }
        if let Some(min) = self.store.min_pool_size {
            if min > self.store.max_pool_size {
                return Err(ConfigError::Invalid {
                    key: "MONGO_MIN_POOL_SIZE",
                    value: min.to_string(),
                });
            }
        }
        if let Some(mail) = &self.mail {
            if mail.to.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    key: "CONTACT_TO",
                    value: String::new(),
                });
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}
