// Copyright 2025 Logisight Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use anyhow::Result;
use axum::http::HeaderValue;
use logisight_query::{MySqlParts, WarehouseConfig};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Logisight Server Configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpServerConfig,
    #[serde(default)]
    pub warehouse: WarehouseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpServerConfig {
    /// HTTP API listen address (e.g., "127.0.0.1:3000")
    #[serde(default = "default_http_addr")]
    pub listen_addr: String,

    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    /// Allowed CORS origins (empty = allow all)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("Unknown log format '{}' (expected pretty or json)", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// EnvFilter directives; RUST_LOG wins when set
    #[serde(default = "default_log_filter")]
    pub filter: String,

    #[serde(default)]
    pub format: LogFormat,
}

// Default values
fn default_http_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_enable_cors() -> bool {
    true
}

fn default_log_filter() -> String {
    "logisight_server=info,logisight_query=info,tower_http=info".to_string()
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_http_addr(),
            enable_cors: default_enable_cors(),
            cors_origins: vec![],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - LOGISIGHT_HTTP_ADDR: HTTP listen address (default: 127.0.0.1:3000)
    /// - LOGISIGHT_DATABASE_URL: Warehouse URL (default: sqlite://logistics_dw.db)
    /// - DB_HOST, DB_PORT, DB_USER, DB_PASSWORD, DB_NAME: MySQL warehouse
    ///   parts, used when LOGISIGHT_DATABASE_URL is unset (defaults:
    ///   localhost, 3306, root, empty, logistics_dw)
    /// - LOGISIGHT_DB_MAX_CONNECTIONS: Pool size (default: 10)
    /// - LOGISIGHT_DB_ACQUIRE_TIMEOUT: Seconds to wait for a connection (default: 30)
    /// - LOGISIGHT_ENABLE_CORS: Enable CORS, true or false (default: true)
    /// - LOGISIGHT_LOG_FORMAT: pretty or json (default: pretty)
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::default().with_env(|name| std::env::var(name).ok())
    }

    /// Load configuration with priority: env > file > defaults
    pub fn load(config_file: Option<PathBuf>) -> Result<Self> {
        let mut config = if let Some(path) = config_file {
            if path.exists() {
                tracing::info!("Loading configuration from file: {:?}", path);
                Self::from_file(&path)?
            } else {
                tracing::warn!("Config file not found: {:?}, using defaults", path);
                Self::default()
            }
        } else {
            Self::default()
        };

        config = Self::merge_with_env(config);

        Ok(config)
    }

    /// Merge config with environment variables (env takes priority)
    fn merge_with_env(config: Self) -> Self {
        config.with_env(|name| std::env::var(name).ok())
    }

    /// Override every setting whose variable `lookup` returns
    fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(addr) = lookup("LOGISIGHT_HTTP_ADDR") {
            self.server.listen_addr = addr;
        }

        if let Some(cors) = lookup("LOGISIGHT_ENABLE_CORS") {
            if let Some(val) = parse_var("LOGISIGHT_ENABLE_CORS", &cors) {
                self.server.enable_cors = val;
            }
        }

        if let Some(url) = lookup("LOGISIGHT_DATABASE_URL") {
            self.warehouse.database_url = url;
        } else if let Some(url) = mysql_url_from_parts(&lookup) {
            self.warehouse.database_url = url;
        }

        if let Some(max_conn) = lookup("LOGISIGHT_DB_MAX_CONNECTIONS") {
            if let Some(val) = parse_var("LOGISIGHT_DB_MAX_CONNECTIONS", &max_conn) {
                self.warehouse.max_connections = val;
            }
        }

        if let Some(timeout) = lookup("LOGISIGHT_DB_ACQUIRE_TIMEOUT") {
            if let Some(val) = parse_var("LOGISIGHT_DB_ACQUIRE_TIMEOUT", &timeout) {
                self.warehouse.acquire_timeout_secs = val;
            }
        }

        if let Some(format) = lookup("LOGISIGHT_LOG_FORMAT") {
            if let Some(val) = parse_var("LOGISIGHT_LOG_FORMAT", &format) {
                self.logging.format = val;
            }
        }

        self
    }

    /// Parse listen address as SocketAddr
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(self.server.listen_addr.parse()?)
    }

    /// Allowed origins as header values
    pub fn cors_origins(&self) -> Result<Vec<HeaderValue>> {
        self.server
            .cors_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", origin, e))
            })
            .collect()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        self.cors_origins()?;
        self.warehouse.validate()?;
        Ok(())
    }
}

fn parse_var<T>(name: &str, value: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value.trim().parse() {
        Ok(val) => Some(val),
        Err(e) => {
            tracing::warn!("Ignoring {}={:?}: {}", name, value, e);
            None
        }
    }
}

/// MySQL URL assembled from `DB_*` variables, if any of them is set
fn mysql_url_from_parts(lookup: &impl Fn(&str) -> Option<String>) -> Option<String> {
    const VARS: [&str; 5] = ["DB_HOST", "DB_PORT", "DB_USER", "DB_PASSWORD", "DB_NAME"];
    if VARS.iter().all(|name| lookup(name).is_none()) {
        return None;
    }

    let mut parts = MySqlParts::default();
    if let Some(host) = lookup("DB_HOST") {
        parts.host = host;
    }
    if let Some(port) = lookup("DB_PORT") {
        if let Some(val) = parse_var("DB_PORT", &port) {
            parts.port = val;
        }
    }
    if let Some(user) = lookup("DB_USER") {
        parts.user = user;
    }
    if let Some(password) = lookup("DB_PASSWORD") {
        parts.password = password;
    }
    if let Some(database) = lookup("DB_NAME") {
        parts.database = database;
    }

    match parts.to_url() {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!("Ignoring DB_* settings: {}", e);
            None
        }
    }
}
