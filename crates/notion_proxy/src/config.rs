//! Server configuration: a RON file with environment overrides.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use notion_engine::{FetchSettings, UpstreamSettings};
use proxy_logging::proxy_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::LogDestination;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "NOTION_PROXY_CONFIG";
/// Environment variable overriding [`ServerConfig::bind`].
pub const BIND_ENV: &str = "NOTION_PROXY_BIND";
/// Environment variable overriding [`ServerConfig::log_level`].
pub const LOG_ENV: &str = "NOTION_PROXY_LOG";

const DEFAULT_CONFIG_FILENAME: &str = "notion_proxy.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBind { value: String, message: String },
    #[error("invalid log level {0:?}")]
    InvalidLogLevel(String),
    #[error("route must start with '/', got {0:?}")]
    InvalidRoute(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Path of the single query endpoint.
    pub route: String,
    pub log_level: String,
    pub log_destination: LogDestination,
    pub upstream: UpstreamConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8888)),
            route: "/notion".to_string(),
            log_level: "info".to_string(),
            log_destination: LogDestination::Terminal,
            upstream: UpstreamConfig::default(),
        }
    }
}

/// Upstream addressing and time budgets, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub api_base_url: String,
    pub probe_timeout_ms: u64,
    pub page_timeout_ms: u64,
    pub block_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub max_pages: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        let upstream = UpstreamSettings::default();
        let fetch = FetchSettings::default();
        Self {
            api_base_url: upstream.api_base_url,
            probe_timeout_ms: millis(upstream.probe_timeout),
            page_timeout_ms: millis(upstream.page_timeout),
            block_timeout_ms: millis(upstream.block_timeout),
            request_timeout_ms: millis(fetch.request_timeout),
            connect_timeout_ms: millis(fetch.connect_timeout),
            max_pages: upstream.max_pages,
        }
    }
}

impl UpstreamConfig {
    pub fn upstream_settings(&self) -> UpstreamSettings {
        UpstreamSettings {
            api_base_url: self.api_base_url.clone(),
            probe_timeout: Duration::from_millis(self.probe_timeout_ms),
            page_timeout: Duration::from_millis(self.page_timeout_ms),
            block_timeout: Duration::from_millis(self.block_timeout_ms),
            max_pages: self.max_pages,
            ..UpstreamSettings::default()
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl ServerConfig {
    /// Parses a RON document; omitted fields keep their defaults.
    pub fn from_ron_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|err| ConfigError::Parse {
            path: origin.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Applies `NOTION_PROXY_*` overrides obtained through `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(bind) = lookup(BIND_ENV) {
            self.bind = bind.trim().parse().map_err(|err: std::net::AddrParseError| {
                ConfigError::InvalidBind {
                    value: bind.clone(),
                    message: err.to_string(),
                }
            })?;
        }
        if let Some(level) = lookup(LOG_ENV) {
            self.log_level = level.trim().to_string();
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.log_level()?;
        if !self.route.starts_with('/') {
            return Err(ConfigError::InvalidRoute(self.route.clone()));
        }
        Ok(())
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}

/// Reads `path`; a missing file yields the defaults.
pub fn load_from_path(path: &Path) -> Result<ServerConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => ServerConfig::from_ron_str(&text, path),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            proxy_info!("No config at {:?}; using defaults", path);
            Ok(ServerConfig::default())
        }
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Loads the process configuration from the file named by [`CONFIG_ENV`]
/// (default `./notion_proxy.ron`) and applies environment overrides.
pub fn load() -> Result<ServerConfig, ConfigError> {
    let path = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));
    let mut config = load_from_path(&path)?;
    config.apply_overrides(|name| std::env::var(name).ok())?;
    config.validate()?;
    Ok(config)
}
