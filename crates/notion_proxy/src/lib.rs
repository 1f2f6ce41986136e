//! HTTP front for the Notion query proxy.
pub mod config;
pub mod logging;
pub mod server;

pub use config::{ConfigError, ServerConfig, UpstreamConfig};
pub use logging::LogDestination;
pub use server::{build_router, ProxyError};
