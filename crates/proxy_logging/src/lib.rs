#![deny(missing_docs)]
//! Shared logging utilities for the proxy workspace.
//!
//! This crate provides the `proxy_*` logging macros used across the codebase,
//! a helper for keeping caller credentials out of log lines, and a minimal
//! test initializer for the global logger.

/// Number of leading token characters kept by [`redact_token`].
const VISIBLE_TOKEN_PREFIX: usize = 6;

/// Returns a log-safe rendition of a bearer credential.
///
/// Only a short prefix survives; the rest is replaced by a fixed marker so
/// that the length of the secret is not leaked either.
pub fn redact_token(token: &str) -> String {
    let token = token.trim();
    if token.is_empty() {
        return "<empty>".to_string();
    }
    let prefix: String = token.chars().take(VISIBLE_TOKEN_PREFIX).collect();
    if prefix.len() == token.len() {
        return "<redacted>".to_string();
    }
    format!("{prefix}…<redacted>")
}

/// Re-export used by the macros.
#[doc(hidden)]
pub use log;

/// Logs at an explicit [`log::Level`]; the `proxy_*` macros below forward here.
///
/// Expands through this crate's re-export, so callers need no direct `log`
/// dependency.
#[macro_export]
macro_rules! proxy_log {
    ($lvl:expr, $($arg:tt)+) => {
        $crate::log::log!($lvl, $($arg)+)
    };
}

/// Trace-level `proxy_log!`.
#[macro_export]
macro_rules! proxy_trace {
    ($($arg:tt)+) => { $crate::proxy_log!($crate::log::Level::Trace, $($arg)+) };
}

/// Debug-level `proxy_log!`.
#[macro_export]
macro_rules! proxy_debug {
    ($($arg:tt)+) => { $crate::proxy_log!($crate::log::Level::Debug, $($arg)+) };
}

/// Info-level `proxy_log!`.
#[macro_export]
macro_rules! proxy_info {
    ($($arg:tt)+) => { $crate::proxy_log!($crate::log::Level::Info, $($arg)+) };
}

/// Warn-level `proxy_log!`.
#[macro_export]
macro_rules! proxy_warn {
    ($($arg:tt)+) => { $crate::proxy_log!($crate::log::Level::Warn, $($arg)+) };
}

/// Error-level `proxy_log!`.
#[macro_export]
macro_rules! proxy_error {
    ($($arg:tt)+) => { $crate::proxy_log!($crate::log::Level::Error, $($arg)+) };
}

/// Installs a terminal logger for test binaries; later calls are no-ops.
///
/// Debug builds log at `Debug`, release builds at `Info`.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

    let level = match cfg!(debug_assertions) {
        true => log::LevelFilter::Debug,
        false => log::LevelFilter::Info,
    };
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}
