//! Structured logging for the trendpipe workspace
//!
//! Every crate logs through the macros exported here so that a single
//! environment variable controls output for the whole process.
//!
//! Usage:
//! - Set TRENDPIPE_LOG=off (default) - no logs
//! - Set TRENDPIPE_LOG=info - one line per pipeline step
//! - Set TRENDPIPE_LOG=debug - request details, record counts, coercion nulls

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable holding the log level
pub const LOG_ENV: &str = "TRENDPIPE_LOG";

static INIT: Once = Once::new();

/// Parse a level name into an emit level
///
/// Returns `Ok(None)` for "off", `Err` with the fallback level for
/// values that are not recognized.
pub fn parse_level(value: &str) -> Result<Option<emit::Level>, emit::Level> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "off" => Ok(None),
        "debug" => Ok(Some(emit::Level::Debug)),
        "info" => Ok(Some(emit::Level::Info)),
        "warn" => Ok(Some(emit::Level::Warn)),
        "error" => Ok(Some(emit::Level::Error)),
        _ => Err(emit::Level::Info),
    }
}

/// Initialize diagnostics based on the TRENDPIPE_LOG environment variable
///
/// Call once at process start. Subsequent calls are ignored.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let log_level = std::env::var(LOG_ENV).unwrap_or_else(|_| "off".to_string());

        let (min_level, unknown) = match parse_level(&log_level) {
            Ok(None) => return,
            Ok(Some(level)) => (level, false),
            Err(fallback) => (fallback, true),
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(min_level))
            .init();

        if unknown {
            emit::warn!("Unknown {env} value {log_level}, using info", env: LOG_ENV);
        }

        // The runtime must outlive every emitting thread, so it is never torn down
        std::mem::forget(rt);
    });
}

/// Log pipeline steps users want to see in normal runs
///
/// Examples: "Wrote raw snapshot", "Selected raw object"
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (request parameters, record counts, nulls)
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log conditions that were turned into error responses
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log failures that abort the process
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

pub use init_diagnostics as init;
