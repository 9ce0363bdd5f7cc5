//! Logging infrastructure for Grounded.
//!
//! Logs go to stderr so stdout carries only answers.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// Initialize the tracing subscriber with stderr output.
///
/// # Arguments
/// * `log_level` - Optional filter override (e.g., "debug", "grounded_workflow=trace")
/// * `no_color` - Disable ANSI colors
///
/// Falls back to `RUST_LOG`, then to `info`.
///
/// # Example
/// ```no_run
/// use grounded_core::logging::init_logging;
///
/// init_logging(None, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(log_level: Option<&str>, no_color: bool) -> AppResult<()> {
    let filter_str = resolve_filter(log_level);

    let env_filter = EnvFilter::try_new(&filter_str)
        .map_err(|e| AppError::Config(format!("Invalid log filter: {}", e)))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(!no_color && supports_color());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}

/// Pick the effective filter string.
fn resolve_filter(log_level: Option<&str>) -> String {
    match log_level {
        Some(level) if !level.trim().is_empty() => level.to_string(),
        _ => std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
    }
}

fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}
