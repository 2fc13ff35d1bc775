//! Structured logging using **tracing**.
//!
//! Events go to stderr as JSON so stdout stays reserved for reports.
//! Filtering follows `RUST_LOG` (e.g. `RUST_LOG=vinsight_core=debug`).

use tracing::{info, warn};

/// Initializes the global tracing subscriber.
///
/// Call once at startup. A second call is a no-op instead of a panic so
/// that embedders (tests, the language server) can call it freely.
pub fn init_structured_logging() {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Logs a warning event.
pub fn log_warn(message: &str) {
    warn!(detail = %message);
}

/// Logs an info event.
pub fn log_info(message: &str) {
    info!(detail = %message);
}
