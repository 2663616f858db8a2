//! Structured logging infrastructure for UAV Guard.
//!
//! This module provides centralized logging initialization with support
//! for structured JSON output and environment-based configuration.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{CoreError, Result};

/// Filter applied when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Output format of the global subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines for operators at a console
    Pretty,
    /// One JSON object per event for log aggregation
    Json,
}

/// Initialize the logging system with human-readable output.
///
/// Log level can be configured via the `RUST_LOG` environment variable.
/// If not set, defaults to `info` level. Does nothing if a global
/// subscriber is already installed.
///
/// # Example
/// ```no_run
/// use uavguard_core::logging;
///
/// logging::init();
/// tracing::info!("Guard started");
/// ```
pub fn init() {
    if let Err(err) = try_init_with(DEFAULT_FILTER, LogFormat::Pretty) {
        tracing::debug!(error = %err, "Logging already initialized");
    }
}

/// Initialize the logging system with JSON output for flight-log capture.
///
/// # Example
/// ```no_run
/// use uavguard_core::logging;
///
/// logging::init_json();
/// tracing::info!(vehicle_id = "uav-7", "Guard started");
/// ```
pub fn init_json() {
    if let Err(err) = try_init_with(DEFAULT_FILTER, LogFormat::Json) {
        tracing::debug!(error = %err, "Logging already initialized");
    }
}

/// Install the global subscriber, reporting failure instead of panicking.
///
/// `default_filter` is used only when `RUST_LOG` is absent or unparsable.
pub fn try_init_with(default_filter: &str, format: LogFormat) -> Result<()> {
    let filter = build_filter(default_filter);
    let registry = tracing_subscriber::registry().with(filter);

    let outcome = match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .try_init(),
    };

    outcome.map_err(|err| CoreError::Logging(err.to_string()))
}

fn build_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}
