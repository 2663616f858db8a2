//! Flight command errors

use thiserror::Error;

/// Failure of a single flight command.
///
/// A failed command never mutates `DroneState`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlightError {
    /// Mode name outside the validated set
    #[error("Invalid flight mode: {0}")]
    InvalidMode(String),

    /// Position setpoint outside lat [-90, 90], lon [-180, 180], alt >= 0
    #[error("Invalid position setpoint: lat={lat}, lon={lon}, alt={alt}")]
    InvalidPosition {
        /// Requested latitude
        lat: f64,
        /// Requested longitude
        lon: f64,
        /// Requested altitude
        alt: f64,
    },

    /// Speed ceiling outside 1..=100 percent
    #[error("Invalid speed ceiling: {0}%")]
    InvalidSpeedCeiling(u8),

    /// Controller or transport refused the command
    #[error("Command {command} rejected: {reason}")]
    Rejected {
        /// Command kind
        command: &'static str,
        /// Refusal reason
        reason: String,
    },

    /// No acknowledgement within the link's latency bound
    #[error("Command {command} timed out after {timeout_ms} ms")]
    Timeout {
        /// Command kind
        command: &'static str,
        /// Configured bound
        timeout_ms: u64,
    },

    /// Transport to the flight controller is gone
    #[error("Flight controller link down: {0}")]
    LinkDown(String),
}

/// Result type alias for flight operations
pub type Result<T> = std::result::Result<T, FlightError>;
