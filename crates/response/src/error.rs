//! Response error types
//!
//! `respond` itself never fails; these cover notification delivery and
//! building a guard from configuration.

use thiserror::Error;
use uavguard_core::ConfigError;
use uavguard_fusion::FusionError;

/// Operator notification failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NotifyError {
    /// Transport accepted nothing
    #[error("Notification delivery failed: {0}")]
    Delivery(String),

    /// Delivery task has gone away
    #[error("Notification queue closed")]
    QueueClosed,
}

/// Guard construction failure
#[derive(Debug, Error)]
pub enum GuardError {
    /// Configuration rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Fusion tuning rejected
    #[error("Fusion error: {0}")]
    Fusion(#[from] FusionError),

    /// Vehicle id already registered in the fleet
    #[error("Vehicle already registered: {0}")]
    DuplicateVehicle(String),
}

/// Result type alias for guard construction
pub type Result<T> = std::result::Result<T, GuardError>;
