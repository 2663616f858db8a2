//! Fusion error types
//!
//! Fusion itself never fails; these errors come only from building an
//! engine with invalid tuning.

use thiserror::Error;

/// Fusion tuning errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FusionError {
    /// Threshold table is not a strictly increasing sequence in (0, 1]
    #[error("Invalid threat thresholds: {0}")]
    InvalidThresholds(String),

    /// A default weight is negative or not finite
    #[error("Invalid fusion weights: {0}")]
    InvalidWeights(String),
}

/// Result type alias for fusion construction
pub type Result<T> = std::result::Result<T, FusionError>;
