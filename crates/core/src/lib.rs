//! Core functionality for the UAV Guard threat fusion and response engine.
//!
//! This crate provides the vocabulary shared by the fusion, flight and
//! response crates: threat levels, attack context, sensor identities,
//! configuration, error types and logging initialization.

pub mod config;
pub mod error;
pub mod logging;
pub mod threat;
pub mod time;

pub use config::{
    FusionConfig, GuardConfig, LinkConfig, ResponseConfig, ThresholdConfig, WeightConfig,
};
pub use error::{ConfigError, CoreError, Result};
pub use threat::{
    is_benign_label, is_gnss_spoofing_label, normalize_label, sensor_for_label, AlertSeverity,
    AttackContext, SensorKind, ThreatLevel, NORMAL_LABEL,
};
pub use time::current_timestamp_ms;
