//! Multi-sensor threat fusion for UAV Guard.
//!
//! Combines independent per-sensor attack scores into a single threat
//! judgment:
//!
//! ```text
//! S_combined = w_rf * S_rf + w_gnss * S_gnss + w_other * S_other
//! ```
//!
//! with the weights normalized to sum to one. The combined score is mapped
//! to a [`ThreatLevel`](uavguard_core::ThreatLevel) through a fixed
//! threshold table, and the level to a canonical list of recommended
//! countermeasures.
//!
//! Everything in this crate is a pure function of its inputs. A
//! [`FusionEngine`] holds only immutable tuning and may be shared between
//! any number of concurrent readers.
//!
//! # Example
//!
//! ```
//! use uavguard_fusion::FusionEngine;
//! use uavguard_core::ThreatLevel;
//!
//! let engine = FusionEngine::new();
//! let assessment = engine.assess(0.9, 0.1, Some("Jamming Attack"), None, None);
//!
//! assert_eq!(assessment.combined_score, 0.58);
//! assert_eq!(assessment.threat_level, ThreatLevel::ConfirmedLow);
//! ```

#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod policy;
pub mod thresholds;
pub mod weights;

pub use engine::{FusionEngine, ThreatAssessment};
pub use error::{FusionError, Result};
pub use policy::{actions_for, Recommendation, RecommendedAction};
pub use thresholds::{
    ThreatThresholds, CRITICAL_THRESHOLD, HIGH_ATTACK_THRESHOLD, LOW_ATTACK_THRESHOLD,
    SUSPICIOUS_THRESHOLD,
};
pub use weights::{FusionWeights, OtherIndicators};
