//! Threat level threshold table

use serde::{Deserialize, Serialize};
use uavguard_core::{ThreatLevel, ThresholdConfig};

use crate::error::{FusionError, Result};

/// Lower bound of level 1 (suspicious activity)
pub const SUSPICIOUS_THRESHOLD: f64 = 0.30;
/// Lower bound of level 2 (confirmed low-severity attack)
pub const LOW_ATTACK_THRESHOLD: f64 = 0.50;
/// Lower bound of level 3 (confirmed high-severity attack)
pub const HIGH_ATTACK_THRESHOLD: f64 = 0.70;
/// Lower bound of level 4 (critical multi-vector attack)
pub const CRITICAL_THRESHOLD: f64 = 0.85;

/// Ordered, inclusive lower bounds of threat levels 1 through 4.
///
/// Deserialized tables pass through [`ThreatThresholds::new`], so an
/// unordered or out-of-range table is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ThresholdConfig", into = "ThresholdConfig")]
pub struct ThreatThresholds {
    suspicious: f64,
    low_attack: f64,
    high_attack: f64,
    critical: f64,
}

impl Default for ThreatThresholds {
    fn default() -> Self {
        Self {
            suspicious: SUSPICIOUS_THRESHOLD,
            low_attack: LOW_ATTACK_THRESHOLD,
            high_attack: HIGH_ATTACK_THRESHOLD,
            critical: CRITICAL_THRESHOLD,
        }
    }
}

impl ThreatThresholds {
    /// Build a table; bounds must be strictly increasing and lie in (0, 1]
    pub fn new(suspicious: f64, low_attack: f64, high_attack: f64, critical: f64) -> Result<Self> {
        let ordered = [suspicious, low_attack, high_attack, critical];

        if ordered.iter().any(|t| !t.is_finite() || *t <= 0.0 || *t > 1.0) {
            return Err(FusionError::InvalidThresholds(format!(
                "bounds must lie in (0, 1], got {:?}",
                ordered
            )));
        }
        if ordered.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(FusionError::InvalidThresholds(format!(
                "bounds must be strictly increasing, got {:?}",
                ordered
            )));
        }

        Ok(Self {
            suspicious,
            low_attack,
            high_attack,
            critical,
        })
    }

    /// Map a combined score to its level, checking the highest bound first.
    ///
    /// Bounds are inclusive. A NaN score matches no bound and maps to
    /// `Normal`.
    pub fn level_for(&self, score: f64) -> ThreatLevel {
        if score >= self.critical {
            ThreatLevel::Critical
        } else if score >= self.high_attack {
            ThreatLevel::ConfirmedHigh
        } else if score >= self.low_attack {
            ThreatLevel::ConfirmedLow
        } else if score >= self.suspicious {
            ThreatLevel::Suspicious
        } else {
            ThreatLevel::Normal
        }
    }

    /// Inclusive lower bound of a level; `Normal` starts at 0.0
    pub fn lower_bound(&self, level: ThreatLevel) -> f64 {
        match level {
            ThreatLevel::Normal => 0.0,
            ThreatLevel::Suspicious => self.suspicious,
            ThreatLevel::ConfirmedLow => self.low_attack,
            ThreatLevel::ConfirmedHigh => self.high_attack,
            ThreatLevel::Critical => self.critical,
        }
    }
}

impl TryFrom<&ThresholdConfig> for ThreatThresholds {
    type Error = FusionError;

    fn try_from(config: &ThresholdConfig) -> Result<Self> {
        Self::new(
            config.suspicious,
            config.low_attack,
            config.high_attack,
            config.critical,
        )
    }
}

impl TryFrom<ThresholdConfig> for ThreatThresholds {
    type Error = FusionError;

    fn try_from(config: ThresholdConfig) -> Result<Self> {
        Self::try_from(&config)
    }
}

impl From<ThreatThresholds> for ThresholdConfig {
    fn from(table: ThreatThresholds) -> Self {
        ThresholdConfig {
            suspicious: table.suspicious,
            low_attack: table.low_attack,
            high_attack: table.high_attack,
            critical: table.critical,
        }
    }
}
