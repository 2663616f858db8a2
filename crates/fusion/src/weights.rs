//! Fusion weights and auxiliary indicators

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{FusionError, Result};

/// Default weight of the RF anomaly score
pub const DEFAULT_RF_WEIGHT: f64 = 0.6;
/// Default weight of the GNSS spoofing score
pub const DEFAULT_GNSS_WEIGHT: f64 = 0.4;
/// Default weight of auxiliary indicators
pub const DEFAULT_OTHER_WEIGHT: f64 = 0.0;

/// Per-channel weights. Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionWeights {
    /// RF anomaly weight
    #[serde(default = "default_rf")]
    pub rf: f64,
    /// GNSS spoofing weight
    #[serde(default = "default_gnss")]
    pub gnss: f64,
    /// Auxiliary indicator weight
    #[serde(default = "default_other")]
    pub other: f64,
}

fn default_rf() -> f64 {
    DEFAULT_RF_WEIGHT
}

fn default_gnss() -> f64 {
    DEFAULT_GNSS_WEIGHT
}

fn default_other() -> f64 {
    DEFAULT_OTHER_WEIGHT
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            rf: DEFAULT_RF_WEIGHT,
            gnss: DEFAULT_GNSS_WEIGHT,
            other: DEFAULT_OTHER_WEIGHT,
        }
    }
}

impl FusionWeights {
    /// Create a weight set
    pub fn new(rf: f64, gnss: f64, other: f64) -> Self {
        Self { rf, gnss, other }
    }

    /// Create a weight set, rejecting negative or non-finite weights
    pub fn checked(rf: f64, gnss: f64, other: f64) -> Result<Self> {
        for (name, weight) in [("rf", rf), ("gnss", gnss), ("other", other)] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(FusionError::InvalidWeights(format!(
                    "{} weight must be finite and non-negative, got {}",
                    name, weight
                )));
            }
        }
        Ok(Self::new(rf, gnss, other))
    }

    /// Weights scaled to sum to 1, or `None` when they sum to zero.
    ///
    /// Negative and non-finite weights count as zero, so the fusion path
    /// never fails on caller-supplied weights. Finite weights too large to
    /// sum are first scaled down by the largest one.
    pub fn normalized(&self) -> Option<FusionWeights> {
        let mut rf = usable_weight(self.rf);
        let mut gnss = usable_weight(self.gnss);
        let mut other = usable_weight(self.other);

        let mut total = rf + gnss + other;
        if total.is_infinite() {
            let largest = rf.max(gnss).max(other);
            rf /= largest;
            gnss /= largest;
            other /= largest;
            total = rf + gnss + other;
        }
        if total <= 0.0 {
            return None;
        }

        Some(FusionWeights {
            rf: rf / total,
            gnss: gnss / total,
            other: other / total,
        })
    }
}

fn usable_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

/// Auxiliary threat indicators feeding the "other" channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OtherIndicators {
    /// A single pre-combined score
    Score(f64),
    /// Named indicators, averaged with equal weight
    Named(BTreeMap<String, f64>),
}

impl OtherIndicators {
    /// Channel value: the score itself, or the mean of the named scores.
    ///
    /// An empty map yields 0.0; non-finite entries count as 0.0. The result
    /// is not clamped here, fusion clamps every channel uniformly.
    pub fn value(&self) -> f64 {
        match self {
            OtherIndicators::Score(score) => finite_or_zero(*score),
            OtherIndicators::Named(indicators) => {
                if indicators.is_empty() {
                    return 0.0;
                }
                let sum: f64 = indicators.values().copied().map(finite_or_zero).sum();
                sum / indicators.len() as f64
            }
        }
    }
}

impl From<f64> for OtherIndicators {
    fn from(score: f64) -> Self {
        OtherIndicators::Score(score)
    }
}

impl From<BTreeMap<String, f64>> for OtherIndicators {
    fn from(indicators: BTreeMap<String, f64>) -> Self {
        OtherIndicators::Named(indicators)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
