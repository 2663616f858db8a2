//! Fusion engine: combine, classify, recommend

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;
use uavguard_core::{is_benign_label, AttackContext, FusionConfig, ThreatLevel};

use crate::error::Result;
use crate::policy::{Recommendation, RecommendedAction};
use crate::thresholds::ThreatThresholds;
use crate::weights::{FusionWeights, OtherIndicators};

/// Decimal places kept in the combined score
const SCORE_PRECISION: f64 = 10_000.0;

/// Threat judgment for one detection cycle.
///
/// Carries no timestamp: identical inputs yield identical assessments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatAssessment {
    /// Fused score in [0, 1], rounded to 4 decimal places
    pub combined_score: f64,
    /// Level derived from the combined score
    pub threat_level: ThreatLevel,
    /// Level description
    pub description: String,
    /// Canonical actions for the level
    pub recommended_actions: Vec<RecommendedAction>,
    /// Active attack labels (never contains the benign label)
    pub attack_types: BTreeSet<String>,
}

impl ThreatAssessment {
    /// Attack context to hand to the response controller
    pub fn attack_context(&self) -> AttackContext {
        AttackContext::from_labels(self.attack_types.iter().cloned())
            .with_detail("combined_score", self.combined_score)
            .with_detail("threat_level", self.threat_level.value())
    }
}

/// Weighted multi-sensor fusion engine.
///
/// Stateless apart from immutable tuning; safe to share across threads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FusionEngine {
    weights: FusionWeights,
    thresholds: ThreatThresholds,
}

impl FusionEngine {
    /// Engine with default weights and thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with explicit default weights and thresholds
    pub fn with_tuning(weights: FusionWeights, thresholds: ThreatThresholds) -> Self {
        Self {
            weights,
            thresholds,
        }
    }

    /// Engine built from configuration, validating weights and thresholds
    pub fn from_config(config: &FusionConfig) -> Result<Self> {
        let weights = FusionWeights::checked(
            config.weights.rf,
            config.weights.gnss,
            config.weights.other,
        )?;
        let thresholds = ThreatThresholds::try_from(&config.thresholds)?;
        Ok(Self::with_tuning(weights, thresholds))
    }

    /// Default weights used when a call supplies none
    pub fn weights(&self) -> &FusionWeights {
        &self.weights
    }

    /// Threshold table
    pub fn thresholds(&self) -> &ThreatThresholds {
        &self.thresholds
    }

    /// Combine per-sensor scores into one score in [0, 1].
    ///
    /// Each channel is clamped to [0, 1] (NaN reads as 0) before weighting,
    /// so noisy upstream sensors never block the fusion path. Weights are
    /// normalized to sum to one; if they sum to zero the result is 0.0.
    /// The result is rounded to 4 decimal places.
    pub fn combine(
        &self,
        rf_score: f64,
        gnss_score: f64,
        other_indicators: Option<&OtherIndicators>,
        weights: Option<&FusionWeights>,
    ) -> f64 {
        let weights = weights.unwrap_or(&self.weights);
        let Some(w) = weights.normalized() else {
            return 0.0;
        };

        let other = other_indicators.map(OtherIndicators::value).unwrap_or(0.0);
        let combined = w.rf * clamp_unit(rf_score)
            + w.gnss * clamp_unit(gnss_score)
            + w.other * clamp_unit(other);

        round_score(clamp_unit(combined))
    }

    /// Map a combined score to a threat level
    pub fn level_for(&self, combined_score: f64) -> ThreatLevel {
        self.thresholds.level_for(combined_score)
    }

    /// Canonical actions for a level, echoing the attack labels back
    pub fn policy_for(
        &self,
        threat_level: ThreatLevel,
        attack_types: &BTreeSet<String>,
    ) -> Recommendation {
        Recommendation::for_level(threat_level, attack_types)
    }

    /// Full pipeline: combine, classify, attach policy and attack context.
    ///
    /// `attack_type` is kept only when present and not the benign label.
    pub fn assess(
        &self,
        rf_score: f64,
        gnss_score: f64,
        attack_type: Option<&str>,
        other_indicators: Option<&OtherIndicators>,
        weights: Option<&FusionWeights>,
    ) -> ThreatAssessment {
        let combined_score = self.combine(rf_score, gnss_score, other_indicators, weights);
        let threat_level = self.level_for(combined_score);

        let attack_types: BTreeSet<String> = attack_type
            .map(str::trim)
            .filter(|label| !label.is_empty() && !is_benign_label(label))
            .map(str::to_string)
            .into_iter()
            .collect();

        let recommendation = self.policy_for(threat_level, &attack_types);

        info!(
            rf = rf_score,
            gnss = gnss_score,
            combined = combined_score,
            level = threat_level.value(),
            description = threat_level.description(),
            "Fusion result"
        );

        ThreatAssessment {
            combined_score,
            threat_level,
            description: recommendation.description,
            recommended_actions: recommendation.actions,
            attack_types: recommendation.attack_types,
        }
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn round_score(value: f64) -> f64 {
    (value * SCORE_PRECISION).round() / SCORE_PRECISION
}
