//! Configuration management for UAV Guard.
//!
//! Every field has a default, so an empty document is a valid configuration.
//! Files are TOML unless their extension is `.json`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Top-level guard configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Sensor fusion tuning
    #[serde(default)]
    pub fusion: FusionConfig,
    /// Autonomous response tuning
    #[serde(default)]
    pub response: ResponseConfig,
    /// Flight controller link tuning
    #[serde(default)]
    pub link: LinkConfig,
}

/// Sensor fusion tuning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FusionConfig {
    /// Default per-channel weights
    #[serde(default)]
    pub weights: WeightConfig,
    /// Score thresholds separating threat levels
    #[serde(default)]
    pub thresholds: ThresholdConfig,
}

/// Per-channel fusion weights; normalized before use
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    /// Weight of the RF anomaly score
    #[serde(default = "default_rf_weight")]
    pub rf: f64,
    /// Weight of the GNSS spoofing score
    #[serde(default = "default_gnss_weight")]
    pub gnss: f64,
    /// Weight of auxiliary indicators
    #[serde(default = "default_other_weight")]
    pub other: f64,
}

/// Lower bounds (inclusive) of threat levels 1 through 4
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Level 1 (suspicious)
    #[serde(default = "default_suspicious")]
    pub suspicious: f64,
    /// Level 2 (confirmed low-severity)
    #[serde(default = "default_low_attack")]
    pub low_attack: f64,
    /// Level 3 (confirmed high-severity)
    #[serde(default = "default_high_attack")]
    pub high_attack: f64,
    /// Level 4 (critical multi-vector)
    #[serde(default = "default_critical")]
    pub critical: f64,
}

/// Autonomous response tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseConfig {
    /// Incident entries retained in memory per vehicle
    #[serde(default = "default_incident_log_capacity")]
    pub incident_log_capacity: usize,
    /// Lowest threat level at which a detection cycle triggers a response
    #[serde(default = "default_respond_min_level")]
    pub respond_min_level: u8,
}

/// Flight controller link tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Upper bound on a single command round-trip before it counts as failed
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,
}

fn default_rf_weight() -> f64 {
    0.6
}

fn default_gnss_weight() -> f64 {
    0.4
}

fn default_other_weight() -> f64 {
    0.0
}

fn default_suspicious() -> f64 {
    0.30
}

fn default_low_attack() -> f64 {
    0.50
}

fn default_high_attack() -> f64 {
    0.70
}

fn default_critical() -> f64 {
    0.85
}

fn default_incident_log_capacity() -> usize {
    1024
}

fn default_respond_min_level() -> u8 {
    2
}

fn default_command_timeout_ms() -> u64 {
    500
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            rf: default_rf_weight(),
            gnss: default_gnss_weight(),
            other: default_other_weight(),
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            suspicious: default_suspicious(),
            low_attack: default_low_attack(),
            high_attack: default_high_attack(),
            critical: default_critical(),
        }
    }
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            incident_log_capacity: default_incident_log_capacity(),
            respond_min_level: default_respond_min_level(),
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            command_timeout_ms: default_command_timeout_ms(),
        }
    }
}

impl GuardConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: GuardConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: GuardConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from disk; `.json` files are JSON, everything else TOML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };

        tracing::info!(path = %path.display(), "Loaded guard configuration");
        Ok(config)
    }

    /// Check every section for out-of-range values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fusion.weights.validate()?;
        self.fusion.thresholds.validate()?;
        self.response.validate()?;
        self.link.validate()
    }
}

impl WeightConfig {
    /// Weights must be finite and non-negative; an all-zero set is allowed
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, weight) in [("rf", self.rf), ("gnss", self.gnss), ("other", self.other)] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "fusion weight '{}' must be finite and non-negative, got {}",
                    name, weight
                )));
            }
        }
        Ok(())
    }
}

impl ThresholdConfig {
    /// Thresholds must be strictly increasing and lie in (0, 1]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = [self.suspicious, self.low_attack, self.high_attack, self.critical];

        if ordered.iter().any(|t| !t.is_finite() || *t <= 0.0 || *t > 1.0) {
            return Err(ConfigError::Validation(format!(
                "threat thresholds must lie in (0, 1], got {:?}",
                ordered
            )));
        }
        if ordered.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ConfigError::Validation(format!(
                "threat thresholds must be strictly increasing, got {:?}",
                ordered
            )));
        }
        Ok(())
    }
}

impl ResponseConfig {
    /// Capacity must be positive and the trigger level must exist
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.incident_log_capacity == 0 {
            return Err(ConfigError::Validation(
                "incident_log_capacity must be greater than zero".to_string(),
            ));
        }
        if self.respond_min_level > 4 {
            return Err(ConfigError::Validation(format!(
                "respond_min_level must be within 0..=4, got {}",
                self.respond_min_level
            )));
        }
        Ok(())
    }
}

impl LinkConfig {
    /// A zero timeout would fail every command
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "command_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Timeout as a `Duration`
    pub fn command_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.command_timeout_ms)
    }
}
