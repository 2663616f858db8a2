//! Threat vocabulary shared by fusion and response.
//!
//! Threat levels are a closed enum so an out-of-range level cannot be
//! represented once it has crossed the public boundary. Attack labels stay
//! strings: they come from an external classifier and are passed through
//! unchanged for audit, but a few labels carry policy weight (GNSS
//! spoofing, sensor implication) and are recognised here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Classifier label for benign telemetry.
pub const NORMAL_LABEL: &str = "Normal";

/// Graded threat level derived from the combined fusion score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", from = "u8")]
#[repr(u8)]
pub enum ThreatLevel {
    /// Normal operation
    Normal = 0,
    /// Suspicious activity
    Suspicious = 1,
    /// Confirmed low-severity attack
    ConfirmedLow = 2,
    /// Confirmed high-severity attack
    ConfirmedHigh = 3,
    /// Critical multi-vector attack
    Critical = 4,
}

impl ThreatLevel {
    /// Every level, lowest first
    pub const ALL: [ThreatLevel; 5] = [
        ThreatLevel::Normal,
        ThreatLevel::Suspicious,
        ThreatLevel::ConfirmedLow,
        ThreatLevel::ConfirmedHigh,
        ThreatLevel::Critical,
    ];

    /// Convert a raw integer level, clamping into the defined range.
    ///
    /// Anything at or above 4 is `Critical`; anything at or below 0 is `Normal`.
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            i64::MIN..=0 => ThreatLevel::Normal,
            1 => ThreatLevel::Suspicious,
            2 => ThreatLevel::ConfirmedLow,
            3 => ThreatLevel::ConfirmedHigh,
            _ => ThreatLevel::Critical,
        }
    }

    /// Numeric value in 0..=4
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Human-readable description of the level
    pub fn description(self) -> &'static str {
        match self {
            ThreatLevel::Normal => "Normal operation",
            ThreatLevel::Suspicious => "Suspicious activity",
            ThreatLevel::ConfirmedLow => "Confirmed low-severity attack",
            ThreatLevel::ConfirmedHigh => "Confirmed high-severity attack",
            ThreatLevel::Critical => "Critical multi-vector attack",
        }
    }

    /// One-line summary of the countermeasures executed at this level
    pub fn response_summary(self) -> &'static str {
        match self {
            ThreatLevel::Normal => "No action - normal operation",
            ThreatLevel::Suspicious => "Increased monitoring, operator alerted, speed reduced",
            ThreatLevel::ConfirmedLow => "Backup navigation activated, return-to-home initiated",
            ThreatLevel::ConfirmedHigh => "Emergency RTH or IMU hover, emergency comms activated",
            ThreatLevel::Critical => {
                "Immediate landing, IMU-only navigation, external links disabled"
            }
        }
    }
}

impl From<u8> for ThreatLevel {
    fn from(raw: u8) -> Self {
        ThreatLevel::from_raw(i64::from(raw))
    }
}

impl From<ThreatLevel> for u8 {
    fn from(level: ThreatLevel) -> Self {
        level.value()
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value(), self.description())
    }
}

/// Severity attached to an operator notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Informational, operator attention requested
    Low,
    /// Confirmed attack, action already taken
    High,
    /// Immediate operator intervention may be required
    Critical,
}

impl AlertSeverity {
    /// Wire name of the severity
    pub fn as_str(self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Onboard sensing or data channel that an attack can compromise
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Satellite navigation receiver
    GnssReceiver,
    /// RF telemetry and control radio
    RfTelemetryLink,
    /// Companion computer / ground data link
    CompanionDataLink,
}

impl SensorKind {
    /// Wire name of the sensor
    pub fn as_str(self) -> &'static str {
        match self {
            SensorKind::GnssReceiver => "gnss_receiver",
            SensorKind::RfTelemetryLink => "rf_telemetry_link",
            SensorKind::CompanionDataLink => "companion_data_link",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active attack labels plus opaque diagnostic fields.
///
/// `details` is pass-through data for logging and audit only; no policy
/// decision reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackContext {
    /// Active attack-type labels
    #[serde(default)]
    pub attack_types: BTreeSet<String>,

    /// Free-form diagnostic fields (scores, classifier confidence, ...)
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl AttackContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context from a set of labels
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attack_types: labels.into_iter().map(Into::into).collect(),
            details: serde_json::Map::new(),
        }
    }

    /// Add an attack label
    pub fn with_attack_type(mut self, label: impl Into<String>) -> Self {
        self.attack_types.insert(label.into());
        self
    }

    /// Attach a diagnostic field
    pub fn with_detail(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// True when any active label denotes GNSS/GPS spoofing.
    ///
    /// While this holds, satellite positioning is untrusted and must not
    /// drive navigation decisions.
    pub fn is_gnss_spoofing(&self) -> bool {
        self.attack_types.iter().any(|label| is_gnss_spoofing_label(label))
    }

    /// Sensors implicated by the active attack labels
    pub fn implicated_sensors(&self) -> BTreeSet<SensorKind> {
        self.attack_types
            .iter()
            .filter_map(|label| sensor_for_label(label))
            .collect()
    }

    /// Labels joined for operator-facing messages
    pub fn labels_display(&self) -> String {
        if self.attack_types.is_empty() {
            return "none".to_string();
        }
        self.attack_types
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn fold_label(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
}

/// True for the classifier's benign label, compared case-insensitively
pub fn is_benign_label(label: &str) -> bool {
    fold_label(label) == "normal"
}

/// True when a label names GNSS or GPS spoofing in any casing or separator style
pub fn is_gnss_spoofing_label(label: &str) -> bool {
    let folded = fold_label(label);
    folded.contains("spoof") && (folded.contains("gps") || folded.contains("gnss"))
}

/// Sensor compromised by the attack a label names, if any
pub fn sensor_for_label(label: &str) -> Option<SensorKind> {
    let folded = fold_label(label);
    if is_gnss_spoofing_label(&folded) {
        Some(SensorKind::GnssReceiver)
    } else if folded.contains("jamming") || folded.contains("interference") {
        Some(SensorKind::RfTelemetryLink)
    } else if folded.contains("unauthorized access") {
        Some(SensorKind::CompanionDataLink)
    } else {
        None
    }
}

/// Map raw classifier output (`gps_spoofing`) to its display label (`GPS Spoofing`).
///
/// Unknown labels are title-cased with underscores turned into spaces.
pub fn normalize_label(raw: &str) -> String {
    let key = raw.trim().to_lowercase();
    let known = match key.as_str() {
        "normal" => Some(NORMAL_LABEL),
        "jamming_attack" => Some("Jamming Attack"),
        "gps_spoofing" => Some("GPS Spoofing"),
        "unauthorized_access" => Some("Unauthorized Access"),
        "signal_interference" => Some("Signal Interference"),
        "physical_tampering" => Some("Physical Tampering"),
        _ => None,
    };
    if let Some(label) = known {
        return label.to_string();
    }

    raw.trim()
        .replace('_', " ")
        .split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_clamps() {
        assert_eq!(ThreatLevel::from_raw(-3), ThreatLevel::Normal);
        assert_eq!(ThreatLevel::from_raw(0), ThreatLevel::Normal);
        assert_eq!(ThreatLevel::from_raw(2), ThreatLevel::ConfirmedLow);
        assert_eq!(ThreatLevel::from_raw(4), ThreatLevel::Critical);
        assert_eq!(ThreatLevel::from_raw(17), ThreatLevel::Critical);
    }

    #[test]
    fn test_levels_are_ordered() {
        for pair in ThreatLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].value() + 1, pair[1].value());
        }
    }

    #[test]
    fn test_level_serializes_as_integer() {
        let json = serde_json::to_string(&ThreatLevel::ConfirmedHigh).unwrap();
        assert_eq!(json, "3");
        let level: ThreatLevel = serde_json::from_str("9").unwrap();
        assert_eq!(level, ThreatLevel::Critical);
    }

    #[test]
    fn test_level_descriptions() {
        assert_eq!(ThreatLevel::Normal.description(), "Normal operation");
        assert_eq!(
            ThreatLevel::Critical.description(),
            "Critical multi-vector attack"
        );
        assert_eq!(
            ThreatLevel::ConfirmedLow.to_string(),
            "2 (Confirmed low-severity attack)"
        );
    }

    #[test]
    fn test_gnss_spoofing_detection() {
        assert!(is_gnss_spoofing_label("GPS Spoofing"));
        assert!(is_gnss_spoofing_label("gps_spoofing"));
        assert!(is_gnss_spoofing_label("GNSS-Spoof"));
        assert!(!is_gnss_spoofing_label("Jamming Attack"));
        assert!(!is_gnss_spoofing_label("Spoofed ADS-B"));

        let context = AttackContext::from_labels(["Jamming Attack", "GPS Spoofing"]);
        assert!(context.is_gnss_spoofing());
        assert!(!AttackContext::from_labels(["Jamming Attack"]).is_gnss_spoofing());
    }

    #[test]
    fn test_implicated_sensors() {
        let context = AttackContext::from_labels([
            "GPS Spoofing",
            "Signal Interference",
            "Physical Tampering",
        ]);
        let sensors: Vec<_> = context.implicated_sensors().into_iter().collect();
        assert_eq!(
            sensors,
            vec![SensorKind::GnssReceiver, SensorKind::RfTelemetryLink]
        );
        assert_eq!(
            sensor_for_label("Unauthorized Access"),
            Some(SensorKind::CompanionDataLink)
        );
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("gps_spoofing"), "GPS Spoofing");
        assert_eq!(normalize_label("NORMAL"), "Normal");
        assert_eq!(normalize_label("replay_attack"), "Replay Attack");
        assert!(is_benign_label(" normal "));
        assert!(!is_benign_label("Jamming Attack"));
    }

    #[test]
    fn test_context_details_flatten() {
        let context = AttackContext::from_labels(["Jamming Attack"])
            .with_detail("combined_score", 0.58)
            .with_detail("source", "rf-detector");

        let json = serde_json::to_value(&context).unwrap();
        assert_eq!(json["attack_types"][0], "Jamming Attack");
        assert_eq!(json["source"], "rf-detector");

        let parsed: AttackContext = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, context);
    }

    #[test]
    fn test_labels_display() {
        assert_eq!(AttackContext::new().labels_display(), "none");
        let context = AttackContext::from_labels(["b", "a"]);
        assert_eq!(context.labels_display(), "a, b");
    }
}
