//! Canonical countermeasure policy per threat level
//!
//! This table is what a level *calls for*. Which concrete flight command
//! carries out each entry, and whether it succeeded, is decided by the
//! response controller.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uavguard_core::ThreatLevel;

/// Recommended countermeasure identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    /// Keep routine telemetry logging
    ContinueNormalLogging,
    /// Raise the monitoring cadence
    IncreaseMonitoring,
    /// Log detailed telemetry
    LogDetailedTelemetry,
    /// Notify the operator at low severity
    AlertOperator,
    /// Lower the speed ceiling by 30%
    #[serde(rename = "reduce_speed_30pct")]
    ReduceSpeed30Pct,
    /// Switch navigation to IMU + barometer
    ActivateBackupNavigation,
    /// Return to the launch point
    ReturnToHome,
    /// Raise logging verbosity
    IncreaseLoggingVerbosity,
    /// Notify the operator at high severity
    SendEmergencyAlert,
    /// Return to launch when GNSS is trusted, IMU hover otherwise
    EmergencyRthOrImuHover,
    /// Switch to the emergency communications fallback
    ActivateEmergencyComms,
    /// Isolate sensors implicated by the active attacks
    DisableVulnerableSensors,
    /// Notify the operator at critical severity
    SendCriticalAlert,
    /// Land at the current position
    ImmediateLanding,
    /// Navigate on IMU + barometer only
    ImuBarometerOnly,
    /// Disable external command links
    CutExternalLinks,
    /// Capture the full forensic context
    LogForensicData,
}

impl RecommendedAction {
    /// Stable identifier
    pub fn as_str(self) -> &'static str {
        match self {
            RecommendedAction::ContinueNormalLogging => "continue_normal_logging",
            RecommendedAction::IncreaseMonitoring => "increase_monitoring",
            RecommendedAction::LogDetailedTelemetry => "log_detailed_telemetry",
            RecommendedAction::AlertOperator => "alert_operator",
            RecommendedAction::ReduceSpeed30Pct => "reduce_speed_30pct",
            RecommendedAction::ActivateBackupNavigation => "activate_backup_navigation",
            RecommendedAction::ReturnToHome => "return_to_home",
            RecommendedAction::IncreaseLoggingVerbosity => "increase_logging_verbosity",
            RecommendedAction::SendEmergencyAlert => "send_emergency_alert",
            RecommendedAction::EmergencyRthOrImuHover => "emergency_rth_or_imu_hover",
            RecommendedAction::ActivateEmergencyComms => "activate_emergency_comms",
            RecommendedAction::DisableVulnerableSensors => "disable_vulnerable_sensors",
            RecommendedAction::SendCriticalAlert => "send_critical_alert",
            RecommendedAction::ImmediateLanding => "immediate_landing",
            RecommendedAction::ImuBarometerOnly => "imu_barometer_only",
            RecommendedAction::CutExternalLinks => "cut_external_links",
            RecommendedAction::LogForensicData => "log_forensic_data",
        }
    }
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const NORMAL_ACTIONS: &[RecommendedAction] = &[RecommendedAction::ContinueNormalLogging];

const SUSPICIOUS_ACTIONS: &[RecommendedAction] = &[
    RecommendedAction::IncreaseMonitoring,
    RecommendedAction::LogDetailedTelemetry,
    RecommendedAction::AlertOperator,
    RecommendedAction::ReduceSpeed30Pct,
];

const CONFIRMED_LOW_ACTIONS: &[RecommendedAction] = &[
    RecommendedAction::ActivateBackupNavigation,
    RecommendedAction::ReturnToHome,
    RecommendedAction::IncreaseLoggingVerbosity,
    RecommendedAction::SendEmergencyAlert,
];

const CONFIRMED_HIGH_ACTIONS: &[RecommendedAction] = &[
    RecommendedAction::EmergencyRthOrImuHover,
    RecommendedAction::ActivateEmergencyComms,
    RecommendedAction::DisableVulnerableSensors,
    RecommendedAction::SendCriticalAlert,
];

const CRITICAL_ACTIONS: &[RecommendedAction] = &[
    RecommendedAction::ImmediateLanding,
    RecommendedAction::ImuBarometerOnly,
    RecommendedAction::CutExternalLinks,
    RecommendedAction::LogForensicData,
    RecommendedAction::SendCriticalAlert,
];

/// Fixed, ordered countermeasures a level calls for
pub fn actions_for(level: ThreatLevel) -> &'static [RecommendedAction] {
    match level {
        ThreatLevel::Normal => NORMAL_ACTIONS,
        ThreatLevel::Suspicious => SUSPICIOUS_ACTIONS,
        ThreatLevel::ConfirmedLow => CONFIRMED_LOW_ACTIONS,
        ThreatLevel::ConfirmedHigh => CONFIRMED_HIGH_ACTIONS,
        ThreatLevel::Critical => CRITICAL_ACTIONS,
    }
}

/// Policy lookup result: the level's actions plus the attack labels it was asked about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Level the recommendation is for
    pub threat_level: ThreatLevel,
    /// Level description
    pub description: String,
    /// Canonical ordered action list
    pub actions: Vec<RecommendedAction>,
    /// Attack labels, echoed unchanged for traceability
    pub attack_types: BTreeSet<String>,
}

impl Recommendation {
    /// Look up the policy for a level
    pub fn for_level(level: ThreatLevel, attack_types: &BTreeSet<String>) -> Self {
        Self {
            threat_level: level,
            description: level.description().to_string(),
            actions: actions_for(level).to_vec(),
            attack_types: attack_types.clone(),
        }
    }
}
