//! Executed countermeasure identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// One countermeasure step as it was carried out, or the marker of one
/// that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseAction {
    /// Routine telemetry logged
    NormalLogging,
    /// Monitoring cadence raised
    IncreasedMonitoring,
    /// Detailed telemetry logged
    DetailedTelemetryLogged,
    /// Operator notified at low severity
    OperatorAlerted,
    /// Speed ceiling lowered to 70%
    #[serde(rename = "speed_reduced_30pct")]
    SpeedReduced30Pct,
    /// Navigation switched to IMU + barometer
    BackupNavigationActivated,
    /// Return to launch engaged
    ReturnToHomeInitiated,
    /// Logging verbosity raised
    LoggingVerbosityIncreased,
    /// Operator notified at high severity
    EmergencyAlertSent,
    /// Emergency return to launch engaged (GNSS trusted)
    EmergencyRthInitiated,
    /// Altitude hold on inertial data engaged (GNSS untrusted)
    ImuHoverActivated,
    /// Emergency communications profile active
    EmergencyCommsActivated,
    /// Implicated sensors isolated
    VulnerableSensorsDisabled,
    /// Operator notified at critical severity
    CriticalAlertSent,
    /// Landing at current position engaged
    EmergencyLandingInitiated,
    /// Navigation forced to IMU + barometer only
    ImuBarometerOnly,
    /// External command links disabled
    ExternalLinksDisabled,
    /// Full forensic context logged
    ForensicDataLogged,

    /// A mode change was refused or timed out
    FlightModeChangeRejected,
    /// Navigation source switch failed
    NavigationSourceRejected,
    /// Speed limit failed
    SpeedLimitRejected,
    /// External link cut failed
    ExternalLinkCutRejected,
    /// A sensor isolation failed
    SensorIsolationRejected,
    /// Comms profile switch failed
    CommsProfileRejected,
    /// Operator notification not delivered
    OperatorNotificationFailed,
    /// The response task died before finishing its steps
    ResponseAborted,
}

impl ResponseAction {
    /// Stable identifier
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseAction::NormalLogging => "normal_logging",
            ResponseAction::IncreasedMonitoring => "increased_monitoring",
            ResponseAction::DetailedTelemetryLogged => "detailed_telemetry_logged",
            ResponseAction::OperatorAlerted => "operator_alerted",
            ResponseAction::SpeedReduced30Pct => "speed_reduced_30pct",
            ResponseAction::BackupNavigationActivated => "backup_navigation_activated",
            ResponseAction::ReturnToHomeInitiated => "return_to_home_initiated",
            ResponseAction::LoggingVerbosityIncreased => "logging_verbosity_increased",
            ResponseAction::EmergencyAlertSent => "emergency_alert_sent",
            ResponseAction::EmergencyRthInitiated => "emergency_rth_initiated",
            ResponseAction::ImuHoverActivated => "imu_hover_activated",
            ResponseAction::EmergencyCommsActivated => "emergency_comms_activated",
            ResponseAction::VulnerableSensorsDisabled => "vulnerable_sensors_disabled",
            ResponseAction::CriticalAlertSent => "critical_alert_sent",
            ResponseAction::EmergencyLandingInitiated => "emergency_landing_initiated",
            ResponseAction::ImuBarometerOnly => "imu_barometer_only",
            ResponseAction::ExternalLinksDisabled => "external_links_disabled",
            ResponseAction::ForensicDataLogged => "forensic_data_logged",
            ResponseAction::FlightModeChangeRejected => "flight_mode_change_rejected",
            ResponseAction::NavigationSourceRejected => "navigation_source_rejected",
            ResponseAction::SpeedLimitRejected => "speed_limit_rejected",
            ResponseAction::ExternalLinkCutRejected => "external_link_cut_rejected",
            ResponseAction::SensorIsolationRejected => "sensor_isolation_rejected",
            ResponseAction::CommsProfileRejected => "comms_profile_rejected",
            ResponseAction::OperatorNotificationFailed => "operator_notification_failed",
            ResponseAction::ResponseAborted => "response_aborted",
        }
    }

    /// True for markers of a failed step
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            ResponseAction::FlightModeChangeRejected
                | ResponseAction::NavigationSourceRejected
                | ResponseAction::SpeedLimitRejected
                | ResponseAction::ExternalLinkCutRejected
                | ResponseAction::SensorIsolationRejected
                | ResponseAction::CommsProfileRejected
                | ResponseAction::OperatorNotificationFailed
                | ResponseAction::ResponseAborted
        )
    }
}

impl fmt::Display for ResponseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a step failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionFailure {
    /// Failure marker recorded in the action list
    pub action: ResponseAction,
    /// Underlying error
    pub reason: String,
}
