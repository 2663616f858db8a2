//! End-to-end detection cycle scenarios

use crate::test_utils::*;
use uavguard_core::{AlertSeverity, SensorKind, ThreatLevel};
use uavguard_flight::{
    FlightCommandChannel, FlightMode, NavigationSource, SimulatedFlightController,
};
use uavguard_fusion::FusionWeights;
use uavguard_response::{ResponseAction, SensorReadings};

#[tokio::test]
async fn test_jamming_attack_triggers_return_to_home() {
    init_test_logging();
    let guard = simulated_guard("uav-jam");

    let outcome = guard
        .run_cycle(&SensorReadings::new(0.9, 0.1).with_attack_type("Jamming Attack"))
        .await;

    assert_eq!(outcome.assessment.combined_score, 0.58);
    assert_eq!(outcome.assessment.threat_level, ThreatLevel::ConfirmedLow);

    let response = outcome.response.expect("level 2 must trigger a response");
    assert!(response.success);
    assert!(response.contains(ResponseAction::BackupNavigationActivated));
    assert!(response.contains(ResponseAction::ReturnToHomeInitiated));

    let state = guard.responder().drone_state().await;
    assert_eq!(state.flight_mode, FlightMode::Rtl);
    assert_eq!(state.navigation_source, NavigationSource::InertialBarometric);
}

#[tokio::test]
async fn test_spoofing_at_boundary_is_classified_by_score_only() {
    init_test_logging();
    let guard = simulated_guard("uav-boundary");

    let readings = SensorReadings::new(0.2, 0.95)
        .with_attack_type("GPS Spoofing")
        .with_weights(FusionWeights::new(0.6, 0.4, 0.0));
    let outcome = guard.run_cycle(&readings).await;

    assert_eq!(outcome.assessment.combined_score, 0.5);
    assert_eq!(outcome.assessment.threat_level, ThreatLevel::ConfirmedLow);

    let response = outcome.response.unwrap();
    assert_eq!(response.threat_level, ThreatLevel::ConfirmedLow);
    assert!(response.contains(ResponseAction::ReturnToHomeInitiated));
}

#[tokio::test]
async fn test_spoofing_at_high_severity_holds_on_imu() {
    init_test_logging();
    let guard = simulated_guard("uav-spoof");

    let outcome = guard
        .run_cycle(&SensorReadings::new(0.6, 0.9).with_attack_type("gps_spoofing"))
        .await;

    assert_eq!(outcome.assessment.combined_score, 0.72);
    assert_eq!(outcome.assessment.threat_level, ThreatLevel::ConfirmedHigh);
    assert!(outcome.assessment.attack_types.contains("GPS Spoofing"));

    let response = outcome.response.unwrap();
    assert!(response.contains(ResponseAction::ImuHoverActivated));
    assert!(!response.contains(ResponseAction::EmergencyRthInitiated));
    assert!(!response.contains(ResponseAction::ReturnToHomeInitiated));

    let state = guard.responder().drone_state().await;
    assert_eq!(state.flight_mode, FlightMode::AltHold);
    assert!(state.isolated_sensors.contains(&SensorKind::GnssReceiver));
    assert!(!state.uses_gnss());
}

#[tokio::test]
async fn test_high_severity_without_spoofing_returns_home() {
    init_test_logging();
    let guard = simulated_guard("uav-rth");

    let outcome = guard
        .run_cycle(&SensorReadings::new(0.95, 0.4).with_attack_type("Unauthorized Access"))
        .await;

    assert_eq!(outcome.assessment.threat_level, ThreatLevel::ConfirmedHigh);
    let response = outcome.response.unwrap();
    assert!(response.contains(ResponseAction::EmergencyRthInitiated));
    assert!(!response.contains(ResponseAction::ImuHoverActivated));

    let state = guard.responder().drone_state().await;
    assert_eq!(state.flight_mode, FlightMode::Rtl);
    assert!(state.isolated_sensors.contains(&SensorKind::CompanionDataLink));
}

#[tokio::test]
async fn test_multi_vector_attack_lands_and_cuts_links() {
    init_test_logging();
    let (guard, mut alerts) = queued_guard("uav-critical");

    let outcome = guard
        .run_cycle(&SensorReadings::new(1.0, 0.9).with_attack_type("Jamming Attack"))
        .await;

    assert_eq!(outcome.assessment.threat_level, ThreatLevel::Critical);
    let response = outcome.response.unwrap();
    assert!(response.success);
    assert!(response.operator_notified);

    let landing = response.position(ResponseAction::EmergencyLandingInitiated).unwrap();
    let imu_only = response.position(ResponseAction::ImuBarometerOnly).unwrap();
    let links = response.position(ResponseAction::ExternalLinksDisabled).unwrap();
    assert!(landing < imu_only && imu_only < links);

    let state = guard.responder().drone_state().await;
    assert_eq!(state.flight_mode, FlightMode::Land);
    assert!(!state.external_links_enabled);

    let alert = alerts.recv().await.unwrap();
    assert_eq!(alert.severity, AlertSeverity::Critical);
    assert_eq!(alert.message, "CRITICAL multi-vector attack: Jamming Attack");
}

#[tokio::test]
async fn test_benign_cycle_leaves_vehicle_alone() {
    init_test_logging();
    let guard = simulated_guard("uav-calm");

    let outcome = guard
        .run_cycle(&SensorReadings::new(0.05, 0.1).with_attack_type("Normal"))
        .await;

    assert_eq!(outcome.assessment.threat_level, ThreatLevel::Normal);
    assert!(outcome.assessment.attack_types.is_empty());
    assert!(outcome.response.is_none());
    assert_eq!(guard.responder().drone_state().await.flight_mode, FlightMode::Loiter);
}

#[tokio::test]
async fn test_assessment_is_reproducible_across_vehicles() {
    let first = simulated_guard("uav-a");
    let second = simulated_guard("uav-b");
    let readings = SensorReadings::new(0.73, 0.41)
        .with_attack_type("Signal Interference")
        .with_other(0.5)
        .with_weights(FusionWeights::new(0.5, 0.3, 0.2));

    let a = first.run_cycle(&readings).await.assessment;
    let b = second.run_cycle(&readings).await.assessment;
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[tokio::test]
async fn test_record_serializes_with_stable_identifiers() {
    let guard = simulated_guard("uav-audit");
    let outcome = guard
        .run_cycle(&SensorReadings::new(0.9, 0.1).with_attack_type("Jamming Attack"))
        .await;

    let json = serde_json::to_value(outcome.response.unwrap()).unwrap();
    assert_eq!(json["threat_level"], 2);
    assert_eq!(json["success"], true);
    assert_eq!(json["actions_taken"][0], "backup_navigation_activated");
    assert_eq!(json["actions_taken"][1], "return_to_home_initiated");
}

#[tokio::test]
async fn test_channel_rejects_invalid_requests_without_mutation() {
    let mut channel = SimulatedFlightController::new();
    let before = channel.read_state();

    assert!(channel.set_position_setpoint(91.0, 0.0, 10.0).await.is_err());
    assert!(channel.request_flight_mode("BOGUS").await.is_err());

    let after = channel.read_state();
    assert_eq!(after.position, before.position);
    assert_eq!(after.flight_mode, before.flight_mode);
}
