//! Failure paths through the flight command channel

use crate::test_utils::*;
use std::time::{Duration, Instant};
use uavguard_core::{AttackContext, ThreatLevel};
use uavguard_flight::{FlightCommandChannel, FlightError, FlightMode, ScriptedFlightController};
use uavguard_response::{ResponseAction, ResponseController, SensorReadings};

#[tokio::test]
async fn test_rejected_rtl_is_reported_not_masked() {
    init_test_logging();
    let channel = ScriptedFlightController::new().reject_mode(FlightMode::Rtl, "geofence breach");
    let guard = scripted_guard("uav-reject", channel);

    let outcome = guard
        .run_cycle(&SensorReadings::new(0.9, 0.1).with_attack_type("Jamming Attack"))
        .await;
    let response = outcome.response.unwrap();

    assert!(!response.success);
    assert!(response.contains(ResponseAction::FlightModeChangeRejected));
    assert!(!response.contains(ResponseAction::ReturnToHomeInitiated));
    assert!(response.summary.contains("degraded"));

    let incidents = guard.responder().incidents().await;
    assert_eq!(incidents.len(), 1);
    assert!(!incidents[0].success);
    assert!(incidents[0]
        .actions
        .contains(&ResponseAction::FlightModeChangeRejected));
}

#[tokio::test]
async fn test_autopilot_denial_over_link() {
    init_test_logging();
    let channel = linked_controller(
        AutopilotBehavior::DenyMode(FlightMode::Land),
        Duration::from_millis(200),
    );
    let controller = ResponseController::new("uav-link", channel);

    let record = controller
        .respond(ThreatLevel::Critical, AttackContext::from_labels(["Jamming Attack"]))
        .await;

    assert!(!record.success);
    assert_eq!(record.actions_taken[0], ResponseAction::FlightModeChangeRejected);
    assert!(record.contains(ResponseAction::ImuBarometerOnly));
    assert!(record.contains(ResponseAction::ExternalLinksDisabled));

    let state = controller.drone_state().await;
    assert_eq!(state.flight_mode, FlightMode::Loiter);
    assert!(!state.external_links_enabled);
}

#[tokio::test]
async fn test_silent_link_fails_within_bound() {
    init_test_logging();
    let channel = linked_controller(AutopilotBehavior::Silent, Duration::from_millis(25));
    let controller = ResponseController::new("uav-silent", channel);

    let started = Instant::now();
    let record = controller
        .respond(ThreatLevel::Critical, AttackContext::new())
        .await;

    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(!record.success);
    assert_eq!(record.failures.len(), 3);
    assert!(record
        .failures
        .iter()
        .all(|f| f.reason.contains("timed out after 25 ms")));
    assert!(record.contains(ResponseAction::ForensicDataLogged));
    assert_eq!(controller.incidents().await.len(), 1);
}

#[tokio::test]
async fn test_failsafe_survives_a_dead_link() {
    let mut channel = linked_controller(AutopilotBehavior::Silent, Duration::from_millis(10));

    assert!(matches!(
        channel.change_flight_mode(FlightMode::Guided).await,
        Err(FlightError::Timeout { .. })
    ));
    channel.trigger_failsafe().await.unwrap();
    assert_eq!(channel.read_state().flight_mode, FlightMode::Rtl);
}

#[tokio::test]
async fn test_incident_chain_survives_mixed_outcomes() {
    let channel = ScriptedFlightController::new().time_out_kind("set_comms_profile");
    let guard = scripted_guard("uav-chain", channel);

    let cycles = [
        SensorReadings::new(0.9, 0.1).with_attack_type("Jamming Attack"),
        SensorReadings::new(0.6, 0.9).with_attack_type("GPS Spoofing"),
        SensorReadings::new(1.0, 1.0).with_attack_type("Unauthorized Access"),
    ];
    let mut successes = Vec::new();
    for readings in &cycles {
        let response = guard.run_cycle(readings).await.response.unwrap();
        successes.push(response.success);
    }

    assert_eq!(successes, vec![true, false, true]);
    assert_eq!(guard.responder().incidents().await.len(), 3);
    assert_eq!(guard.responder().verify_incidents().await, Ok(()));
}
