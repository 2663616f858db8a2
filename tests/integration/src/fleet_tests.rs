//! Configuration-driven guards and fleet isolation

use crate::test_utils::*;
use std::collections::HashMap;
use uavguard_core::{GuardConfig, ThreatLevel};
use uavguard_flight::{FlightMode, SimulatedFlightController};
use uavguard_response::{FleetGuard, ResponseAction, SensorReadings, TracingNotifier, VehicleGuard};

const FLEET_CONFIG: &str = r#"
[fusion.weights]
rf = 0.5
gnss = 0.5

[fusion.thresholds]
suspicious = 0.25
low_attack = 0.45
high_attack = 0.65
critical = 0.8

[response]
respond_min_level = 1
incident_log_capacity = 8
"#;

#[tokio::test]
async fn test_guard_follows_toml_tuning() {
    init_test_logging();
    let config = GuardConfig::from_toml_str(FLEET_CONFIG).unwrap();
    let guard = VehicleGuard::from_config(
        "uav-tuned",
        SimulatedFlightController::new(),
        TracingNotifier,
        &config,
    )
    .unwrap();

    let outcome = guard.run_cycle(&SensorReadings::new(0.3, 0.3)).await;

    assert_eq!(outcome.assessment.combined_score, 0.3);
    assert_eq!(outcome.assessment.threat_level, ThreatLevel::Suspicious);
    let response = outcome.response.unwrap();
    assert!(response.contains(ResponseAction::SpeedReduced30Pct));
    assert_eq!(guard.responder().drone_state().await.speed_ceiling_pct, 70);
}

#[tokio::test]
async fn test_fleet_isolates_vehicles() {
    init_test_logging();
    let mut fleet = FleetGuard::new();
    for id in ["uav-north", "uav-south", "uav-east"] {
        fleet.register(simulated_guard(id)).unwrap();
    }

    let readings: HashMap<String, SensorReadings> = [
        (
            "uav-north".to_string(),
            SensorReadings::new(1.0, 1.0).with_attack_type("Jamming Attack"),
        ),
        (
            "uav-south".to_string(),
            SensorReadings::new(0.6, 0.9).with_attack_type("GPS Spoofing"),
        ),
        ("uav-east".to_string(), SensorReadings::new(0.0, 0.0)),
    ]
    .into_iter()
    .collect();

    let outcomes = fleet.run_all(readings).await;
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes["uav-north"].assessment.threat_level, ThreatLevel::Critical);
    assert_eq!(outcomes["uav-south"].assessment.threat_level, ThreatLevel::ConfirmedHigh);
    assert!(outcomes["uav-east"].response.is_none());

    let modes = [
        ("uav-north", FlightMode::Land),
        ("uav-south", FlightMode::AltHold),
        ("uav-east", FlightMode::Loiter),
    ];
    for (id, mode) in modes {
        let guard = fleet.get(id).unwrap();
        assert_eq!(guard.responder().drone_state().await.flight_mode, mode, "{}", id);
    }
}

#[tokio::test]
async fn test_fleet_cycle_by_id() {
    let mut fleet = FleetGuard::new();
    fleet.register(simulated_guard("uav-1")).unwrap();

    let outcome = fleet
        .run_cycle("uav-1", &SensorReadings::new(0.9, 0.1).with_attack_type("jamming_attack"))
        .await
        .unwrap();

    assert!(outcome.assessment.attack_types.contains("Jamming Attack"));
    assert!(outcome.response.unwrap().success);
    assert!(fleet.run_cycle("uav-2", &SensorReadings::new(1.0, 1.0)).await.is_none());
}
