//! Per-vehicle detection cycle and fleet registry
//!
//! A [`VehicleGuard`] owns the fusion engine and response controller of one
//! vehicle and runs one detection cycle at a time. A [`FleetGuard`] maps
//! vehicle ids to guards; different vehicles run independently.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};
use uavguard_core::{normalize_label, GuardConfig, ThreatLevel};
use uavguard_flight::FlightCommandChannel;
use uavguard_fusion::{FusionEngine, FusionWeights, OtherIndicators, ThreatAssessment};

use crate::controller::ResponseController;
use crate::error::{GuardError, Result};
use crate::notify::{OperatorNotifier, TracingNotifier};
use crate::record::ResponseRecord;

/// Default lowest level that triggers a response
pub const DEFAULT_RESPOND_MIN_LEVEL: ThreatLevel = ThreatLevel::ConfirmedLow;

/// Detector output for one cycle
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorReadings {
    /// RF anomaly score
    pub rf_score: f64,
    /// GNSS spoofing score
    pub gnss_score: f64,
    /// Classifier label, raw or display form
    #[serde(default)]
    pub attack_type: Option<String>,
    /// Auxiliary indicators
    #[serde(default)]
    pub other: Option<OtherIndicators>,
    /// Per-cycle weight override
    #[serde(default)]
    pub weights: Option<FusionWeights>,
}

impl SensorReadings {
    /// Readings with just the two primary scores
    pub fn new(rf_score: f64, gnss_score: f64) -> Self {
        Self {
            rf_score,
            gnss_score,
            ..Self::default()
        }
    }

    /// Attach the classifier label
    pub fn with_attack_type(mut self, label: impl Into<String>) -> Self {
        self.attack_type = Some(label.into());
        self
    }

    /// Attach auxiliary indicators
    pub fn with_other(mut self, other: impl Into<OtherIndicators>) -> Self {
        self.other = Some(other.into());
        self
    }

    /// Override the fusion weights for this cycle
    pub fn with_weights(mut self, weights: FusionWeights) -> Self {
        self.weights = Some(weights);
        self
    }
}

/// Result of one detection cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleOutcome {
    /// Fusion judgment
    pub assessment: ThreatAssessment,
    /// Response record, when the level warranted one
    pub response: Option<ResponseRecord>,
}

/// Fusion plus response for one vehicle
pub struct VehicleGuard<C, N = TracingNotifier> {
    fusion: FusionEngine,
    responder: ResponseController<C, N>,
    respond_min_level: ThreatLevel,
}

impl<C> VehicleGuard<C, TracingNotifier>
where
    C: FlightCommandChannel + 'static,
{
    /// Guard with default tuning and a log-only notifier
    pub fn new(vehicle_id: impl Into<String>, channel: C) -> Self {
        Self::with_parts(
            FusionEngine::new(),
            ResponseController::new(vehicle_id, channel),
            DEFAULT_RESPOND_MIN_LEVEL,
        )
    }
}

impl<C, N> VehicleGuard<C, N>
where
    C: FlightCommandChannel + 'static,
    N: OperatorNotifier + 'static,
{
    /// Guard from already-built parts
    pub fn with_parts(
        fusion: FusionEngine,
        responder: ResponseController<C, N>,
        respond_min_level: ThreatLevel,
    ) -> Self {
        Self {
            fusion,
            responder,
            respond_min_level,
        }
    }

    /// Guard tuned from configuration
    pub fn from_config(
        vehicle_id: impl Into<String>,
        channel: C,
        notifier: N,
        config: &GuardConfig,
    ) -> Result<Self> {
        config.validate()?;
        let fusion = FusionEngine::from_config(&config.fusion)?;
        let responder =
            ResponseController::from_config(vehicle_id, channel, notifier, &config.response);
        let min_level = ThreatLevel::from(config.response.respond_min_level);
        Ok(Self::with_parts(fusion, responder, min_level))
    }

    /// Vehicle this guard serves
    pub fn vehicle_id(&self) -> &str {
        self.responder.vehicle_id()
    }

    /// Fusion engine
    pub fn fusion(&self) -> &FusionEngine {
        &self.fusion
    }

    /// Response controller
    pub fn responder(&self) -> &ResponseController<C, N> {
        &self.responder
    }

    /// Lowest level that triggers a response
    pub fn respond_min_level(&self) -> ThreatLevel {
        self.respond_min_level
    }

    /// Assess the readings and respond when the level warrants it
    pub async fn run_cycle(&self, readings: &SensorReadings) -> CycleOutcome {
        let label = readings.attack_type.as_deref().map(normalize_label);
        let assessment = self.fusion.assess(
            readings.rf_score,
            readings.gnss_score,
            label.as_deref(),
            readings.other.as_ref(),
            readings.weights.as_ref(),
        );

        if assessment.threat_level < self.respond_min_level {
            debug!(
                vehicle_id = %self.vehicle_id(),
                threat_level = assessment.threat_level.value(),
                "Below response level"
            );
            return CycleOutcome {
                assessment,
                response: None,
            };
        }

        let response = self
            .responder
            .respond(assessment.threat_level, assessment.attack_context())
            .await;

        CycleOutcome {
            assessment,
            response: Some(response),
        }
    }
}

/// Registry of per-vehicle guards
pub struct FleetGuard<C, N = TracingNotifier> {
    guards: HashMap<String, Arc<VehicleGuard<C, N>>>,
}

impl<C, N> Default for FleetGuard<C, N> {
    fn default() -> Self {
        Self {
            guards: HashMap::new(),
        }
    }
}

impl<C, N> FleetGuard<C, N>
where
    C: FlightCommandChannel + 'static,
    N: OperatorNotifier + 'static,
{
    /// Empty fleet
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vehicle; ids must be unique
    pub fn register(&mut self, guard: VehicleGuard<C, N>) -> Result<()> {
        let id = guard.vehicle_id().to_string();
        if self.guards.contains_key(&id) {
            return Err(GuardError::DuplicateVehicle(id));
        }
        info!(vehicle_id = %id, "Vehicle registered");
        self.guards.insert(id, Arc::new(guard));
        Ok(())
    }

    /// Remove a vehicle
    pub fn deregister(&mut self, vehicle_id: &str) -> Option<Arc<VehicleGuard<C, N>>> {
        self.guards.remove(vehicle_id)
    }

    /// Guard for a vehicle
    pub fn get(&self, vehicle_id: &str) -> Option<Arc<VehicleGuard<C, N>>> {
        self.guards.get(vehicle_id).cloned()
    }

    /// Registered vehicle ids, sorted
    pub fn vehicle_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.guards.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of vehicles
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// True when no vehicle is registered
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Run one cycle for one vehicle; `None` for an unknown id
    pub async fn run_cycle(
        &self,
        vehicle_id: &str,
        readings: &SensorReadings,
    ) -> Option<CycleOutcome> {
        let guard = self.get(vehicle_id)?;
        Some(guard.run_cycle(readings).await)
    }

    /// Run one cycle for each listed vehicle concurrently.
    ///
    /// Unknown ids are skipped.
    pub async fn run_all(
        &self,
        readings: HashMap<String, SensorReadings>,
    ) -> BTreeMap<String, CycleOutcome> {
        let mut tasks = JoinSet::new();
        for (vehicle_id, reading) in readings {
            let Some(guard) = self.get(&vehicle_id) else {
                debug!(vehicle_id = %vehicle_id, "Readings for unknown vehicle dropped");
                continue;
            };
            tasks.spawn(async move {
                let outcome = guard.run_cycle(&reading).await;
                (vehicle_id, outcome)
            });
        }

        let mut outcomes = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((vehicle_id, outcome)) => {
                    outcomes.insert(vehicle_id, outcome);
                }
                Err(e) => error!(error = %e, "Detection cycle task failed"),
            }
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ResponseAction;
    use uavguard_flight::{FlightMode, ScriptedFlightController, SimulatedFlightController};

    #[tokio::test]
    async fn test_cycle_below_threshold_skips_response() {
        let guard = VehicleGuard::new("uav-1", SimulatedFlightController::new());
        let outcome = guard
            .run_cycle(&SensorReadings::new(0.5, 0.2).with_attack_type("signal_interference"))
            .await;

        assert_eq!(outcome.assessment.threat_level, ThreatLevel::Suspicious);
        assert!(outcome.response.is_none());
        assert!(outcome.assessment.attack_types.contains("Signal Interference"));
        assert!(guard.responder().incidents().await.is_empty());
    }

    #[tokio::test]
    async fn test_cycle_triggers_response() {
        let guard = VehicleGuard::new("uav-1", SimulatedFlightController::new());
        let outcome = guard
            .run_cycle(&SensorReadings::new(0.9, 0.1).with_attack_type("Jamming Attack"))
            .await;

        assert_eq!(outcome.assessment.combined_score, 0.58);
        let response = outcome.response.unwrap();
        assert_eq!(response.threat_level, ThreatLevel::ConfirmedLow);
        assert!(response.contains(ResponseAction::ReturnToHomeInitiated));

        let incidents = guard.responder().incidents().await;
        assert_eq!(incidents[0].attack_context.details["combined_score"], 0.58);
    }

    #[tokio::test]
    async fn test_from_config_sets_trigger_level() {
        let mut config = GuardConfig::default();
        config.response.respond_min_level = 0;

        let guard = VehicleGuard::from_config(
            "uav-1",
            ScriptedFlightController::new(),
            TracingNotifier,
            &config,
        )
        .unwrap();
        let outcome = guard.run_cycle(&SensorReadings::new(0.0, 0.0)).await;

        assert_eq!(guard.respond_min_level(), ThreatLevel::Normal);
        assert_eq!(
            outcome.response.unwrap().actions_taken,
            vec![ResponseAction::NormalLogging]
        );
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = GuardConfig::default();
        config.fusion.thresholds.suspicious = 0.9;

        let result = VehicleGuard::from_config(
            "uav-1",
            ScriptedFlightController::new(),
            TracingNotifier,
            &config,
        );
        assert!(matches!(result, Err(GuardError::Config(_))));
    }

    #[tokio::test]
    async fn test_fleet_registry() {
        let mut fleet = FleetGuard::new();
        fleet
            .register(VehicleGuard::new("uav-b", SimulatedFlightController::new()))
            .unwrap();
        fleet
            .register(VehicleGuard::new("uav-a", SimulatedFlightController::new()))
            .unwrap();

        assert!(matches!(
            fleet.register(VehicleGuard::new("uav-a", SimulatedFlightController::new())),
            Err(GuardError::DuplicateVehicle(_))
        ));
        assert_eq!(fleet.vehicle_ids(), vec!["uav-a", "uav-b"]);
        assert!(fleet.run_cycle("uav-z", &SensorReadings::new(1.0, 1.0)).await.is_none());

        assert!(fleet.deregister("uav-b").is_some());
        assert_eq!(fleet.len(), 1);
    }

    #[tokio::test]
    async fn test_fleet_vehicles_are_independent() {
        let mut fleet = FleetGuard::new();
        for id in ["uav-1", "uav-2"] {
            fleet
                .register(VehicleGuard::new(id, SimulatedFlightController::new()))
                .unwrap();
        }

        let readings: HashMap<String, SensorReadings> = [
            ("uav-1".to_string(), SensorReadings::new(1.0, 1.0)),
            ("uav-2".to_string(), SensorReadings::new(0.1, 0.1)),
            ("uav-9".to_string(), SensorReadings::new(1.0, 1.0)),
        ]
        .into_iter()
        .collect();

        let outcomes = fleet.run_all(readings).await;
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes["uav-1"].assessment.threat_level, ThreatLevel::Critical);
        assert!(outcomes["uav-2"].response.is_none());

        let first = fleet.get("uav-1").unwrap();
        let second = fleet.get("uav-2").unwrap();
        assert_eq!(first.responder().drone_state().await.flight_mode, FlightMode::Land);
        assert_eq!(second.responder().drone_state().await.flight_mode, FlightMode::Loiter);
    }
}
