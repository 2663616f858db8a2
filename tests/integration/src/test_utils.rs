//! Test utilities for pipeline integration tests

use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use uavguard_flight::{
    FlightCommand, FlightMode, LinkAck, LinkRequest, LinkedFlightController, QueueLink,
    ScriptedFlightController, SimulatedFlightController,
};
use uavguard_response::{QueueNotifier, VehicleGuard};

/// Route test logs through the test harness; safe to call from every test
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Guard over the simulated controller with default tuning
pub fn simulated_guard(vehicle_id: &str) -> VehicleGuard<SimulatedFlightController> {
    VehicleGuard::new(vehicle_id, SimulatedFlightController::new())
}

/// Guard over a scripted controller
pub fn scripted_guard(
    vehicle_id: &str,
    channel: ScriptedFlightController,
) -> VehicleGuard<ScriptedFlightController> {
    VehicleGuard::new(vehicle_id, channel)
}

/// Guard delivering alerts to a queue, plus the queue's receiver
pub fn queued_guard(
    vehicle_id: &str,
) -> (
    VehicleGuard<SimulatedFlightController, QueueNotifier>,
    mpsc::Receiver<uavguard_response::OperatorAlert>,
) {
    let (notifier, rx) = QueueNotifier::channel(16);
    let responder = uavguard_response::ResponseController::with_notifier(
        vehicle_id,
        SimulatedFlightController::new(),
        notifier,
    );
    let guard = VehicleGuard::with_parts(
        uavguard_fusion::FusionEngine::new(),
        responder,
        uavguard_core::ThreatLevel::ConfirmedLow,
    );
    (guard, rx)
}

/// How the simulated autopilot behind a link answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutopilotBehavior {
    /// Accept every command
    AcceptAll,
    /// Deny mode changes to the given mode
    DenyMode(FlightMode),
    /// Never answer anything
    Silent,
}

/// Link adapter wired to an autopilot task with the given behavior
pub fn linked_controller(
    behavior: AutopilotBehavior,
    command_timeout: Duration,
) -> LinkedFlightController<QueueLink> {
    let (link, rx) = QueueLink::channel(16);
    spawn_autopilot(rx, behavior);
    LinkedFlightController::new(link, command_timeout)
}

fn spawn_autopilot(mut rx: mpsc::Receiver<LinkRequest>, behavior: AutopilotBehavior) {
    tokio::spawn(async move {
        // Held requests keep their reply senders alive so silent links time out
        let mut held = Vec::new();
        while let Some(request) = rx.recv().await {
            if behavior == AutopilotBehavior::Silent {
                held.push(request);
                continue;
            }
            let answer = match (behavior, &request.command) {
                (AutopilotBehavior::DenyMode(denied), FlightCommand::SetMode { mode })
                    if *mode == denied =>
                {
                    LinkAck::Denied {
                        reason: format!("{} unavailable", denied),
                    }
                }
                _ => LinkAck::Accepted,
            };
            let _ = request.reply.send(answer);
        }
    });
}
