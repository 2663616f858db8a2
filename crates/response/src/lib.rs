//! Autonomous threat response for UAV Guard.
//!
//! [`ResponseController`] turns a threat level and attack context into
//! flight commands, operator alerts and a hash-chained incident entry, and
//! returns a [`ResponseRecord`] describing exactly what happened. Failed
//! countermeasures are recorded, never masked.
//!
//! [`VehicleGuard`] wires one fusion engine and one controller together for
//! a single vehicle; [`FleetGuard`] keeps one guard per vehicle.
//!
//! # Example
//!
//! ```
//! use uavguard_core::{AttackContext, ThreatLevel};
//! use uavguard_flight::{FlightMode, SimulatedFlightController};
//! use uavguard_response::{ResponseAction, ResponseController};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let controller = ResponseController::new("uav-1", SimulatedFlightController::new());
//! let context = AttackContext::from_labels(["GPS Spoofing"]);
//!
//! let record = controller.respond(ThreatLevel::ConfirmedHigh, context).await;
//!
//! assert!(record.success);
//! assert!(record.contains(ResponseAction::ImuHoverActivated));
//! assert_eq!(controller.drone_state().await.flight_mode, FlightMode::AltHold);
//! # }
//! ```

#![warn(missing_docs)]

pub mod action;
pub mod controller;
pub mod error;
pub mod guard;
pub mod incident;
pub mod notify;
pub mod record;

pub use action::{ActionFailure, ResponseAction};
pub use controller::{ResponseController, TelemetryProfile, REDUCED_SPEED_CEILING_PCT};
pub use error::{GuardError, NotifyError, Result};
pub use guard::{CycleOutcome, FleetGuard, SensorReadings, VehicleGuard};
pub use incident::{ChainFault, IncidentEntry, IncidentLog, GENESIS_HASH};
pub use notify::{OperatorAlert, OperatorNotifier, QueueNotifier, TracingNotifier};
pub use record::ResponseRecord;
