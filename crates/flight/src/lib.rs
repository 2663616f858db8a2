//! Flight command channel for UAV Guard.
//!
//! All interaction with a vehicle's navigation and control surface goes
//! through the [`FlightCommandChannel`] trait. Three implementations ship
//! with the crate:
//!
//! - [`SimulatedFlightController`]: in-memory reference controller
//! - [`ScriptedFlightController`]: deterministic test double with injectable
//!   rejections, timeouts and latency
//! - [`LinkedFlightController`]: adapter over an asynchronous
//!   [`CommandLink`] transport with bounded command latency
//!
//! Every command is validated before it is transmitted. A command that
//! fails validation, or that the controller refuses, leaves the vehicle
//! state unchanged.

#![warn(missing_docs)]

pub mod channel;
pub mod command;
pub mod error;
pub mod link;
pub mod scripted;
pub mod simulated;
pub mod state;

pub use channel::FlightCommandChannel;
pub use command::{CommandAck, FlightCommand};
pub use error::{FlightError, Result};
pub use link::{CommandLink, LinkAck, LinkError, LinkRequest, LinkedFlightController, QueueLink};
pub use scripted::{CommandMatcher, Fault, ScriptedFlightController};
pub use simulated::SimulatedFlightController;
pub use state::{Attitude, CommsProfile, DroneState, FlightMode, NavigationSource, Position};
