//! Capability interface to a vehicle's navigation and control surface

use async_trait::async_trait;

use crate::command::{CommandAck, FlightCommand};
use crate::error::Result;
use crate::state::{DroneState, FlightMode};

/// Single point of contact with one vehicle's flight controller.
///
/// Implementations own the vehicle's [`DroneState`] and mutate it only after
/// a command has passed [`FlightCommand::validate`] and been executed. A
/// rejected command returns `Err` and leaves state untouched. Real adapters
/// may suspend while waiting on a link but must return within a bounded
/// time, reporting a timeout as an error rather than hanging.
#[async_trait]
pub trait FlightCommandChannel: Send + Sync {
    /// Validate and execute one command
    async fn send(&mut self, command: FlightCommand) -> Result<CommandAck>;

    /// Snapshot copy of the current state
    fn read_state(&self) -> DroneState;

    /// Switch flight mode
    async fn change_flight_mode(&mut self, mode: FlightMode) -> Result<CommandAck> {
        self.send(FlightCommand::set_mode(mode)).await
    }

    /// Switch flight mode by name; unknown names fail without sending anything
    async fn request_flight_mode(&mut self, mode: &str) -> Result<CommandAck> {
        let mode = mode.parse::<FlightMode>()?;
        self.change_flight_mode(mode).await
    }

    /// Fly to a validated position
    async fn set_position_setpoint(&mut self, lat: f64, lon: f64, alt: f64) -> Result<CommandAck> {
        self.send(FlightCommand::position(lat, lon, alt)).await
    }

    /// Force return to launch; implementations must not refuse it
    async fn trigger_failsafe(&mut self) -> Result<CommandAck> {
        self.send(FlightCommand::Failsafe).await
    }
}
