//! In-memory flight controller

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::channel::FlightCommandChannel;
use crate::command::{CommandAck, FlightCommand};
use crate::error::Result;
use crate::state::DroneState;

/// Reference controller that executes every valid command immediately
#[derive(Debug, Clone, Default)]
pub struct SimulatedFlightController {
    state: DroneState,
}

impl SimulatedFlightController {
    /// Controller in the initial state
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller starting from a given state
    pub fn with_state(state: DroneState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl FlightCommandChannel for SimulatedFlightController {
    async fn send(&mut self, command: FlightCommand) -> Result<CommandAck> {
        if let Err(e) = command.validate() {
            warn!(command = command.kind(), error = %e, "Flight command rejected");
            return Err(e);
        }

        match &command {
            FlightCommand::Failsafe => error!("Failsafe triggered, forcing RTL"),
            FlightCommand::SetMode { mode } => {
                warn!(from = %self.state.flight_mode, mode = %mode, "Flight mode change");
            }
            FlightCommand::PositionSetpoint { lat, lon, alt } => {
                info!(lat, lon, alt, "Position setpoint");
            }
            other => debug!(command = other.kind(), "Flight command executed"),
        }

        command.apply_to(&mut self.state);
        Ok(CommandAck::now(command))
    }

    fn read_state(&self) -> DroneState {
        self.state.clone()
    }
}
