//! Hardware adapter over an asynchronous command link
//!
//! The adapter owns a mirror of the vehicle state and forwards validated
//! commands to a [`CommandLink`]. It updates the mirror only on a positive
//! acknowledgement, and bounds every round trip with a timeout so a silent
//! link is reported as a failure instead of hanging the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};
use uavguard_core::LinkConfig;

use crate::channel::FlightCommandChannel;
use crate::command::{CommandAck, FlightCommand};
use crate::error::{FlightError, Result};
use crate::state::{DroneState, FlightMode};

/// Flight controller answer to one command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinkAck {
    /// Command executed
    Accepted,
    /// Command refused by the autopilot
    Denied {
        /// Autopilot-supplied reason
        reason: String,
    },
}

/// Transport failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinkError {
    /// Remote end is gone
    #[error("link closed")]
    Closed,

    /// Transport-level fault
    #[error("transport error: {0}")]
    Transport(String),
}

/// Transport to a flight controller.
///
/// The wire encoding belongs to the implementation.
#[async_trait]
pub trait CommandLink: Send + Sync {
    /// Deliver one command and wait for the autopilot's answer
    async fn transmit(
        &mut self,
        command: &FlightCommand,
    ) -> std::result::Result<LinkAck, LinkError>;
}

/// Flight command channel backed by a [`CommandLink`]
#[derive(Debug)]
pub struct LinkedFlightController<L> {
    link: L,
    mirror: DroneState,
    command_timeout: Duration,
}

impl<L: CommandLink> LinkedFlightController<L> {
    /// Adapter with an explicit command timeout
    pub fn new(link: L, command_timeout: Duration) -> Self {
        Self {
            link,
            mirror: DroneState::default(),
            command_timeout,
        }
    }

    /// Adapter configured from the link section
    pub fn from_config(link: L, config: &LinkConfig) -> Self {
        Self::new(link, config.command_timeout())
    }

    /// Seed the mirrored state, e.g. from the autopilot's first heartbeat
    pub fn with_state(mut self, state: DroneState) -> Self {
        self.mirror = state;
        self
    }

    /// Underlying link
    pub fn link(&self) -> &L {
        &self.link
    }

    async fn round_trip(&mut self, command: &FlightCommand) -> Result<()> {
        let timeout_ms = self.command_timeout.as_millis() as u64;

        match tokio::time::timeout(self.command_timeout, self.link.transmit(command)).await {
            Ok(Ok(LinkAck::Accepted)) => Ok(()),
            Ok(Ok(LinkAck::Denied { reason })) => Err(FlightError::Rejected {
                command: command.kind(),
                reason,
            }),
            Ok(Err(e)) => Err(FlightError::LinkDown(e.to_string())),
            Err(_) => Err(FlightError::Timeout {
                command: command.kind(),
                timeout_ms,
            }),
        }
    }
}

#[async_trait]
impl<L: CommandLink> FlightCommandChannel for LinkedFlightController<L> {
    async fn send(&mut self, command: FlightCommand) -> Result<CommandAck> {
        command.validate()?;

        match self.round_trip(&command).await {
            Ok(()) => {
                info!(command = command.kind(), "Command acknowledged by autopilot");
                command.apply_to(&mut self.mirror);
                Ok(CommandAck::now(command))
            }
            Err(e) if command.is_failsafe() => {
                // Failsafe cannot be refused; the autopilot's own link-loss
                // failsafe is expected to fire when the link is down.
                error!(error = %e, "Failsafe not acknowledged, assuming RTL");
                self.mirror.flight_mode = FlightMode::Rtl;
                Ok(CommandAck::now(command))
            }
            Err(e) => {
                warn!(command = command.kind(), error = %e, "Command failed on link");
                Err(e)
            }
        }
    }

    fn read_state(&self) -> DroneState {
        self.mirror.clone()
    }
}

/// Command waiting for a link task
#[derive(Debug)]
pub struct LinkRequest {
    /// Command to deliver
    pub command: FlightCommand,
    /// Where to send the autopilot's answer
    pub reply: oneshot::Sender<LinkAck>,
}

/// [`CommandLink`] that hands commands to a separate task over a channel.
///
/// The task owning the receiver performs the actual I/O. Dropping the
/// receiver, or dropping a request without replying, reads as a closed
/// link.
#[derive(Debug, Clone)]
pub struct QueueLink {
    tx: mpsc::Sender<LinkRequest>,
}

impl QueueLink {
    /// Create a link and the receiver its I/O task drains
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<LinkRequest>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { tx }, rx)
    }
}

#[async_trait]
impl CommandLink for QueueLink {
    async fn transmit(
        &mut self,
        command: &FlightCommand,
    ) -> std::result::Result<LinkAck, LinkError> {
        let (reply, answer) = oneshot::channel();
        self.tx
            .send(LinkRequest {
                command: command.clone(),
                reply,
            })
            .await
            .map_err(|_| LinkError::Closed)?;
        answer.await.map_err(|_| LinkError::Closed)
    }
}
