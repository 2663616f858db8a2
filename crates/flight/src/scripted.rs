//! Deterministic test double that fails on demand

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::channel::FlightCommandChannel;
use crate::command::{CommandAck, FlightCommand};
use crate::error::{FlightError, Result};
use crate::state::{DroneState, FlightMode};

/// Which commands a fault rule applies to
#[derive(Debug, Clone, PartialEq)]
pub enum CommandMatcher {
    /// Every command except failsafe
    Any,
    /// Commands of one kind, as named by [`FlightCommand::kind`]
    Kind(&'static str),
    /// Mode changes to one mode
    Mode(FlightMode),
}

impl CommandMatcher {
    fn matches(&self, command: &FlightCommand) -> bool {
        match self {
            CommandMatcher::Any => true,
            CommandMatcher::Kind(kind) => command.kind() == *kind,
            CommandMatcher::Mode(mode) => {
                matches!(command, FlightCommand::SetMode { mode: m } if m == mode)
            }
        }
    }
}

/// Injected failure
#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
    /// Refuse with a reason
    Reject(String),
    /// Report a link timeout
    Timeout,
}

#[derive(Debug, Clone)]
struct FaultRule {
    matcher: CommandMatcher,
    fault: Fault,
}

/// Flight controller whose failures are scripted by the test.
///
/// Records every command it receives, accepted or not, in arrival order.
/// Validation still runs first, so invalid commands fail exactly as they
/// would on a real controller. Failsafe is never faulted.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFlightController {
    state: DroneState,
    rules: Vec<FaultRule>,
    sent: Vec<FlightCommand>,
    latency: Option<Duration>,
}

impl ScriptedFlightController {
    /// Controller that accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a given state
    pub fn with_state(mut self, state: DroneState) -> Self {
        self.state = state;
        self
    }

    /// Sleep this long before answering each command
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Add a fault rule; the first matching rule wins
    pub fn fail_when(mut self, matcher: CommandMatcher, fault: Fault) -> Self {
        self.rules.push(FaultRule { matcher, fault });
        self
    }

    /// Refuse every command of one kind
    pub fn reject_kind(self, kind: &'static str, reason: impl Into<String>) -> Self {
        self.fail_when(CommandMatcher::Kind(kind), Fault::Reject(reason.into()))
    }

    /// Refuse mode changes to one mode
    pub fn reject_mode(self, mode: FlightMode, reason: impl Into<String>) -> Self {
        self.fail_when(CommandMatcher::Mode(mode), Fault::Reject(reason.into()))
    }

    /// Refuse everything except failsafe
    pub fn reject_all(self, reason: impl Into<String>) -> Self {
        self.fail_when(CommandMatcher::Any, Fault::Reject(reason.into()))
    }

    /// Time out every command of one kind
    pub fn time_out_kind(self, kind: &'static str) -> Self {
        self.fail_when(CommandMatcher::Kind(kind), Fault::Timeout)
    }

    /// Commands received so far, in order
    pub fn sent(&self) -> &[FlightCommand] {
        &self.sent
    }

    fn fault_for(&self, command: &FlightCommand) -> Option<&Fault> {
        if command.is_failsafe() {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(command))
            .map(|rule| &rule.fault)
    }
}

#[async_trait]
impl FlightCommandChannel for ScriptedFlightController {
    async fn send(&mut self, command: FlightCommand) -> Result<CommandAck> {
        self.sent.push(command.clone());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        command.validate()?;

        match self.fault_for(&command) {
            Some(Fault::Reject(reason)) => {
                debug!(command = command.kind(), %reason, "Scripted rejection");
                Err(FlightError::Rejected {
                    command: command.kind(),
                    reason: reason.clone(),
                })
            }
            Some(Fault::Timeout) => {
                debug!(command = command.kind(), "Scripted timeout");
                Err(FlightError::Timeout {
                    command: command.kind(),
                    timeout_ms: self.latency.map(|d| d.as_millis() as u64).unwrap_or(0),
                })
            }
            None => {
                command.apply_to(&mut self.state);
                Ok(CommandAck::now(command))
            }
        }
    }

    fn read_state(&self) -> DroneState {
        self.state.clone()
    }
}
