//! Flight command structures with pre-transmission validation

use serde::{Deserialize, Serialize};
use uavguard_core::SensorKind;

use crate::error::{FlightError, Result};
use crate::state::{CommsProfile, DroneState, FlightMode, NavigationSource, Position};

/// Command accepted by a flight command channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum FlightCommand {
    /// Switch flight mode
    SetMode {
        /// Target mode
        mode: FlightMode,
    },

    /// Fly to a position
    ///
    /// Requires lat in [-90, 90], lon in [-180, 180], alt >= 0.
    PositionSetpoint {
        /// Latitude in degrees
        lat: f64,
        /// Longitude in degrees
        lon: f64,
        /// Altitude in metres
        alt: f64,
    },

    /// Force return to launch (cannot be refused)
    Failsafe,

    /// Select the navigation estimate source
    SetNavigationSource {
        /// Source to use
        source: NavigationSource,
    },

    /// Cap speed at a percentage of the airframe maximum
    LimitSpeed {
        /// Ceiling in 1..=100
        ceiling_pct: u8,
    },

    /// Accept or drop external command links
    SetExternalLinks {
        /// Links enabled
        enabled: bool,
    },

    /// Exclude a sensor from estimation
    IsolateSensor {
        /// Sensor to isolate
        sensor: SensorKind,
    },

    /// Switch communications profile
    SetCommsProfile {
        /// Profile to use
        profile: CommsProfile,
    },
}

impl FlightCommand {
    /// Create a mode change
    pub fn set_mode(mode: FlightMode) -> Self {
        Self::SetMode { mode }
    }

    /// Create a position setpoint
    pub fn position(lat: f64, lon: f64, alt: f64) -> Self {
        Self::PositionSetpoint { lat, lon, alt }
    }

    /// Stable command name for logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            FlightCommand::SetMode { .. } => "set_mode",
            FlightCommand::PositionSetpoint { .. } => "position_setpoint",
            FlightCommand::Failsafe => "failsafe",
            FlightCommand::SetNavigationSource { .. } => "set_navigation_source",
            FlightCommand::LimitSpeed { .. } => "limit_speed",
            FlightCommand::SetExternalLinks { .. } => "set_external_links",
            FlightCommand::IsolateSensor { .. } => "isolate_sensor",
            FlightCommand::SetCommsProfile { .. } => "set_comms_profile",
        }
    }

    /// True for the failsafe command
    pub fn is_failsafe(&self) -> bool {
        matches!(self, FlightCommand::Failsafe)
    }

    /// Verify the command can be executed safely.
    ///
    /// Runs before any transmission; a command that fails here must not
    /// touch vehicle state.
    pub fn validate(&self) -> Result<()> {
        match self {
            FlightCommand::PositionSetpoint { lat, lon, alt } => {
                let valid = lat.is_finite()
                    && lon.is_finite()
                    && alt.is_finite()
                    && (-90.0..=90.0).contains(lat)
                    && (-180.0..=180.0).contains(lon)
                    && *alt >= 0.0;
                if !valid {
                    return Err(FlightError::InvalidPosition {
                        lat: *lat,
                        lon: *lon,
                        alt: *alt,
                    });
                }
                Ok(())
            }
            FlightCommand::LimitSpeed { ceiling_pct } => {
                if !(1..=100).contains(ceiling_pct) {
                    return Err(FlightError::InvalidSpeedCeiling(*ceiling_pct));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Apply an accepted command to a state snapshot
    pub fn apply_to(&self, state: &mut DroneState) {
        match self {
            FlightCommand::SetMode { mode } => state.flight_mode = *mode,
            FlightCommand::PositionSetpoint { lat, lon, alt } => {
                state.position = Position {
                    lat: *lat,
                    lon: *lon,
                    alt: *alt,
                };
            }
            FlightCommand::Failsafe => state.flight_mode = FlightMode::Rtl,
            FlightCommand::SetNavigationSource { source } => state.navigation_source = *source,
            FlightCommand::LimitSpeed { ceiling_pct } => state.speed_ceiling_pct = *ceiling_pct,
            FlightCommand::SetExternalLinks { enabled } => state.external_links_enabled = *enabled,
            FlightCommand::IsolateSensor { sensor } => {
                state.isolated_sensors.insert(*sensor);
            }
            FlightCommand::SetCommsProfile { profile } => state.comms_profile = *profile,
        }
    }
}

/// Positive acknowledgement of an executed command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandAck {
    /// Command that was executed
    pub command: FlightCommand,
    /// Execution time in milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

impl CommandAck {
    /// Acknowledge a command now
    pub fn now(command: FlightCommand) -> Self {
        Self {
            command,
            timestamp_ms: uavguard_core::current_timestamp_ms(),
        }
    }
}
