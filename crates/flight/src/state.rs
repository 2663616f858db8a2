//! Vehicle state owned by a flight command channel

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uavguard_core::SensorKind;

use crate::error::FlightError;

/// Validated flight modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightMode {
    /// Manual attitude stabilization
    Stabilize,
    /// Hold position
    Loiter,
    /// Return to launch
    Rtl,
    /// Land at the current position
    Land,
    /// Follow position setpoints
    Guided,
    /// Run the uploaded mission
    Auto,
    /// Hold altitude on inertial and barometric data
    AltHold,
}

impl FlightMode {
    /// Every mode
    pub const ALL: [FlightMode; 7] = [
        FlightMode::Stabilize,
        FlightMode::Loiter,
        FlightMode::Rtl,
        FlightMode::Land,
        FlightMode::Guided,
        FlightMode::Auto,
        FlightMode::AltHold,
    ];

    /// Autopilot mode name
    pub fn as_str(self) -> &'static str {
        match self {
            FlightMode::Stabilize => "STABILIZE",
            FlightMode::Loiter => "LOITER",
            FlightMode::Rtl => "RTL",
            FlightMode::Land => "LAND",
            FlightMode::Guided => "GUIDED",
            FlightMode::Auto => "AUTO",
            FlightMode::AltHold => "ALT_HOLD",
        }
    }
}

impl fmt::Display for FlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlightMode {
    type Err = FlightError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        FlightMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FlightError::InvalidMode(raw.to_string()))
    }
}

/// Source of position and velocity estimates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationSource {
    /// Satellite positioning fused with inertial data
    Gnss,
    /// IMU and barometer only
    InertialBarometric,
}

/// Active communications profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommsProfile {
    /// Normal telemetry and command links
    Primary,
    /// Hardened fallback channel
    Emergency,
}

/// Geodetic position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Altitude above home in metres
    pub alt: f64,
}

/// Vehicle attitude in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Attitude {
    /// Roll
    pub roll: f64,
    /// Pitch
    pub pitch: f64,
    /// Yaw
    pub yaw: f64,
}

/// Snapshot of the vehicle as seen by its command channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneState {
    /// Current flight mode
    pub flight_mode: FlightMode,
    /// Motors armed
    pub armed: bool,
    /// Last commanded or reported position
    pub position: Position,
    /// Remaining battery
    pub battery_pct: f64,
    /// Attitude
    pub attitude: Attitude,
    /// Navigation estimate source
    pub navigation_source: NavigationSource,
    /// Speed ceiling as a percentage of the airframe maximum
    pub speed_ceiling_pct: u8,
    /// External command links accepted
    pub external_links_enabled: bool,
    /// Communications profile
    pub comms_profile: CommsProfile,
    /// Sensors excluded from estimation
    pub isolated_sensors: BTreeSet<SensorKind>,
}

impl Default for DroneState {
    fn default() -> Self {
        Self {
            flight_mode: FlightMode::Loiter,
            armed: false,
            position: Position::default(),
            battery_pct: 100.0,
            attitude: Attitude::default(),
            navigation_source: NavigationSource::Gnss,
            speed_ceiling_pct: 100,
            external_links_enabled: true,
            comms_profile: CommsProfile::Primary,
            isolated_sensors: BTreeSet::new(),
        }
    }
}

impl DroneState {
    /// True while navigation still trusts satellite positioning
    pub fn uses_gnss(&self) -> bool {
        self.navigation_source == NavigationSource::Gnss
            && !self.isolated_sensors.contains(&SensorKind::GnssReceiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing_is_case_insensitive() {
        assert_eq!("rtl".parse::<FlightMode>().unwrap(), FlightMode::Rtl);
        assert_eq!(" Alt_Hold ".parse::<FlightMode>().unwrap(), FlightMode::AltHold);
        assert_eq!(
            "BOGUS".parse::<FlightMode>(),
            Err(FlightError::InvalidMode("BOGUS".to_string()))
        );
    }

    #[test]
    fn test_mode_names_round_trip() {
        for mode in FlightMode::ALL {
            assert_eq!(mode.as_str().parse::<FlightMode>().unwrap(), mode);
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
        }
    }

    #[test]
    fn test_initial_state() {
        let state = DroneState::default();
        assert_eq!(state.flight_mode, FlightMode::Loiter);
        assert!(!state.armed);
        assert_eq!(state.battery_pct, 100.0);
        assert_eq!(state.speed_ceiling_pct, 100);
        assert!(state.external_links_enabled);
        assert!(state.uses_gnss());
    }
}
