//! Unit systems and conversion utilities
//!
//! Values arrive from the provider already expressed in the requested
//! unit system; conversion is only needed when re-expressing data that
//! has already been fetched.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit conversion error
#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    #[error("Unknown unit system: {0}")]
    UnknownUnitSystem(String),
}

/// Unit system selected by the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// °C, m/s, hPa
    #[default]
    Metric,
    /// °F, mph, hPa
    Imperial,
}

impl UnitSystem {
    /// Value of the provider's `units` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }

    pub fn speed_symbol(&self) -> &'static str {
        match self {
            Self::Metric => "m/s",
            Self::Imperial => "mph",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for UnitSystem {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" => Ok(Self::Metric),
            "imperial" => Ok(Self::Imperial),
            other => Err(UnitError::UnknownUnitSystem(other.to_string())),
        }
    }
}

/// Unit group for sample fields that differ between systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitGroup {
    Temperature,
    Speed,
    /// hPa in both systems
    Pressure,
}

const MPS_PER_MPH: f64 = 0.44704;

/// Convert value between unit systems
pub fn convert(value: f64, from: UnitSystem, to: UnitSystem, unit_group: UnitGroup) -> f64 {
    if from == to {
        return value;
    }

    // With two systems, `to` alone fixes the direction
    match (to, unit_group) {
        // C to F
        (UnitSystem::Imperial, UnitGroup::Temperature) => value * 9.0 / 5.0 + 32.0,
        // F to C
        (UnitSystem::Metric, UnitGroup::Temperature) => (value - 32.0) * 5.0 / 9.0,
        // m/s to mph
        (UnitSystem::Imperial, UnitGroup::Speed) => value / MPS_PER_MPH,
        // mph to m/s
        (UnitSystem::Metric, UnitGroup::Speed) => value * MPS_PER_MPH,
        (_, UnitGroup::Pressure) => value,
    }
}
