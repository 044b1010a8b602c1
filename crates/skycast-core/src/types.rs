//! Core data types for weather samples and daily summaries

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::units::{convert, UnitGroup, UnitSystem};

/// Timestamp type (Unix epoch seconds)
pub type Timestamp = i64;

/// Broad condition category, derived from the OpenWeatherMap condition id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConditionCategory {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Atmosphere,
    Clear,
    Clouds,
    #[default]
    Unknown,
}

impl ConditionCategory {
    /// Map an OpenWeatherMap condition id to its group
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_code(id: u16) -> Self {
        match id {
            200..=299 => Self::Thunderstorm,
            300..=399 => Self::Drizzle,
            500..=599 => Self::Rain,
            600..=699 => Self::Snow,
            700..=799 => Self::Atmosphere,
            800 => Self::Clear,
            801..=899 => Self::Clouds,
            _ => Self::Unknown,
        }
    }
}

/// Structured weather condition attached to every sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherCondition {
    /// Provider condition code
    pub id: u16,
    pub description: String,
    pub category: ConditionCategory,
}

impl WeatherCondition {
    pub fn new(id: u16, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            category: ConditionCategory::from_code(id),
        }
    }
}

/// One measurement at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Unix timestamp the sample is valid for
    pub timestamp: Timestamp,

    pub temperature: f64,
    pub feels_like: f64,

    /// Relative humidity, percent
    pub humidity: u8,

    pub wind_speed: f64,

    /// Pressure in hPa
    pub pressure: f64,

    /// Probability of precipitation in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation_probability: Option<f64>,

    /// Visibility in metres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,

    pub condition: WeatherCondition,
}

impl WeatherSample {
    /// Re-express temperature and wind speed in another unit system
    pub fn to_units(&self, from: UnitSystem, to: UnitSystem) -> Self {
        Self {
            temperature: convert(self.temperature, from, to, UnitGroup::Temperature),
            feels_like: convert(self.feels_like, from, to, UnitGroup::Temperature),
            wind_speed: convert(self.wind_speed, from, to, UnitGroup::Speed),
            pressure: convert(self.pressure, from, to, UnitGroup::Pressure),
            ..self.clone()
        }
    }
}

/// Calendar date in the viewer's local timezone, rendered as `YYYY-MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalDateKey(NaiveDate);

impl LocalDateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for LocalDateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for LocalDateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for LocalDateKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Self)
    }
}

impl Serialize for LocalDateKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LocalDateKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One aggregated forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: LocalDateKey,

    /// Unrounded extrema; rounding is a display concern
    pub temperature_min: f64,
    pub temperature_max: f64,

    /// Mean rounded half-up, then clamped into `[min, max]`. When the
    /// extrema are fractional the clamp can leave a non-integer here.
    pub temperature_avg: f64,
    pub feels_like_avg: f64,
    pub humidity_avg: u8,
    pub pressure_avg: i64,

    /// Mean wind speed, one decimal place
    pub wind_speed_avg: f64,

    pub precipitation_probability_max: f64,

    /// Condition of the sample at the middle index of the day
    pub representative_condition: WeatherCondition,

    pub sample_count: usize,
}
