//! Data returned by the external collaborators

use serde::{Deserialize, Serialize};
use skycast_core::{Coordinates, Timestamp, UnitSystem, WeatherSample};
use std::fmt;
use std::str::FromStr;

/// A geocoding candidate for a free-text search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub coordinates: Coordinates,
    pub country: Option<String>,
    pub state: Option<String>,
}

impl Place {
    /// "Springfield, Illinois, US"
    pub fn display_name(&self) -> String {
        [Some(self.name.as_str()), self.state.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The location a provider resolved a query to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub name: String,
    pub country: Option<String>,
    pub coordinates: Coordinates,
    /// Offset of the location's own timezone from UTC, in seconds
    pub utc_offset_seconds: Option<i32>,
}

/// Current conditions at a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location: ResolvedLocation,
    pub units: UnitSystem,
    pub observed: WeatherSample,
    pub temperature_min: Option<f64>,
    pub temperature_max: Option<f64>,
    pub sunrise: Option<Timestamp>,
    pub sunset: Option<Timestamp>,
}

/// Short-interval forecast samples for a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub location: ResolvedLocation,
    pub units: UnitSystem,
    pub samples: Vec<WeatherSample>,
}

/// Categories of nearby points of interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceKind {
    Restaurant,
    Hospital,
    Lodging,
}

impl PlaceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Hospital => "hospital",
            Self::Lodging => "lodging",
        }
    }
}

impl fmt::Display for PlaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown place type: {0}")]
pub struct UnknownPlaceKind(pub String);

impl FromStr for PlaceKind {
    type Err = UnknownPlaceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restaurant" | "restaurants" => Ok(Self::Restaurant),
            "hospital" | "hospitals" => Ok(Self::Hospital),
            "lodging" | "hotel" | "hotels" => Ok(Self::Lodging),
            other => Err(UnknownPlaceKind(other.to_string())),
        }
    }
}

/// A nearby point of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub price_level: Option<u8>,
    pub open_now: Option<bool>,
    pub coordinates: Option<Coordinates>,
    pub photo_reference: Option<String>,
}

impl PointOfInterest {
    /// Link that opens the place on Google Maps
    pub fn maps_url(&self) -> String {
        match self.coordinates {
            Some(c) => format!(
                "https://www.google.com/maps/search/?api=1&query={},{}",
                c.latitude, c.longitude
            ),
            None => format!(
                "https://www.google.com/maps/search/?api=1&query={}",
                url::form_urlencoded::byte_serialize(self.name.as_bytes()).collect::<String>()
            ),
        }
    }
}

/// A location-themed video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub published_at: Option<String>,
    pub thumbnail: Option<String>,
}

impl Video {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}
