//! Location search input parsing

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("Location query is empty")]
    Empty,

    #[error("Latitude should be between -90 and 90")]
    LatitudeOutOfRange(f64),

    #[error("Longitude should be between -180 and 180")]
    LongitudeOutOfRange(f64),
}

/// A validated coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, QueryError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(QueryError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(QueryError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// What the user typed into the search box
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates(Coordinates),
    Name(String),
}

impl LocationQuery {
    /// Parse `"lat,lon"` as coordinates, anything else as a place name.
    ///
    /// Text with a comma whose halves are not both numbers ("Paris, FR")
    /// is treated as a name.
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }

        if let Some((lat, lon)) = trimmed.split_once(',') {
            if let (Ok(lat), Ok(lon)) = (lat.trim().parse::<f64>(), lon.trim().parse::<f64>()) {
                return Coordinates::new(lat, lon).map(Self::Coordinates);
            }
        }

        Ok(Self::Name(trimmed.to_string()))
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinates(c) => c.fmt(f),
            Self::Name(name) => f.write_str(name),
        }
    }
}
