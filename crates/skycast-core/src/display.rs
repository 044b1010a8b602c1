//! Presentation helpers for forecast cards
//!
//! Everything here is formatting only. Aggregated values stay exact in
//! [`DailySummary`]; rounding for display happens in these functions.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::rollups::round_half_up;
use crate::types::{DailySummary, LocalDateKey};
use crate::units::UnitSystem;

/// "Today", "Tomorrow" or the short weekday name
pub fn day_label(date: LocalDateKey, reference: NaiveDate) -> String {
    relative_label(date, reference).unwrap_or_else(|| date.date().format("%a").to_string())
}

/// "Today", "Tomorrow" or e.g. "Wednesday, Oct 21"
pub fn full_date_label(date: LocalDateKey, reference: NaiveDate) -> String {
    relative_label(date, reference)
        .unwrap_or_else(|| date.date().format("%A, %b %-d").to_string())
}

fn relative_label(date: LocalDateKey, reference: NaiveDate) -> Option<String> {
    if date.date() == reference {
        Some("Today".to_string())
    } else if reference.checked_add_days(Days::new(1)) == Some(date.date()) {
        Some("Tomorrow".to_string())
    } else {
        None
    }
}

/// Emoji for an OpenWeatherMap condition id
pub fn condition_icon(id: u16) -> &'static str {
    match id {
        200..=299 => "⛈️",
        300..=399 | 500..=599 => "🌧️",
        600..=699 => "❄️",
        700..=799 => "🌫️",
        800 => "☀️",
        801..=899 => "☁️",
        _ => "🌤️",
    }
}

pub fn format_temperature(value: f64, units: UnitSystem) -> String {
    format!("{}{}", round_half_up(value) as i64, units.temperature_symbol())
}

pub fn format_wind(speed: f64, units: UnitSystem) -> String {
    format!("{} {}", speed, units.speed_symbol())
}

/// Rain chance as a percentage; hidden when there is none
pub fn format_precipitation(probability: f64) -> Option<String> {
    (probability > 0.0).then(|| format!("{}%", round_half_up(probability * 100.0) as i64))
}

/// Footnote shown when the provider returned fewer days than requested
pub fn forecast_note(shown: usize, window_size: usize) -> Option<String> {
    match shown {
        0 => Some(format!(
            "No forecast data available for the next {window_size} days."
        )),
        n if n < window_size => Some(format!(
            "Only {n} days of forecast data available from the weather service."
        )),
        _ => None,
    }
}

/// A daily summary with its display strings attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyView {
    #[serde(flatten)]
    pub summary: DailySummary,
    pub day_label: String,
    pub full_date_label: String,
    pub icon: String,
    pub high: String,
    pub low: String,
    pub average: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain_chance: Option<String>,
}

impl DailyView {
    pub fn new(summary: DailySummary, reference: NaiveDate, units: UnitSystem) -> Self {
        Self {
            day_label: day_label(summary.date, reference),
            full_date_label: full_date_label(summary.date, reference),
            icon: condition_icon(summary.representative_condition.id).to_string(),
            high: format_temperature(summary.temperature_max, units),
            low: format_temperature(summary.temperature_min, units),
            average: format_temperature(summary.temperature_avg, units),
            feels_like: format_temperature(summary.feels_like_avg, units),
            humidity: format!("{}%", summary.humidity_avg),
            wind: format_wind(summary.wind_speed_avg, units),
            pressure: format!("{} hPa", summary.pressure_avg),
            rain_chance: format_precipitation(summary.precipitation_probability_max),
            summary,
        }
    }
}
