//! Hourly breakdown views over a sample sequence

use chrono::TimeZone;

use crate::forecast::{local_date_key, ForecastResult};
use crate::types::{LocalDateKey, Timestamp, WeatherSample};

/// Samples falling on `date` in the viewer's timezone, in time order
pub fn samples_on_date<'a, Tz: TimeZone>(
    samples: &'a [WeatherSample],
    tz: &Tz,
    date: LocalDateKey,
) -> ForecastResult<Vec<&'a WeatherSample>> {
    let mut day = Vec::new();
    for sample in samples {
        if local_date_key(sample.timestamp, tz)? == date {
            day.push(sample);
        }
    }
    day.sort_by_key(|s| s.timestamp);
    Ok(day)
}

/// The next `count` samples valid at or after `from`
pub fn upcoming(samples: &[WeatherSample], from: Timestamp, count: usize) -> Vec<&WeatherSample> {
    let mut ahead: Vec<&WeatherSample> = samples.iter().filter(|s| s.timestamp >= from).collect();
    ahead.sort_by_key(|s| s.timestamp);
    ahead.truncate(count);
    ahead
}
