//! Daily forecast aggregation
//!
//! Turns the provider's flat sequence of 3-hour samples into a bounded run
//! of per-day summaries keyed by the viewer's local calendar date. The
//! viewer's timezone and the reference date are explicit inputs so that a
//! single request never re-reads the clock.

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::rollups::{round_half_up, round_to, Accumulator, AggregateType};
use crate::types::{DailySummary, LocalDateKey, Timestamp, WeatherSample};

/// Number of days shown by default
pub const DEFAULT_WINDOW_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForecastError {
    #[error("Cannot summarize an empty day group")]
    EmptyDayGroup,

    #[error("Malformed sample at {timestamp}: {reason}")]
    MalformedSample { timestamp: Timestamp, reason: String },

    #[error("Unknown start policy: {0}")]
    UnknownPolicy(String),
}

pub type ForecastResult<T> = Result<T, ForecastError>;

/// Which day the display window starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StartPolicy {
    /// Start at the reference date, back-filling when the data runs short
    #[default]
    TodayFirst,
    /// Only dates strictly after the reference date, never back-filled
    TomorrowFirst,
    /// The earliest available dates, whatever the reference date
    FirstAvailable,
}

impl StartPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TodayFirst => "today-first",
            Self::TomorrowFirst => "tomorrow-first",
            Self::FirstAvailable => "first-available",
        }
    }
}

impl fmt::Display for StartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StartPolicy {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "today-first" => Ok(Self::TodayFirst),
            "tomorrow-first" => Ok(Self::TomorrowFirst),
            "first-available" => Ok(Self::FirstAvailable),
            other => Err(ForecastError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Samples grouped by local calendar date, in ascending date order
pub type DayGroups<'a> = BTreeMap<LocalDateKey, Vec<&'a WeatherSample>>;

fn malformed(timestamp: Timestamp, reason: impl Into<String>) -> ForecastError {
    ForecastError::MalformedSample {
        timestamp,
        reason: reason.into(),
    }
}

/// Local calendar date of a timestamp in the given timezone
pub fn local_date_key<Tz: TimeZone>(timestamp: Timestamp, tz: &Tz) -> ForecastResult<LocalDateKey> {
    let instant = DateTime::<Utc>::from_timestamp(timestamp, 0)
        .ok_or_else(|| malformed(timestamp, "timestamp out of range"))?;
    Ok(LocalDateKey::new(instant.with_timezone(tz).date_naive()))
}

/// Partition samples by the viewer's local date.
///
/// Relative order inside each group follows the input; the input itself
/// does not need to be sorted or evenly spaced.
pub fn group_by_local_day<'a, Tz: TimeZone>(
    samples: &'a [WeatherSample],
    tz: &Tz,
) -> ForecastResult<DayGroups<'a>> {
    let mut grouped = DayGroups::new();
    for sample in samples {
        let key = local_date_key(sample.timestamp, tz)?;
        grouped.entry(key).or_default().push(sample);
    }
    Ok(grouped)
}

fn validate(sample: &WeatherSample) -> ForecastResult<()> {
    let numeric = [
        ("temperature", sample.temperature),
        ("feels_like", sample.feels_like),
        ("wind_speed", sample.wind_speed),
        ("pressure", sample.pressure),
    ];
    for (field, value) in numeric {
        if !value.is_finite() {
            return Err(malformed(sample.timestamp, format!("{field} is not finite")));
        }
    }
    if sample.humidity > 100 {
        return Err(malformed(
            sample.timestamp,
            format!("humidity {} exceeds 100%", sample.humidity),
        ));
    }
    if let Some(pop) = sample.precipitation_probability {
        if !(0.0..=1.0).contains(&pop) {
            return Err(malformed(
                sample.timestamp,
                format!("precipitation probability {pop} outside [0, 1]"),
            ));
        }
    }
    Ok(())
}

/// Summarize one day's samples.
///
/// The representative condition is the one at index `len / 2` of the group
/// as given, not the most frequent one.
pub fn summarize_day<S: Borrow<WeatherSample>>(
    date: LocalDateKey,
    samples: &[S],
) -> ForecastResult<DailySummary> {
    let middle: &WeatherSample = samples
        .get(samples.len() / 2)
        .ok_or(ForecastError::EmptyDayGroup)?
        .borrow();

    for sample in samples {
        validate(sample.borrow())?;
    }

    let stat = |aggregate: AggregateType, field: fn(&WeatherSample) -> f64| -> f64 {
        Accumulator::with_values(aggregate, samples.iter().map(|s| field(s.borrow())))
            .result()
            .unwrap_or_default()
    };

    let temperature_min = stat(AggregateType::Min, |s| s.temperature);
    let temperature_max = stat(AggregateType::Max, |s| s.temperature);
    // Rounding can push the mean past an extremum when every sample sits
    // inside the same half degree.
    let temperature_avg = round_half_up(stat(AggregateType::Avg, |s| s.temperature))
        .clamp(temperature_min, temperature_max);

    Ok(DailySummary {
        date,
        temperature_min,
        temperature_max,
        temperature_avg,
        feels_like_avg: round_half_up(stat(AggregateType::Avg, |s| s.feels_like)),
        humidity_avg: round_half_up(stat(AggregateType::Avg, |s| f64::from(s.humidity))) as u8,
        pressure_avg: round_half_up(stat(AggregateType::Avg, |s| s.pressure)) as i64,
        wind_speed_avg: round_to(stat(AggregateType::Avg, |s| s.wind_speed), 1),
        precipitation_probability_max: stat(AggregateType::Max, |s| {
            s.precipitation_probability.unwrap_or(0.0)
        }),
        representative_condition: middle.condition.clone(),
        sample_count: samples.len(),
    })
}

/// Pick which dates to display.
///
/// Every policy returns at most `window_size` dates, all present in
/// `groups`, strictly ascending and without repeats.
pub fn select_display_window<V>(
    groups: &BTreeMap<LocalDateKey, V>,
    reference: NaiveDate,
    window_size: usize,
    policy: StartPolicy,
) -> Vec<LocalDateKey> {
    if window_size == 0 {
        return Vec::new();
    }

    let available: Vec<LocalDateKey> = groups.keys().copied().collect();

    match policy {
        StartPolicy::TodayFirst => today_first(&available, LocalDateKey::new(reference), window_size),
        StartPolicy::TomorrowFirst => {
            let Some(cutoff) = reference.succ_opt() else {
                return Vec::new();
            };
            available
                .into_iter()
                .filter(|date| date.date() >= cutoff)
                .take(window_size)
                .collect()
        }
        StartPolicy::FirstAvailable => available.into_iter().take(window_size).collect(),
    }
}

fn today_first(
    available: &[LocalDateKey],
    reference: LocalDateKey,
    window_size: usize,
) -> Vec<LocalDateKey> {
    let Some(&earliest) = available.first() else {
        return Vec::new();
    };

    let start = if available.binary_search(&reference).is_ok() {
        reference
    } else {
        earliest
    };
    let end = start
        .date()
        .checked_add_days(Days::new(window_size as u64 - 1));

    let mut picked: BTreeSet<LocalDateKey> = available
        .iter()
        .copied()
        .filter(|date| *date >= start && end.map_or(true, |end| date.date() <= end))
        .collect();

    // Back-fill from the earliest dates not yet picked. Once this loop is
    // done the set holds min(window_size, available.len()) dates, which is
    // also what a restart from the first available dates would yield.
    for date in available {
        if picked.len() >= window_size {
            break;
        }
        picked.insert(*date);
    }

    picked.into_iter().collect()
}

/// Group, select and summarize in one pass
pub fn build_daily_forecast<Tz: TimeZone>(
    samples: &[WeatherSample],
    tz: &Tz,
    reference: NaiveDate,
    window_size: usize,
    policy: StartPolicy,
) -> ForecastResult<Vec<DailySummary>> {
    let grouped = group_by_local_day(samples, tz)?;
    let selected = select_display_window(&grouped, reference, window_size, policy);

    let mut days = Vec::with_capacity(selected.len());
    for date in selected {
        match grouped.get(&date) {
            Some(group) if !group.is_empty() => days.push(summarize_day(date, group)?),
            _ => continue,
        }
    }
    Ok(days)
}

/// Forecast settings bound to one viewer timezone
#[derive(Debug, Clone)]
pub struct ForecastAggregator<Tz: TimeZone> {
    tz: Tz,
    window_size: usize,
    policy: StartPolicy,
}

impl<Tz: TimeZone> ForecastAggregator<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            window_size: DEFAULT_WINDOW_SIZE,
            policy: StartPolicy::default(),
        }
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_policy(mut self, policy: StartPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn policy(&self) -> StartPolicy {
        self.policy
    }

    /// The viewer's calendar date at `now`
    pub fn reference_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.tz).date_naive()
    }

    /// Groups borrow from `samples`, not from the aggregator
    pub fn group<'a>(&self, samples: &'a [WeatherSample]) -> ForecastResult<DayGroups<'a>> {
        group_by_local_day(samples, &self.tz)
    }

    pub fn build(
        &self,
        samples: &[WeatherSample],
        reference: NaiveDate,
    ) -> ForecastResult<Vec<DailySummary>> {
        build_daily_forecast(samples, &self.tz, reference, self.window_size, self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WeatherCondition;
    use chrono::FixedOffset;

    fn sample(timestamp: Timestamp, temperature: f64, condition_id: u16) -> WeatherSample {
        WeatherSample {
            timestamp,
            temperature,
            feels_like: temperature - 1.0,
            humidity: 60,
            wind_speed: 3.0,
            pressure: 1013.0,
            precipitation_probability: None,
            visibility: None,
            condition: WeatherCondition::new(condition_id, format!("condition {condition_id}")),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn key(s: &str) -> LocalDateKey {
        s.parse().unwrap()
    }

    fn eastern_standard() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    /// Eight samples per local day at a 3-hour cadence
    fn days_of_samples(tz: &FixedOffset, first: NaiveDate, days: u64) -> Vec<WeatherSample> {
        let mut out = Vec::new();
        for day in 0..days {
            let d = first.checked_add_days(Days::new(day)).unwrap();
            for slot in 0..8u32 {
                let local = d.and_hms_opt(slot * 3, 0, 0).unwrap();
                let ts = tz.from_local_datetime(&local).unwrap().timestamp();
                out.push(sample(ts, 10.0 + f64::from(slot), 800 + slot as u16));
            }
        }
        out
    }

    fn groups_for(dates: &[&str]) -> BTreeMap<LocalDateKey, Vec<()>> {
        dates.iter().map(|d| (key(d), vec![()])).collect()
    }

    #[test]
    fn test_group_uses_local_date_not_utc() {
        let tz = eastern_standard();
        // 2024-01-10 23:30 local is 2024-01-11 04:30 UTC
        let late = tz
            .with_ymd_and_hms(2024, 1, 10, 23, 30, 0)
            .unwrap()
            .timestamp();
        let samples = vec![sample(late, 1.0, 800)];

        let grouped = group_by_local_day(&samples, &tz).unwrap();
        assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), vec![key("2024-01-10")]);

        let utc_grouped = group_by_local_day(&samples, &Utc).unwrap();
        assert!(utc_grouped.contains_key(&key("2024-01-11")));
    }

    #[test]
    fn test_group_partitions_unordered_input() {
        let tz = eastern_standard();
        let mut samples = days_of_samples(&tz, date("2024-02-01"), 3);
        samples.reverse();
        samples.swap(2, 17);

        let grouped = group_by_local_day(&samples, &tz).unwrap();
        let total: usize = grouped.values().map(Vec::len).sum();
        assert_eq!(total, samples.len());
        assert_eq!(grouped.len(), 3);

        for (day, group) in &grouped {
            for s in group {
                assert_eq!(local_date_key(s.timestamp, &tz).unwrap(), *day);
            }
            // relative input order is kept
            let positions: Vec<usize> = group
                .iter()
                .map(|s| samples.iter().position(|x| std::ptr::eq(x, *s)).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_group_empty_input() {
        let grouped = group_by_local_day(&[], &Utc).unwrap();
        assert!(grouped.is_empty());
    }

    #[test]
    fn test_group_rejects_unrepresentable_timestamp() {
        let samples = vec![sample(i64::MAX, 1.0, 800)];
        let err = group_by_local_day(&samples, &Utc).unwrap_err();
        assert!(matches!(err, ForecastError::MalformedSample { .. }));
    }

    #[test]
    fn test_summarize_middle_sample_and_extrema() {
        let samples = vec![sample(0, 10.0, 800), sample(1, 20.0, 500), sample(2, 15.0, 801)];
        let summary = summarize_day(key("1970-01-01"), &samples).unwrap();

        assert_eq!(summary.temperature_min, 10.0);
        assert_eq!(summary.temperature_max, 20.0);
        assert_eq!(summary.temperature_avg, 15.0);
        assert_eq!(summary.representative_condition.id, 500);
        assert_eq!(summary.sample_count, 3);
    }

    #[test]
    fn test_summarize_even_count_takes_upper_middle() {
        let samples: Vec<_> = (0..8).map(|i| sample(i, 5.0, 800 + i as u16)).collect();
        let summary = summarize_day(key("1970-01-01"), &samples).unwrap();
        assert_eq!(summary.representative_condition.id, 804);
    }

    #[test]
    fn test_summarize_rounding_rules() {
        let mut a = sample(0, 10.0, 800);
        let mut b = sample(1, 11.0, 800);
        let mut c = sample(2, 12.0, 800);
        a.humidity = 70;
        b.humidity = 71;
        c.humidity = 71;
        a.wind_speed = 1.0;
        b.wind_speed = 1.1;
        c.wind_speed = 1.2;
        a.pressure = 1012.0;
        b.pressure = 1013.0;
        c.pressure = 1013.0;
        a.precipitation_probability = Some(0.2);
        c.precipitation_probability = Some(0.65);

        let summary = summarize_day(key("1970-01-01"), &[a, b, c]).unwrap();
        assert_eq!(summary.humidity_avg, 71);
        assert_eq!(summary.pressure_avg, 1013);
        assert_eq!(summary.wind_speed_avg, 1.1);
        assert_eq!(summary.feels_like_avg, 10.0);
        assert_eq!(summary.precipitation_probability_max, 0.65);
    }

    #[test]
    fn test_summarize_average_stays_within_extrema() {
        let samples = vec![sample(0, 10.4, 800), sample(1, 10.4, 800)];
        let summary = summarize_day(key("1970-01-01"), &samples).unwrap();
        assert!(summary.temperature_min <= summary.temperature_avg);
        assert!(summary.temperature_avg <= summary.temperature_max);
        // Clamped up from the rounded 10, so not a whole number
        assert_eq!(summary.temperature_avg, 10.4);
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let tz = eastern_standard();
        let samples = days_of_samples(&tz, date("2024-02-01"), 1);
        let first = summarize_day(key("2024-02-01"), &samples).unwrap();
        let second = summarize_day(key("2024-02-01"), &samples).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_summarize_empty_group_fails() {
        let empty: Vec<WeatherSample> = Vec::new();
        assert_eq!(
            summarize_day(key("2024-02-01"), &empty).unwrap_err(),
            ForecastError::EmptyDayGroup
        );
    }

    #[test]
    fn test_summarize_rejects_nan() {
        let samples = vec![sample(7, f64::NAN, 800)];
        let err = summarize_day(key("1970-01-01"), &samples).unwrap_err();
        assert!(matches!(err, ForecastError::MalformedSample { timestamp: 7, .. }));
    }

    #[test]
    fn test_summarize_rejects_out_of_range_probability() {
        let mut s = sample(3, 1.0, 800);
        s.precipitation_probability = Some(1.5);
        assert!(summarize_day(key("1970-01-01"), &[s]).is_err());
    }

    #[test]
    fn test_today_first_starts_at_reference() {
        let groups = groups_for(&[
            "2024-05-01", "2024-05-02", "2024-05-03", "2024-05-04", "2024-05-05", "2024-05-06",
        ]);
        let window = select_display_window(&groups, date("2024-05-02"), 5, StartPolicy::TodayFirst);
        assert_eq!(
            window,
            vec![
                key("2024-05-02"),
                key("2024-05-03"),
                key("2024-05-04"),
                key("2024-05-05"),
                key("2024-05-06"),
            ]
        );
    }

    #[test]
    fn test_today_first_back_fills_with_earliest_dates() {
        let groups = groups_for(&[
            "2024-05-01", "2024-05-02", "2024-05-03", "2024-05-04", "2024-05-05", "2024-05-06",
        ]);
        let window = select_display_window(&groups, date("2024-05-04"), 5, StartPolicy::TodayFirst);
        assert_eq!(
            window,
            vec![
                key("2024-05-01"),
                key("2024-05-02"),
                key("2024-05-04"),
                key("2024-05-05"),
                key("2024-05-06"),
            ]
        );
    }

    #[test]
    fn test_today_first_window_is_a_calendar_range() {
        // 2024-05-03 is missing; the range ends at 2024-05-05 and the
        // remaining slot is back-filled
        let groups = groups_for(&[
            "2024-05-01", "2024-05-02", "2024-05-04", "2024-05-05", "2024-05-06", "2024-05-07",
        ]);
        let window = select_display_window(&groups, date("2024-05-01"), 5, StartPolicy::TodayFirst);
        assert_eq!(
            window,
            vec![
                key("2024-05-01"),
                key("2024-05-02"),
                key("2024-05-04"),
                key("2024-05-05"),
                key("2024-05-06"),
            ]
        );
    }

    #[test]
    fn test_today_first_reference_absent_starts_at_earliest() {
        let groups = groups_for(&["2024-05-03", "2024-05-04", "2024-05-05"]);
        let window = select_display_window(&groups, date("2024-04-20"), 2, StartPolicy::TodayFirst);
        assert_eq!(window, vec![key("2024-05-03"), key("2024-05-04")]);
    }

    #[test]
    fn test_tomorrow_first_never_goes_behind_cutoff() {
        let groups = groups_for(&["2024-05-01", "2024-05-02", "2024-05-03"]);
        let window =
            select_display_window(&groups, date("2024-05-01"), 5, StartPolicy::TomorrowFirst);
        assert_eq!(window, vec![key("2024-05-02"), key("2024-05-03")]);
    }

    #[test]
    fn test_first_available_ignores_reference() {
        let groups = groups_for(&["2024-05-01", "2024-05-02", "2024-05-03"]);
        let window =
            select_display_window(&groups, date("2024-05-03"), 2, StartPolicy::FirstAvailable);
        assert_eq!(window, vec![key("2024-05-01"), key("2024-05-02")]);
    }

    #[test]
    fn test_window_bounds_for_every_policy() {
        let groups = groups_for(&[
            "2024-05-01", "2024-05-03", "2024-05-04", "2024-05-08", "2024-05-09", "2024-05-10",
            "2024-05-12",
        ]);
        let policies = [
            StartPolicy::TodayFirst,
            StartPolicy::TomorrowFirst,
            StartPolicy::FirstAvailable,
        ];
        for policy in policies {
            for size in 0..9 {
                for reference in ["2024-04-30", "2024-05-01", "2024-05-04", "2024-05-09", "2024-05-13"] {
                    let window = select_display_window(&groups, date(reference), size, policy);
                    assert!(window.len() <= size);
                    assert!(window.iter().all(|d| groups.contains_key(d)));
                    assert!(window.windows(2).all(|w| w[0] < w[1]));
                }
            }
        }
    }

    #[test]
    fn test_window_of_zero_is_empty() {
        let groups = groups_for(&["2024-05-01"]);
        assert!(select_display_window(&groups, date("2024-05-01"), 0, StartPolicy::TodayFirst)
            .is_empty());
    }

    #[test]
    fn test_five_full_days_today_first() {
        let tz = eastern_standard();
        let samples = days_of_samples(&tz, date("2024-03-04"), 5);

        let days = build_daily_forecast(&samples, &tz, date("2024-03-04"), 5, StartPolicy::TodayFirst)
            .unwrap();

        let dates: Vec<String> = days.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(
            dates,
            vec!["2024-03-04", "2024-03-05", "2024-03-06", "2024-03-07", "2024-03-08"]
        );
        for day in &days {
            assert_eq!(day.sample_count, 8);
            assert_eq!(day.representative_condition.id, 804);
            assert!(day.temperature_min <= day.temperature_avg);
            assert!(day.temperature_avg <= day.temperature_max);
        }
    }

    #[test]
    fn test_three_days_available_is_not_padded() {
        let tz = eastern_standard();
        let samples = days_of_samples(&tz, date("2024-03-04"), 3);

        let days = build_daily_forecast(&samples, &tz, date("2024-03-04"), 5, StartPolicy::TodayFirst)
            .unwrap();

        let dates: Vec<String> = days.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-03-04", "2024-03-05", "2024-03-06"]);
    }

    #[test]
    fn test_reference_absent_is_not_an_error() {
        let tz = eastern_standard();
        let samples = days_of_samples(&tz, date("2024-03-04"), 2);

        let days = build_daily_forecast(&samples, &tz, date("2024-02-01"), 5, StartPolicy::TodayFirst)
            .unwrap();
        assert_eq!(days[0].date, key("2024-03-04"));
        assert_eq!(days.len(), 2);
    }

    #[test]
    fn test_tomorrow_first_with_only_today_is_empty() {
        let tz = eastern_standard();
        let samples = days_of_samples(&tz, date("2024-03-04"), 1);

        let days =
            build_daily_forecast(&samples, &tz, date("2024-03-04"), 5, StartPolicy::TomorrowFirst)
                .unwrap();
        assert!(days.is_empty());
    }

    #[test]
    fn test_aggregator_with_named_timezone() {
        let tz = chrono_tz::America::Los_Angeles;
        let aggregator = ForecastAggregator::new(tz)
            .with_window_size(2)
            .with_policy(StartPolicy::TodayFirst);

        // 2024-07-01 06:00 UTC is 2024-06-30 23:00 in Los Angeles
        let now = DateTime::<Utc>::from_timestamp(1_719_813_600, 0).unwrap();
        let reference = aggregator.reference_date(now);
        assert_eq!(reference, date("2024-06-30"));

        let samples = vec![
            sample(1_719_813_600, 20.0, 800),
            sample(1_719_813_600 + 3 * 3600, 18.0, 801),
            sample(1_719_813_600 + 24 * 3600, 25.0, 500),
        ];
        let days = aggregator.build(&samples, reference).unwrap();
        let dates: Vec<String> = days.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-06-30", "2024-07-01"]);
        assert_eq!(days[0].sample_count, 1);
    }

    #[test]
    fn test_parse_start_policy() {
        assert_eq!("today-first".parse::<StartPolicy>().unwrap(), StartPolicy::TodayFirst);
        assert_eq!("Tomorrow_First".parse::<StartPolicy>().unwrap(), StartPolicy::TomorrowFirst);
        assert_eq!(StartPolicy::FirstAvailable.to_string(), "first-available");
        assert!("yesterday".parse::<StartPolicy>().is_err());
    }
}
