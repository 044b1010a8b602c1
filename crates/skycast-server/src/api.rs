//! `/api/v1` handlers

use std::fmt::Display;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use skycast_clients::{
    CurrentConditions, Place, PlaceKind, PointOfInterest, ResolvedLocation, Video,
};
use skycast_core::display::{
    condition_icon, format_temperature, format_wind, forecast_note, DailyView,
};
use skycast_core::hourly::{samples_on_date, upcoming};
use skycast_core::{
    Coordinates, ExportFormat, ForecastAggregator, LocalDateKey, LocationQuery, QueryError,
    RecordDraft, RecordId, SavedRecord, SnapshotPreview, StartPolicy, UnitSystem, WeatherSample,
};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

const DEFAULT_HOURLY_COUNT: usize = 8;
const MAX_SEARCH_RESULTS: usize = 5;

fn parse_units(raw: Option<&str>, default: UnitSystem) -> ApiResult<UnitSystem> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw
            .parse()
            .map_err(|e: skycast_core::UnitError| ApiError::bad_request(e.to_string())),
        None => Ok(default),
    }
}

fn parse_query(raw: Option<&str>) -> ApiResult<LocationQuery> {
    Ok(LocationQuery::parse(raw.unwrap_or_default())?)
}

/// The `tz` parameter, checked before anything is fetched
#[derive(Debug, Clone, Copy)]
enum ZoneRequest {
    Named(Tz),
    /// Offset the provider reports for the place, known only after the fetch
    Location,
}

impl ZoneRequest {
    /// `location` defers to the provider, any other value is an IANA name,
    /// and no value means the configured zone
    fn parse(raw: Option<&str>, default: Tz) -> ApiResult<Self> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(Self::Named(default)),
            Some("location") => Ok(Self::Location),
            Some(name) => name
                .parse::<Tz>()
                .map(Self::Named)
                .map_err(|_| ApiError::bad_request(format!("Unknown timezone: {name}"))),
        }
    }

    fn resolve(self, location: &ResolvedLocation) -> ApiResult<ViewerZone> {
        match self {
            Self::Named(tz) => Ok(ViewerZone::Named(tz)),
            Self::Location => location
                .utc_offset_seconds
                .and_then(FixedOffset::east_opt)
                .map(ViewerZone::Offset)
                .ok_or_else(|| ApiError::bad_request("No timezone reported for this location")),
        }
    }
}

/// Timezone that defines "today" for a request
#[derive(Debug, Clone, Copy)]
enum ViewerZone {
    Named(Tz),
    Offset(FixedOffset),
}

impl ViewerZone {
    fn label(&self) -> String {
        match self {
            Self::Named(tz) => tz.name().to_string(),
            Self::Offset(offset) => offset.to_string(),
        }
    }
}

fn daily_views<T: TimeZone>(
    tz: T,
    samples: &[WeatherSample],
    now: DateTime<Utc>,
    window_size: usize,
    policy: StartPolicy,
    units: UnitSystem,
) -> ApiResult<(NaiveDate, Vec<DailyView>)> {
    let aggregator = ForecastAggregator::new(tz)
        .with_window_size(window_size)
        .with_policy(policy);
    let reference = aggregator.reference_date(now);
    let days = aggregator.build(samples, reference)?;
    let views = days
        .into_iter()
        .map(|day| DailyView::new(day, reference, units))
        .collect();
    Ok((reference, views))
}

/// A single sample with its local clock time and display strings
#[derive(Debug, Serialize)]
pub struct HourlyView {
    #[serde(flatten)]
    pub sample: WeatherSample,
    pub local_time: String,
    pub icon: &'static str,
    pub temperature_label: String,
}

fn hourly_views<T>(
    tz: &T,
    samples: &[WeatherSample],
    date: Option<LocalDateKey>,
    now: DateTime<Utc>,
    count: usize,
    units: UnitSystem,
) -> ApiResult<Vec<HourlyView>>
where
    T: TimeZone,
    T::Offset: Display,
{
    let picked = match date {
        Some(date) => samples_on_date(samples, tz, date)?,
        None => upcoming(samples, now.timestamp(), count),
    };

    Ok(picked
        .into_iter()
        .map(|sample| HourlyView {
            local_time: DateTime::<Utc>::from_timestamp(sample.timestamp, 0)
                .map(|t| t.with_timezone(tz).format("%H:%M").to_string())
                .unwrap_or_default(),
            icon: condition_icon(sample.condition.id),
            temperature_label: format_temperature(sample.temperature, units),
            sample: sample.clone(),
        })
        .collect())
}

#[derive(Debug, Deserialize)]
pub struct CurrentParams {
    q: Option<String>,
    units: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CurrentResponse {
    #[serde(flatten)]
    pub conditions: CurrentConditions,
    pub icon: &'static str,
    pub temperature_label: String,
    pub feels_like_label: String,
    pub wind_label: String,
}

#[tracing::instrument(skip(state))]
pub async fn current(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CurrentParams>,
) -> ApiResult<Json<CurrentResponse>> {
    state.record_request("current");
    let query = parse_query(params.q.as_deref())?;
    let units = parse_units(params.units.as_deref(), state.settings.units)?;

    let conditions = state.services.weather.current(&query, units).await?;
    let observed = &conditions.observed;
    Ok(Json(CurrentResponse {
        icon: condition_icon(observed.condition.id),
        temperature_label: format_temperature(observed.temperature, units),
        feels_like_label: format_temperature(observed.feels_like, units),
        wind_label: format_wind(observed.wind_speed, units),
        conditions,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ForecastParams {
    q: Option<String>,
    units: Option<String>,
    days: Option<usize>,
    policy: Option<String>,
    tz: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub location: ResolvedLocation,
    pub units: UnitSystem,
    pub timezone: String,
    pub reference_date: NaiveDate,
    pub policy: StartPolicy,
    pub days: Vec<DailyView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[tracing::instrument(skip(state))]
pub async fn forecast(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ForecastParams>,
) -> ApiResult<Json<ForecastResponse>> {
    state.record_request("forecast");
    let query = parse_query(params.q.as_deref())?;
    let units = parse_units(params.units.as_deref(), state.settings.units)?;
    let window_size = params.days.unwrap_or(state.settings.forecast_days);
    if window_size == 0 {
        return Err(ApiError::bad_request("days must be at least 1"));
    }
    let policy = match params.policy.as_deref() {
        Some(raw) => raw.parse::<StartPolicy>()?,
        None => state.settings.start_policy,
    };
    let zone = ZoneRequest::parse(params.tz.as_deref(), state.settings.timezone)?;

    let now = state.now();
    let forecast = state.services.weather.forecast(&query, units).await?;
    let zone = zone.resolve(&forecast.location)?;

    let (reference_date, days) = match zone {
        ViewerZone::Named(tz) => daily_views(tz, &forecast.samples, now, window_size, policy, units)?,
        ViewerZone::Offset(offset) => {
            daily_views(offset, &forecast.samples, now, window_size, policy, units)?
        }
    };
    tracing::info!(
        location = %forecast.location.name,
        %reference_date,
        days = days.len(),
        "built daily forecast"
    );

    Ok(Json(ForecastResponse {
        location: forecast.location,
        units,
        timezone: zone.label(),
        reference_date,
        policy,
        note: forecast_note(days.len(), window_size),
        days,
    }))
}

#[derive(Debug, Deserialize)]
pub struct HourlyParams {
    q: Option<String>,
    units: Option<String>,
    tz: Option<String>,
    date: Option<String>,
    count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HourlyResponse {
    pub location: ResolvedLocation,
    pub units: UnitSystem,
    pub timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<LocalDateKey>,
    pub samples: Vec<HourlyView>,
}

#[tracing::instrument(skip(state))]
pub async fn hourly(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HourlyParams>,
) -> ApiResult<Json<HourlyResponse>> {
    state.record_request("hourly");
    let query = parse_query(params.q.as_deref())?;
    let units = parse_units(params.units.as_deref(), state.settings.units)?;
    let date = params
        .date
        .as_deref()
        .map(|raw| {
            raw.parse::<LocalDateKey>()
                .map_err(|_| ApiError::bad_request(format!("Invalid date: {raw}")))
        })
        .transpose()?;
    let count = params.count.unwrap_or(DEFAULT_HOURLY_COUNT);
    let zone = ZoneRequest::parse(params.tz.as_deref(), state.settings.timezone)?;

    let now = state.now();
    let forecast = state.services.weather.forecast(&query, units).await?;
    let zone = zone.resolve(&forecast.location)?;

    let samples = match zone {
        ViewerZone::Named(tz) => hourly_views(&tz, &forecast.samples, date, now, count, units)?,
        ViewerZone::Offset(offset) => {
            hourly_views(&offset, &forecast.samples, date, now, count, units)?
        }
    };

    Ok(Json(HourlyResponse {
        location: forecast.location,
        units,
        timezone: zone.label(),
        date,
        samples,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub place: Place,
    pub display_name: String,
}

#[tracing::instrument(skip(state))]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<SearchResult>>> {
    state.record_request("search");
    let q = params.q.unwrap_or_default();
    if q.trim().is_empty() {
        return Err(QueryError::Empty.into());
    }
    let limit = params.limit.unwrap_or(MAX_SEARCH_RESULTS).clamp(1, MAX_SEARCH_RESULTS);

    let places = state.services.geocoder.search(&q, limit).await?;
    Ok(Json(
        places
            .into_iter()
            .map(|place| SearchResult {
                display_name: place.display_name(),
                place,
            })
            .collect(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct NearbyPlace {
    #[serde(flatten)]
    pub place: PointOfInterest,
    pub maps_url: String,
}

#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub kind: PlaceKind,
    pub places: Vec<NearbyPlace>,
}

#[tracing::instrument(skip(state))]
pub async fn places(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(params): Query<NearbyParams>,
) -> ApiResult<Json<NearbyResponse>> {
    state.record_request("places");
    let kind: PlaceKind = kind
        .parse()
        .map_err(|e: skycast_clients::UnknownPlaceKind| ApiError::bad_request(e.to_string()))?;
    let (Some(lat), Some(lon)) = (params.lat, params.lon) else {
        return Err(ApiError::bad_request("lat and lon are required"));
    };
    let at = Coordinates::new(lat, lon)?;

    let found = state.services.places.nearby(at, kind).await?;
    Ok(Json(NearbyResponse {
        kind,
        places: found
            .into_iter()
            .map(|place| NearbyPlace {
                maps_url: place.maps_url(),
                place,
            })
            .collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct VideoParams {
    location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VideoItem {
    #[serde(flatten)]
    pub video: Video,
    pub watch_url: String,
}

#[derive(Debug, Serialize)]
pub struct VideosResponse {
    pub videos: Vec<VideoItem>,
}

#[tracing::instrument(skip(state))]
pub async fn videos(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VideoParams>,
) -> ApiResult<Json<VideosResponse>> {
    state.record_request("videos");
    let location = params.location.unwrap_or_default();
    let location = location.trim();
    if location.is_empty() {
        return Err(QueryError::Empty.into());
    }

    let found = state.services.videos.search(location).await?;
    Ok(Json(VideosResponse {
        videos: found
            .into_iter()
            .map(|video| VideoItem {
                watch_url: video.watch_url(),
                video,
            })
            .collect(),
    }))
}

/// A saved record with the headline numbers from its snapshot
#[derive(Debug, Serialize)]
pub struct RecordView {
    #[serde(flatten)]
    pub record: SavedRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<SnapshotPreview>,
}

#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub records: Vec<RecordView>,
}

#[tracing::instrument(skip(state))]
pub async fn list_history(State(state): State<Arc<AppState>>) -> ApiResult<Json<RecordsResponse>> {
    state.record_request("history");
    let records = state.services.history.list().await?;
    Ok(Json(RecordsResponse {
        records: records
            .into_iter()
            .map(|record| RecordView {
                preview: record.preview(),
                record,
            })
            .collect(),
    }))
}

#[tracing::instrument(skip(state))]
pub async fn create_history(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<RecordDraft>,
) -> ApiResult<(StatusCode, Json<SavedRecord>)> {
    state.record_request("history");
    let record = state.services.history.create(&draft).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[tracing::instrument(skip(state))]
pub async fn update_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<RecordDraft>,
) -> ApiResult<Json<SavedRecord>> {
    state.record_request("history");
    let record = state.services.history.update(&RecordId::new(id), &draft).await?;
    Ok(Json(record))
}

#[tracing::instrument(skip(state))]
pub async fn delete_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.record_request("history");
    state.services.history.delete(&RecordId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state))]
pub async fn export(
    State(state): State<Arc<AppState>>,
    Path(format): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.record_request("export");
    let format: ExportFormat = format
        .parse()
        .map_err(|e: skycast_core::UnknownExportFormat| ApiError::bad_request(e.to_string()))?;

    let body = state.services.history.export(format).await?;
    let headers = [
        (header::CONTENT_TYPE, format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", format.file_name()),
        ),
    ];
    Ok((headers, Bytes::from(body)))
}
