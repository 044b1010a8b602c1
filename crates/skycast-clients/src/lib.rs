//! External data source adapters
//!
//! Each collaborator the dashboard talks to is a trait here so the server
//! can be exercised against fakes. The provided implementations are thin
//! reqwest wrappers: OpenWeatherMap for weather and geocoding, and the
//! application backend for places, videos and saved-search history.

pub mod backend;
pub mod openweather;
pub mod types;

pub use backend::{BackendClient, DEFAULT_BACKEND_URL};
pub use openweather::{OpenWeatherClient, DEFAULT_GEO_URL, DEFAULT_WEATHER_URL};
pub use types::*;

use reqwest::{Response, StatusCode};
use skycast_core::{
    Coordinates, ExportFormat, LocationQuery, RecordDraft, RecordId, SavedRecord, UnitSystem,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Can't find \"{0}\". Check the spelling or try something else.")]
    NotFound(String),

    #[error("Too many requests. Wait a bit and try again.")]
    RateLimited,

    #[error("API key is invalid. Please check your configuration.")]
    Unauthorized,

    #[error("Upstream error {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Free-text location search
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> ClientResult<Vec<Place>>;
}

/// Current conditions and short-interval forecast samples
#[async_trait::async_trait]
pub trait WeatherClient: Send + Sync {
    async fn current(
        &self,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> ClientResult<CurrentConditions>;

    async fn forecast(&self, query: &LocationQuery, units: UnitSystem) -> ClientResult<Forecast>;
}

/// Points of interest around a coordinate
#[async_trait::async_trait]
pub trait PlacesClient: Send + Sync {
    async fn nearby(&self, at: Coordinates, kind: PlaceKind) -> ClientResult<Vec<PointOfInterest>>;
}

/// Videos about a location
#[async_trait::async_trait]
pub trait VideoClient: Send + Sync {
    async fn search(&self, location: &str) -> ClientResult<Vec<Video>>;
}

/// Saved-search persistence
#[async_trait::async_trait]
pub trait HistoryStore: Send + Sync {
    async fn create(&self, draft: &RecordDraft) -> ClientResult<SavedRecord>;

    async fn list(&self) -> ClientResult<Vec<SavedRecord>>;

    async fn update(&self, id: &RecordId, draft: &RecordDraft) -> ClientResult<SavedRecord>;

    async fn delete(&self, id: &RecordId) -> ClientResult<()>;

    /// All records rendered in the given format
    async fn export(&self, format: ExportFormat) -> ClientResult<Vec<u8>>;
}

/// Map a non-2xx response onto a [`ClientError`]; `subject` names what was
/// being looked up for the not-found message.
pub(crate) async fn ensure_success(response: Response, subject: &str) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), %body, "upstream returned an error");

    Err(match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(subject.to_string()),
        StatusCode::TOO_MANY_REQUESTS => ClientError::RateLimited,
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        _ => ClientError::Upstream {
            status: status.as_u16(),
            message: error_message(&body),
        },
    })
}

/// Prefer the `error` / `message` field of a JSON error body
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

pub(crate) async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> ClientResult<T> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}
