//! Client for the application backend that proxies places and videos and
//! keeps the saved-search history

use crate::{
    decode, ensure_success, ClientError, ClientResult, HistoryStore, PlaceKind, PlacesClient,
    PointOfInterest, Video, VideoClient,
};
use reqwest::Client;
use serde::Deserialize;
use skycast_core::{Coordinates, ExportFormat, RecordDraft, RecordId, SavedRecord};
use std::time::Duration;
use tracing::instrument;
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("invalid backend url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!("backend url {base_url} cannot be a base")));
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, base_url })
    }

    /// Append percent-encoded path segments to the base url
    fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("backend url {} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl PlacesClient for BackendClient {
    #[instrument(skip(self), fields(at = %at, kind = %kind))]
    async fn nearby(&self, at: Coordinates, kind: PlaceKind) -> ClientResult<Vec<PointOfInterest>> {
        let response = self
            .client
            .get(self.url(&["api", "nearby", kind.as_str()])?)
            .query(&[
                ("lat", at.latitude.to_string()),
                ("lon", at.longitude.to_string()),
            ])
            .send()
            .await?;
        let body: PlacesEnvelope = decode(ensure_success(response, &at.to_string()).await?).await?;
        tracing::debug!(count = body.places.len(), "nearby places");
        Ok(body.places.into_iter().map(RawPlace::into_poi).collect())
    }
}

#[async_trait::async_trait]
impl VideoClient for BackendClient {
    #[instrument(skip(self))]
    async fn search(&self, location: &str) -> ClientResult<Vec<Video>> {
        let response = self
            .client
            .get(self.url(&["api", "youtube", location])?)
            .send()
            .await?;
        let body: VideosEnvelope = decode(ensure_success(response, location).await?).await?;
        tracing::debug!(count = body.videos.len(), "videos");
        Ok(body.videos.into_iter().filter_map(RawVideo::into_video).collect())
    }
}

#[async_trait::async_trait]
impl HistoryStore for BackendClient {
    #[instrument(skip(self), fields(location = %draft.location))]
    async fn create(&self, draft: &RecordDraft) -> ClientResult<SavedRecord> {
        let response = self
            .client
            .post(self.url(&["api", "weather"])?)
            .json(draft)
            .send()
            .await?;
        let body: RecordEnvelope = decode(ensure_success(response, &draft.location).await?).await?;
        let record = body.into_record();
        tracing::info!(id = %record.id, "saved record");
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> ClientResult<Vec<SavedRecord>> {
        let response = self.client.get(self.url(&["api", "weather"])?).send().await?;
        let body: RecordsEnvelope = decode(ensure_success(response, "records").await?).await?;
        Ok(body.records)
    }

    #[instrument(skip(self, draft), fields(id = %id))]
    async fn update(&self, id: &RecordId, draft: &RecordDraft) -> ClientResult<SavedRecord> {
        let response = self
            .client
            .put(self.url(&["api", "weather", id.as_str()])?)
            .json(draft)
            .send()
            .await?;
        let body: RecordEnvelope =
            decode(ensure_success(response, &format!("record {id}")).await?).await?;
        Ok(body.into_record())
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: &RecordId) -> ClientResult<()> {
        let response = self
            .client
            .delete(self.url(&["api", "weather", id.as_str()])?)
            .send()
            .await?;
        ensure_success(response, &format!("record {id}")).await?;
        tracing::info!("deleted record");
        Ok(())
    }

    #[instrument(skip(self), fields(format = %format))]
    async fn export(&self, format: ExportFormat) -> ClientResult<Vec<u8>> {
        let response = self
            .client
            .get(self.url(&["api", "export", format.as_str()])?)
            .send()
            .await?;
        let bytes = ensure_success(response, "records").await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

// Wire format

#[derive(Debug, Deserialize)]
struct PlacesEnvelope {
    #[serde(default)]
    places: Vec<RawPlace>,
}

#[derive(Debug, Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    location: RawLatLng,
}

#[derive(Debug, Deserialize)]
struct RawOpeningHours {
    #[serde(default)]
    open_now: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawPhoto {
    photo_reference: String,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    #[serde(default)]
    place_id: String,
    name: String,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    vicinity: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    price_level: Option<u8>,
    #[serde(default)]
    opening_hours: Option<RawOpeningHours>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
    #[serde(default)]
    photos: Vec<RawPhoto>,
}

impl RawPlace {
    fn into_poi(self) -> PointOfInterest {
        PointOfInterest {
            place_id: self.place_id,
            name: self.name,
            address: self.formatted_address.or(self.vicinity),
            rating: self.rating,
            price_level: self.price_level,
            open_now: self.opening_hours.and_then(|h| h.open_now),
            coordinates: self
                .geometry
                .and_then(|g| Coordinates::new(g.location.lat, g.location.lng).ok()),
            photo_reference: self.photos.into_iter().next().map(|p| p.photo_reference),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VideosEnvelope {
    #[serde(default)]
    videos: Vec<RawVideo>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawVideoId {
    Plain(String),
    Nested {
        #[serde(rename = "videoId")]
        video_id: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawThumbnail {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawThumbnails {
    #[serde(default)]
    medium: Option<RawThumbnail>,
    #[serde(default)]
    default: Option<RawThumbnail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnippet {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    channel_title: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    thumbnails: RawThumbnails,
}

/// The backend sends either flattened fields or the raw YouTube snippet
#[derive(Debug, Deserialize)]
struct RawVideo {
    #[serde(default)]
    id: Option<RawVideoId>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    channel_title: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    snippet: RawSnippet,
}

impl RawVideo {
    fn into_video(self) -> Option<Video> {
        let id = match self.id? {
            RawVideoId::Plain(id) | RawVideoId::Nested { video_id: id } => id,
        };
        let snippet = self.snippet;
        let thumbnail = self.thumbnail.or_else(|| {
            snippet
                .thumbnails
                .medium
                .or(snippet.thumbnails.default)
                .map(|t| t.url)
        });
        Some(Video {
            id,
            title: self.title.or(snippet.title).unwrap_or_default(),
            description: self.description.or(snippet.description).unwrap_or_default(),
            channel_title: self.channel_title.or(snippet.channel_title).unwrap_or_default(),
            published_at: self.published_at.or(snippet.published_at),
            thumbnail,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RecordsEnvelope {
    #[serde(default)]
    records: Vec<SavedRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordEnvelope {
    Wrapped { record: SavedRecord },
    Bare(SavedRecord),
}

impl RecordEnvelope {
    fn into_record(self) -> SavedRecord {
        match self {
            Self::Wrapped { record } | Self::Bare(record) => record,
        }
    }
}
