#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use chrono::{DateTime, Utc};
use skycast_clients::{
    ClientError, ClientResult, CurrentConditions, Forecast, Geocoder, HistoryStore, Place,
    PlaceKind, PlacesClient, PointOfInterest, ResolvedLocation, Video, VideoClient, WeatherClient,
};
use skycast_core::{
    Coordinates, ExportFormat, LocationQuery, RecordDraft, RecordId, SavedRecord, UnitSystem,
    WeatherCondition, WeatherSample,
};
use skycast_server::{Services, Settings};
use tower::ServiceExt;

/// 2024-03-08 00:00 UTC
pub const FEED_START: i64 = 1_709_856_000;

pub fn feed(start: i64, count: i64) -> Vec<WeatherSample> {
    (0..count)
        .map(|i| WeatherSample {
            timestamp: start + i * 3 * 3600,
            temperature: 10.0 + (i % 8) as f64,
            feels_like: 9.0 + (i % 8) as f64,
            humidity: 60,
            wind_speed: 4.2,
            pressure: 1015.0,
            precipitation_probability: Some(if i % 4 == 0 { 0.4 } else { 0.0 }),
            visibility: None,
            condition: WeatherCondition::new(if i % 2 == 0 { 800 } else { 803 }, "fair"),
        })
        .collect()
}

fn location() -> ResolvedLocation {
    ResolvedLocation {
        name: "New York".into(),
        country: Some("US".into()),
        coordinates: Coordinates::new(40.71, -74.01).unwrap(),
        utc_offset_seconds: Some(-18_000),
    }
}

pub struct FakeWeather {
    pub samples: Vec<WeatherSample>,
    forecast_calls: AtomicUsize,
}

impl FakeWeather {
    pub fn new(samples: Vec<WeatherSample>) -> Self {
        Self {
            samples,
            forecast_calls: AtomicUsize::new(0),
        }
    }

    pub fn forecast_calls(&self) -> usize {
        self.forecast_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl WeatherClient for FakeWeather {
    async fn current(
        &self,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> ClientResult<CurrentConditions> {
        if query.to_string() == "Atlantis" {
            return Err(ClientError::NotFound(query.to_string()));
        }
        let observed = self.samples[0].to_units(UnitSystem::Metric, units);
        Ok(CurrentConditions {
            location: location(),
            units,
            observed,
            temperature_min: None,
            temperature_max: None,
            sunrise: None,
            sunset: None,
        })
    }

    async fn forecast(&self, query: &LocationQuery, units: UnitSystem) -> ClientResult<Forecast> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        match query.to_string().as_str() {
            "Atlantis" => return Err(ClientError::NotFound(query.to_string())),
            "Busy" => return Err(ClientError::RateLimited),
            _ => {}
        }
        let samples = self
            .samples
            .iter()
            .map(|s| s.to_units(UnitSystem::Metric, units))
            .collect();
        Ok(Forecast {
            location: location(),
            units,
            samples,
        })
    }
}

pub struct FakeGeocoder;

#[async_trait::async_trait]
impl Geocoder for FakeGeocoder {
    async fn search(&self, query: &str, limit: usize) -> ClientResult<Vec<Place>> {
        let all = vec![
            Place {
                name: query.to_string(),
                coordinates: Coordinates::new(39.8, -89.64).unwrap(),
                country: Some("US".into()),
                state: Some("Illinois".into()),
            },
            Place {
                name: query.to_string(),
                coordinates: Coordinates::new(37.21, -93.29).unwrap(),
                country: Some("US".into()),
                state: Some("Missouri".into()),
            },
        ];
        Ok(all.into_iter().take(limit).collect())
    }
}

pub struct FakePlaces;

#[async_trait::async_trait]
impl PlacesClient for FakePlaces {
    async fn nearby(&self, at: Coordinates, kind: PlaceKind) -> ClientResult<Vec<PointOfInterest>> {
        Ok(vec![PointOfInterest {
            place_id: format!("{kind}-1"),
            name: format!("Nearest {kind}"),
            address: Some("1 Main St".into()),
            rating: Some(4.2),
            price_level: None,
            open_now: Some(true),
            coordinates: Some(at),
            photo_reference: None,
        }])
    }
}

pub struct FakeVideos;

#[async_trait::async_trait]
impl VideoClient for FakeVideos {
    async fn search(&self, location: &str) -> ClientResult<Vec<Video>> {
        Ok(vec![Video {
            id: "vid1".into(),
            title: format!("{location} travel guide"),
            description: String::new(),
            channel_title: "Wanderers".into(),
            published_at: None,
            thumbnail: None,
        }])
    }
}

/// In-memory history backend
#[derive(Default)]
pub struct FakeHistory {
    records: Mutex<Vec<SavedRecord>>,
}

impl FakeHistory {
    pub fn with_records(records: Vec<SavedRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

#[async_trait::async_trait]
impl HistoryStore for FakeHistory {
    async fn create(&self, draft: &RecordDraft) -> ClientResult<SavedRecord> {
        let mut records = self.records.lock().unwrap();
        let record = SavedRecord {
            id: RecordId::new((records.len() + 1).to_string()),
            location: draft.location.clone(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            latitude: None,
            longitude: None,
            created_at: None,
            updated_at: None,
            weather_snapshot: None,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> ClientResult<Vec<SavedRecord>> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn update(&self, id: &RecordId, draft: &RecordDraft) -> ClientResult<SavedRecord> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("record {id}")))?;
        record.apply(draft);
        Ok(record.clone())
    }

    async fn delete(&self, id: &RecordId) -> ClientResult<()> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| &r.id != id);
        if records.len() == before {
            return Err(ClientError::NotFound(format!("record {id}")));
        }
        Ok(())
    }

    async fn export(&self, format: ExportFormat) -> ClientResult<Vec<u8>> {
        let records = self.records.lock().unwrap();
        match format {
            ExportFormat::Csv => {
                let mut out = String::from("id,location\n");
                for r in records.iter() {
                    out.push_str(&format!("{},{}\n", r.id, r.location));
                }
                Ok(out.into_bytes())
            }
            _ => Ok(serde_json::to_vec(&*records).unwrap()),
        }
    }
}

pub fn services_at(now: DateTime<Utc>) -> Services {
    Services {
        weather: Arc::new(FakeWeather::new(feed(FEED_START, 40))),
        geocoder: Arc::new(FakeGeocoder),
        places: Arc::new(FakePlaces),
        videos: Arc::new(FakeVideos),
        history: Arc::new(FakeHistory::default()),
        clock: Arc::new(move || now),
    }
}

pub fn feed_start() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FEED_START, 0).unwrap()
}

pub fn app_with(services: Services) -> Router {
    let (app, _state) = skycast_server::build_app(services, Settings::default()).unwrap();
    app
}

pub fn app() -> Router {
    app_with(services_at(feed_start()))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn json_body(res: Response<Body>) -> serde_json::Value {
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
