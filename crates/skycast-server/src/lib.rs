use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use opentelemetry::metrics::{Counter, MeterProvider};
use opentelemetry::KeyValue;
use opentelemetry_prometheus::exporter;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::{Encoder, Registry, TextEncoder};
use skycast_clients::{Geocoder, HistoryStore, PlacesClient, VideoClient, WeatherClient};
use skycast_config::{AppConfig, ConfigError};
use skycast_core::{StartPolicy, UnitSystem, DEFAULT_WINDOW_SIZE};

pub mod api;
pub mod error;

/// Source of "now"; read once per request
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The collaborators a running server talks to
#[derive(Clone)]
pub struct Services {
    pub weather: Arc<dyn WeatherClient>,
    pub geocoder: Arc<dyn Geocoder>,
    pub places: Arc<dyn PlacesClient>,
    pub videos: Arc<dyn VideoClient>,
    pub history: Arc<dyn HistoryStore>,
    pub clock: Clock,
}

/// Request defaults taken from `[display]`
#[derive(Debug, Clone)]
pub struct Settings {
    pub units: UnitSystem,
    pub timezone: Tz,
    pub forecast_days: usize,
    pub start_policy: StartPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            units: UnitSystem::default(),
            timezone: Tz::UTC,
            forecast_days: DEFAULT_WINDOW_SIZE,
            start_policy: StartPolicy::default(),
        }
    }
}

impl Settings {
    pub fn from_config(cfg: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            units: cfg.units()?,
            timezone: cfg.timezone()?,
            forecast_days: cfg.forecast_days(),
            start_policy: cfg.start_policy()?,
        })
    }
}

pub struct AppState {
    ready: AtomicBool,
    registry: Registry,
    #[allow(dead_code)]
    provider: SdkMeterProvider,
    requests_total: Counter<u64>,
    pub(crate) services: Services,
    pub(crate) settings: Settings,
}

impl AppState {
    pub(crate) fn record_request(&self, route: &'static str) {
        self.requests_total.add(1, &[KeyValue::new("route", route)]);
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        (self.services.clock)()
    }
}

pub fn build_app(services: Services, settings: Settings) -> Result<(Router, Arc<AppState>)> {
    // Prometheus exporter via OpenTelemetry
    let registry = Registry::new();
    let reader = exporter().with_registry(registry.clone()).build()?;
    let provider = SdkMeterProvider::builder().with_reader(reader).build();
    let meter = provider.meter("skycast-server");

    let requests_total = meter
        .u64_counter("skycast_requests_total")
        .with_description("Total HTTP requests served")
        .init();

    let state = Arc::new(AppState {
        ready: AtomicBool::new(false),
        registry,
        provider,
        requests_total,
        services,
        settings,
    });

    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/v1/current", get(api::current))
        .route("/api/v1/forecast", get(api::forecast))
        .route("/api/v1/hourly", get(api::hourly))
        .route("/api/v1/search", get(api::search))
        .route("/api/v1/places/:kind", get(api::places))
        .route("/api/v1/videos", get(api::videos))
        .route(
            "/api/v1/history",
            get(api::list_history).post(api::create_history),
        )
        .route(
            "/api/v1/history/:id",
            put(api::update_history).delete(api::delete_history),
        )
        .route("/api/v1/export/:format", get(api::export))
        .with_state(Arc::clone(&state));

    Ok((router, state))
}

pub fn set_ready(state: &Arc<AppState>, is_ready: bool) {
    state.ready.store(is_ready, Ordering::Relaxed);
}

async fn healthz(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    state.record_request("healthz");
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn readyz(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    let ready = state.ready.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(serde_json::json!({ "ready": ready })))
}

/// Prometheus text exposition of everything the meter has recorded
async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let mut body = String::new();
    if let Err(e) = encoder.encode_utf8(&state.registry.gather(), &mut body) {
        tracing::warn!(error = ?e, "failed to encode metrics");
    }
    (
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        body,
    )
}
