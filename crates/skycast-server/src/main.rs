use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use skycast_clients::{BackendClient, OpenWeatherClient};
use skycast_server::{Services, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    // Observability
    skycast_obs::init("skycastd");

    // Config
    let cfg = skycast_config::AppConfig::load().context("failed to load configuration")?;
    let settings = Settings::from_config(&cfg)?;
    let api_key = cfg.api_key().with_context(|| {
        format!(
            "no OpenWeatherMap API key; set [weather] api_key or {}",
            skycast_config::API_KEY_ENV
        )
    })?;

    let weather = Arc::new(OpenWeatherClient::with_urls(
        api_key,
        &cfg.weather_url(),
        &cfg.geo_url(),
    )?);
    let backend = Arc::new(BackendClient::new(&cfg.backend_url())?);
    let services = Services {
        weather: weather.clone(),
        geocoder: weather,
        places: backend.clone(),
        videos: backend.clone(),
        history: backend,
        clock: Arc::new(chrono::Utc::now),
    };
    tracing::info!(
        units = %settings.units,
        timezone = %settings.timezone,
        days = settings.forecast_days,
        policy = %settings.start_policy,
        backend = %cfg.backend_url(),
        "configuration loaded"
    );

    let (app, state) = skycast_server::build_app(services, settings)?;

    // Start HTTP server
    let addr: SocketAddr = cfg
        .http_bind()
        .parse()
        .with_context(|| format!("invalid HTTP bind address {}", cfg.http_bind()))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    // Mark ready just before serving
    skycast_server::set_ready(&state, true);

    tracing::info!(%addr, "HTTP server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = ?e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
