use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use skycast_core::{StartPolicy, UnitSystem, DEFAULT_WINDOW_SIZE};
use std::fs;
use std::path::Path;

pub use skycast_clients::{DEFAULT_BACKEND_URL, DEFAULT_GEO_URL, DEFAULT_WEATHER_URL};

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Environment variable that overrides `[weather] api_key`
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub geo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackendConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    pub units: Option<String>,
    pub timezone: Option<String>,
    pub forecast_days: Option<usize>,
    pub start_policy: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub server: Option<ServerConfig>,
    pub weather: Option<WeatherConfig>,
    pub backend: Option<BackendConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

impl AppConfig {
    /// Load configuration from the SKYCAST_CONFIG path (TOML) if present, with
    /// defaults otherwise; OPENWEATHER_API_KEY overrides the configured key
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("SKYCAST_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        let cfg = Self::load_from(&path)?;
        Ok(cfg.with_api_key(std::env::var(API_KEY_ENV).ok()))
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let cfg = if path.exists() {
            let s = fs::read_to_string(path)?;
            toml::from_str::<AppConfig>(&s)?
        } else {
            AppConfig::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Replace the API key when `key` is set and non-empty
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.weather.get_or_insert_with(WeatherConfig::default).api_key = Some(key);
        }
        self
    }

    /// Reject display values the server could not start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.units()?;
        self.timezone()?;
        self.start_policy()?;
        if self.forecast_days() == 0 {
            return Err(ConfigError::Invalid {
                key: "display.forecast_days",
                value: "0".into(),
            });
        }
        Ok(())
    }

    /// Get HTTP bind address (default 0.0.0.0:8080)
    pub fn http_bind(&self) -> String {
        self.server
            .as_ref()
            .and_then(|s| s.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
    }

    pub fn api_key(&self) -> Option<String> {
        self.weather
            .as_ref()
            .and_then(|w| w.api_key.clone())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn weather_url(&self) -> String {
        self.weather
            .as_ref()
            .and_then(|w| w.base_url.clone())
            .unwrap_or_else(|| DEFAULT_WEATHER_URL.to_string())
    }

    pub fn geo_url(&self) -> String {
        self.weather
            .as_ref()
            .and_then(|w| w.geo_url.clone())
            .unwrap_or_else(|| DEFAULT_GEO_URL.to_string())
    }

    pub fn backend_url(&self) -> String {
        self.backend
            .as_ref()
            .and_then(|b| b.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
    }

    /// Default unit system for requests that do not name one
    pub fn units(&self) -> Result<UnitSystem, ConfigError> {
        match self.display.as_ref().and_then(|d| d.units.as_deref()) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "display.units",
                value: raw.to_string(),
            }),
            None => Ok(UnitSystem::default()),
        }
    }

    /// Timezone that defines the local calendar day (default UTC)
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        match self.display.as_ref().and_then(|d| d.timezone.as_deref()) {
            Some(raw) => raw.parse::<Tz>().map_err(|_| ConfigError::Invalid {
                key: "display.timezone",
                value: raw.to_string(),
            }),
            None => Ok(Tz::UTC),
        }
    }

    pub fn forecast_days(&self) -> usize {
        self.display
            .as_ref()
            .and_then(|d| d.forecast_days)
            .unwrap_or(DEFAULT_WINDOW_SIZE)
    }

    pub fn start_policy(&self) -> Result<StartPolicy, ConfigError> {
        match self.display.as_ref().and_then(|d| d.start_policy.as_deref()) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "display.start_policy",
                value: raw.to_string(),
            }),
            None => Ok(StartPolicy::default()),
        }
    }
}
