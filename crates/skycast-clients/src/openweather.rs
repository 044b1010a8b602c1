//! OpenWeatherMap adapter for current conditions, 5 day / 3 hour forecasts
//! and direct geocoding

use crate::{
    decode, ensure_success, ClientError, ClientResult, CurrentConditions, Forecast, Geocoder,
    Place, ResolvedLocation, WeatherClient,
};
use reqwest::Client;
use serde::Deserialize;
use skycast_core::{Coordinates, LocationQuery, UnitSystem, WeatherCondition, WeatherSample};
use std::time::Duration;
use tracing::instrument;
use url::Url;

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_GEO_URL: &str = "https://api.openweathermap.org/geo/1.0";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct OpenWeatherClient {
    client: Client,
    base_url: Url,
    geo_url: Url,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> ClientResult<Self> {
        Self::with_urls(api_key, DEFAULT_WEATHER_URL, DEFAULT_GEO_URL)
    }

    /// Point the client at another host, e.g. a mock server in tests
    pub fn with_urls(api_key: impl Into<String>, base_url: &str, geo_url: &str) -> ClientResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ClientError::Config("OpenWeatherMap API key is missing".into()));
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: parse_base(base_url)?,
            geo_url: parse_base(geo_url)?,
            api_key,
        })
    }

    fn endpoint(base: &Url, name: &str) -> String {
        format!("{}/{}", base.as_str().trim_end_matches('/'), name)
    }

    fn location_params(query: &LocationQuery) -> Vec<(&'static str, String)> {
        match query {
            LocationQuery::Coordinates(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
            LocationQuery::Name(name) => vec![("q", name.clone())],
        }
    }

    async fn get_weather<T: serde::de::DeserializeOwned>(
        &self,
        name: &str,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> ClientResult<T> {
        let mut params = Self::location_params(query);
        params.push(("units", units.as_query().to_string()));
        params.push(("appid", self.api_key.clone()));

        let response = self
            .client
            .get(Self::endpoint(&self.base_url, name))
            .query(&params)
            .send()
            .await?;
        decode(ensure_success(response, &query.to_string()).await?).await
    }
}

fn parse_base(raw: &str) -> ClientResult<Url> {
    Url::parse(raw).map_err(|e| ClientError::Config(format!("invalid url {raw:?}: {e}")))
}

#[async_trait::async_trait]
impl WeatherClient for OpenWeatherClient {
    #[instrument(skip(self), fields(query = %query))]
    async fn current(
        &self,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> ClientResult<CurrentConditions> {
        let raw: RawCurrent = self.get_weather("weather", query, units).await?;
        let conditions = raw.into_conditions(units)?;
        tracing::info!(location = %conditions.location.name, "fetched current conditions");
        Ok(conditions)
    }

    #[instrument(skip(self), fields(query = %query))]
    async fn forecast(&self, query: &LocationQuery, units: UnitSystem) -> ClientResult<Forecast> {
        let raw: RawForecast = self.get_weather("forecast", query, units).await?;
        let forecast = raw.into_forecast(units)?;
        tracing::info!(
            location = %forecast.location.name,
            samples = forecast.samples.len(),
            "fetched forecast"
        );
        Ok(forecast)
    }
}

#[async_trait::async_trait]
impl Geocoder for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> ClientResult<Vec<Place>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .get(Self::endpoint(&self.geo_url, "direct"))
            .query(&[
                ("q", query.to_string()),
                ("limit", limit.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?;
        let raw: Vec<RawPlace> = decode(ensure_success(response, query).await?).await?;

        raw.into_iter()
            .map(|p| {
                Ok(Place {
                    name: p.name,
                    coordinates: coordinates(p.lat, p.lon)?,
                    country: p.country,
                    state: p.state,
                })
            })
            .collect()
    }
}

fn coordinates(lat: f64, lon: f64) -> ClientResult<Coordinates> {
    Coordinates::new(lat, lon).map_err(|e| ClientError::Decode(e.to_string()))
}

// Wire format

#[derive(Debug, Deserialize)]
struct RawMain {
    temp: f64,
    feels_like: f64,
    #[serde(default)]
    temp_min: Option<f64>,
    #[serde(default)]
    temp_max: Option<f64>,
    pressure: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    id: u16,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    dt: i64,
    main: RawMain,
    #[serde(default)]
    weather: Vec<RawCondition>,
    #[serde(default)]
    wind: RawWind,
    #[serde(default)]
    visibility: Option<f64>,
    #[serde(default)]
    pop: Option<f64>,
}

impl RawEntry {
    fn into_sample(self) -> WeatherSample {
        let condition = self
            .weather
            .into_iter()
            .next()
            .map(|c| WeatherCondition::new(c.id, c.description))
            .unwrap_or_else(|| WeatherCondition::new(0, ""));
        WeatherSample {
            timestamp: self.dt,
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            humidity: self.main.humidity.round().clamp(0.0, 100.0) as u8,
            wind_speed: self.wind.speed,
            pressure: self.main.pressure,
            precipitation_probability: self.pop,
            visibility: self.visibility,
            condition,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct RawCity {
    name: String,
    coord: RawCoord,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    list: Vec<RawEntry>,
    city: RawCity,
}

impl RawForecast {
    fn into_forecast(self, units: UnitSystem) -> ClientResult<Forecast> {
        let location = ResolvedLocation {
            name: self.city.name,
            country: self.city.country,
            coordinates: coordinates(self.city.coord.lat, self.city.coord.lon)?,
            utc_offset_seconds: self.city.timezone,
        };
        Ok(Forecast {
            location,
            units,
            samples: self.list.into_iter().map(RawEntry::into_sample).collect(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawSys {
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    sunrise: Option<i64>,
    #[serde(default)]
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawCurrent {
    #[serde(flatten)]
    entry: RawEntry,
    coord: RawCoord,
    name: String,
    #[serde(default)]
    sys: RawSys,
    #[serde(default)]
    timezone: Option<i32>,
}

impl RawCurrent {
    fn into_conditions(self, units: UnitSystem) -> ClientResult<CurrentConditions> {
        let location = ResolvedLocation {
            name: self.name,
            country: self.sys.country,
            coordinates: coordinates(self.coord.lat, self.coord.lon)?,
            utc_offset_seconds: self.timezone,
        };
        let temperature_min = self.entry.main.temp_min;
        let temperature_max = self.entry.main.temp_max;
        Ok(CurrentConditions {
            location,
            units,
            observed: self.entry.into_sample(),
            temperature_min,
            temperature_max,
            sunrise: self.sys.sunrise,
            sunset: self.sys.sunset,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    state: Option<String>,
}
