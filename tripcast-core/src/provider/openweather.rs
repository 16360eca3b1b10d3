use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::{Result, WeatherError},
    model::{CurrentConditions, DailyForecastEntry, ForecastReport, ResolvedLocation},
};

use super::{ForecastSource, Geocoder, truncate_body};

const OPENWEATHER_BASE: &str = "https://api.openweathermap.org";

/// OpenWeather geocoding (by name and by postal code) and One Call forecast.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, OPENWEATHER_BASE)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        what: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                WeatherError::provider(format!("Failed to send request to OpenWeather ({what}): {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::provider(format!("Failed to read OpenWeather {what} response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(WeatherError::provider(format!(
                "OpenWeather {what} request failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            WeatherError::provider(format!("Failed to parse OpenWeather {what} JSON: {e}"))
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwDirectMatch {
    lat: f64,
    lon: f64,
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwZipResponse {
    coord: OwCoord,
    name: String,
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwOneCallResponse {
    current: CurrentConditions,
    #[serde(default)]
    daily: Vec<DailyForecastEntry>,
}

#[async_trait]
impl Geocoder for OpenWeatherProvider {
    async fn by_name(&self, query: &str) -> Result<Option<ResolvedLocation>> {
        let matches: Vec<OwDirectMatch> = self
            .get_json("geocoding", "/geo/1.0/direct", &[("q", query), ("limit", "1")])
            .await?;

        matches
            .into_iter()
            .next()
            .map(|m| ResolvedLocation::new(m.lat, m.lon, m.name, m.country))
            .transpose()
    }

    async fn by_postal_code(&self, zip: &str, country: &str) -> Result<ResolvedLocation> {
        let zip_query = format!("{zip},{country}");
        let parsed: OwZipResponse = self
            .get_json("zip lookup", "/data/2.5/weather", &[("zip", zip_query.as_str())])
            .await?;

        ResolvedLocation::new(parsed.coord.lat, parsed.coord.lon, parsed.name, parsed.sys.country)
    }
}

#[async_trait]
impl ForecastSource for OpenWeatherProvider {
    async fn forecast(&self, location: &ResolvedLocation) -> Result<ForecastReport> {
        let lat = location.lat.to_string();
        let lon = location.lon.to_string();

        let parsed: OwOneCallResponse = self
            .get_json(
                "forecast",
                "/data/3.0/onecall",
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("units", "metric"),
                    ("exclude", "minutely,hourly,alerts"),
                ],
            )
            .await?;

        tracing::debug!(days = parsed.daily.len(), "forecast received");

        Ok(ForecastReport { current: parsed.current, daily: parsed.daily })
    }
}
