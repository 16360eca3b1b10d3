use crate::{
    Config,
    error::{Result, WeatherError},
    model::{ForecastReport, ResolvedLocation, VideoLink},
    provider::{openweather::OpenWeatherProvider, youtube::YouTubeProvider},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod maps;
pub mod openweather;
pub mod youtube;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    YouTube,
    GoogleMaps,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::YouTube => "youtube",
            ProviderId::GoogleMaps => "googlemaps",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::YouTube, ProviderId::GoogleMaps]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "youtube" => Ok(ProviderId::YouTube),
            "googlemaps" => Ok(ProviderId::GoogleMaps),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, youtube, googlemaps."
            )),
        }
    }
}

/// Forward geocoding. Errors here are transport or decoding failures; a
/// search that simply matched nothing is `Ok(None)`.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn by_name(&self, query: &str) -> Result<Option<ResolvedLocation>>;

    async fn by_postal_code(&self, zip: &str, country: &str) -> Result<ResolvedLocation>;
}

#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn forecast(&self, location: &ResolvedLocation) -> Result<ForecastReport>;
}

#[async_trait]
pub trait VideoSearch: Send + Sync + Debug {
    async fn search(&self, query: &str) -> Result<Vec<VideoLink>>;
}

/// The external collaborators one search needs.
#[derive(Debug)]
pub struct Services {
    pub geocoder: Box<dyn Geocoder>,
    pub forecast: Box<dyn ForecastSource>,
    pub videos: Option<Box<dyn VideoSearch>>,
    pub maps_api_key: Option<String>,
}

impl Services {
    /// Build the services from configured credentials. OpenWeather is
    /// required; videos and the embedded map are optional.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.provider_api_key(ProviderId::OpenWeather).ok_or_else(|| {
            WeatherError::validation(format!(
                "No API key configured for provider '{id}'.\n\
                 Hint: run `tripcast configure {id}` or set TRIPCAST_OPENWEATHER_API_KEY.",
                id = ProviderId::OpenWeather
            ))
        })?;
        let openweather = OpenWeatherProvider::new(api_key.to_owned());

        let videos = config.provider_api_key(ProviderId::YouTube).map(|key| {
            Box::new(YouTubeProvider::new(key.to_owned())) as Box<dyn VideoSearch>
        });
        if videos.is_none() {
            tracing::debug!("no YouTube key configured, travel videos disabled");
        }

        Ok(Self {
            geocoder: Box::new(openweather.clone()),
            forecast: Box::new(openweather),
            videos,
            maps_api_key: config.provider_api_key(ProviderId::GoogleMaps).map(str::to_owned),
        })
    }
}

/// Shorten an error body for inclusion in a message.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
