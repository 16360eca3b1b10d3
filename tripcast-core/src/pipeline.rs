use tracing::{debug, warn};

use crate::{
    error::Result,
    forecast::{DateRange, filter_by_range, latest_window},
    location,
    model::{ResolvedLocation, VideoLink, WeatherSummary},
    provider::{Services, maps::map_embed_url, youtube::travel_query},
    summary::summarize,
};

/// Everything one search produces for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub summary: WeatherSummary,
    pub map_url: String,
    pub videos: Vec<VideoLink>,
}

/// Resolve → forecast → window → range filter → summary, plus the map link
/// and travel videos for the resolved place.
#[derive(Debug)]
pub struct Pipeline {
    services: Services,
    with_videos: bool,
}

impl Pipeline {
    pub fn new(services: Services) -> Self {
        Self { services, with_videos: true }
    }

    pub fn without_videos(mut self) -> Self {
        self.with_videos = false;
        self
    }

    pub async fn search(&self, input: &str, range: Option<&DateRange>) -> Result<SearchOutcome> {
        let resolved = location::resolve(input, self.services.geocoder.as_ref()).await?;
        self.search_location(resolved, range).await
    }

    /// Search from a position reported by the device, skipping geocoding.
    pub async fn search_at(
        &self,
        lat: f64,
        lon: f64,
        range: Option<&DateRange>,
    ) -> Result<SearchOutcome> {
        self.search_location(ResolvedLocation::here(lat, lon)?, range).await
    }

    pub async fn search_location(
        &self,
        resolved: ResolvedLocation,
        range: Option<&DateRange>,
    ) -> Result<SearchOutcome> {
        let report = self.services.forecast.forecast(&resolved).await?;

        let daily = filter_by_range(latest_window(report.daily), range);
        debug!(kept = daily.len(), ?range, "forecast window filtered");

        let summary = summarize(&resolved, report.current, daily)?;
        let map_url =
            map_embed_url(self.services.maps_api_key.as_deref(), resolved.lat, resolved.lon);
        let videos = self.find_videos(&resolved.name).await;

        Ok(SearchOutcome { summary, map_url, videos })
    }

    /// Videos are a nice-to-have: a failed lookup leaves the list empty.
    async fn find_videos(&self, place: &str) -> Vec<VideoLink> {
        let Some(search) = self.services.videos.as_ref().filter(|_| self.with_videos) else {
            return Vec::new();
        };

        match search.search(&travel_query(place)).await {
            Ok(videos) => videos,
            Err(e) => {
                warn!(error = %e, "travel video lookup failed");
                Vec::new()
            }
        }
    }
}
