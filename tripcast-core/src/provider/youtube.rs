use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{Result, WeatherError},
    model::VideoLink,
};

use super::{VideoSearch, truncate_body};

const YOUTUBE_BASE: &str = "https://www.googleapis.com/youtube/v3";
const MAX_RESULTS: usize = 3;

/// YouTube Data API search, limited to a handful of videos.
#[derive(Debug, Clone)]
pub struct YouTubeProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl YouTubeProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, YOUTUBE_BASE)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct YtSearchResponse {
    #[serde(default)]
    items: Vec<YtItem>,
}

#[derive(Debug, Deserialize)]
struct YtItem {
    id: YtItemId,
    snippet: YtSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YtItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YtSnippet {
    title: String,
}

/// Search phrase used for a resolved place name.
pub fn travel_query(place: &str) -> String {
    format!("{place} travel")
}

#[async_trait]
impl VideoSearch for YouTubeProvider {
    async fn search(&self, query: &str) -> Result<Vec<VideoLink>> {
        let url = format!("{}/search", self.base_url);
        let max_results = MAX_RESULTS.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("maxResults", max_results.as_str()),
                ("type", "video"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::provider(format!("Failed to send request to YouTube: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::provider(format!("Failed to read YouTube response body: {e}")))?;

        if !status.is_success() {
            return Err(WeatherError::provider(format!(
                "YouTube search failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        let parsed: YtSearchResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::provider(format!("Failed to parse YouTube JSON: {e}")))?;

        // Channels and playlists carry no video id.
        Ok(parsed
            .items
            .into_iter()
            .filter_map(|item| {
                item.id.video_id.map(|id| VideoLink { id, title: item.snippet.title })
            })
            .take(MAX_RESULTS)
            .collect())
    }
}
