use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config,
    error::{Result, WeatherError},
    model::{RecordPayload, SavedRecord},
};

pub mod http;
pub mod local;

pub use http::HttpRecordStore;
pub use local::LocalRecordStore;

/// CRUD over saved weather summaries. Last write wins; there is no
/// conflict detection.
#[async_trait]
pub trait RecordStore: Send + Sync + Debug {
    async fn list(&self) -> Result<Vec<SavedRecord>>;

    /// Persist a new record and return the id the store assigned.
    async fn create(&self, payload: &RecordPayload) -> Result<u64>;

    async fn update(&self, id: u64, payload: &RecordPayload) -> Result<()>;

    async fn delete(&self, id: u64) -> Result<()>;
}

/// The remote store when a URL is configured, otherwise the local file.
pub async fn store_from_config(config: &Config) -> Result<Box<dyn RecordStore>> {
    if let Some(url) = config.effective_store_url() {
        tracing::debug!(%url, "using remote record store");
        return Ok(Box::new(HttpRecordStore::new(url)));
    }

    let path = Config::records_file_path()
        .map_err(|e| WeatherError::provider(format!("Cannot locate the records file: {e}")))?;
    tracing::debug!(path = %path.display(), "using local record store");

    Ok(Box::new(LocalRecordStore::open(path).await?))
}
