use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    error::{Result, WeatherError},
    model::{RecordPayload, SavedRecord},
};

use super::RecordStore;

/// Records kept in a JSON file, or only in memory when no path is given.
///
/// Writes go to disk before the in-memory copy changes, so a failed write
/// leaves the store as it was.
#[derive(Debug)]
pub struct LocalRecordStore {
    path: Option<PathBuf>,
    state: Mutex<StoreFile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    next_id: u64,
    records: Vec<SavedRecord>,
}

impl LocalRecordStore {
    /// Open (or start) the store at `path`.
    pub async fn open(path: PathBuf) -> Result<Self> {
        let state = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                WeatherError::provider(format!("Failed to parse {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreFile::default(),
            Err(e) => {
                return Err(WeatherError::provider(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        debug!(path = %path.display(), records = state.records.len(), "opened local record store");
        Ok(Self { path: Some(path), state: Mutex::new(state) })
    }

    pub fn in_memory() -> Self {
        Self { path: None, state: Mutex::new(StoreFile::default()) }
    }

    async fn persist(&self, state: &StoreFile) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                WeatherError::provider(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }

        let json = serde_json::to_string_pretty(state)
            .map_err(|e| WeatherError::provider(format!("Failed to serialize records: {e}")))?;

        tokio::fs::write(path, json)
            .await
            .map_err(|e| WeatherError::provider(format!("Failed to write {}: {e}", path.display())))
    }
}

#[async_trait]
impl RecordStore for LocalRecordStore {
    /// Newest first.
    async fn list(&self) -> Result<Vec<SavedRecord>> {
        let state = self.state.lock().await;
        Ok(state.records.iter().rev().cloned().collect())
    }

    async fn create(&self, payload: &RecordPayload) -> Result<u64> {
        let mut state = self.state.lock().await;

        let mut next = state.clone();
        next.next_id += 1;
        let id = next.next_id;
        next.records.push(SavedRecord::from_payload(id, payload.clone()));
        self.persist(&next).await?;
        *state = next;

        info!(id, location = %payload.location, "record created");
        Ok(id)
    }

    async fn update(&self, id: u64, payload: &RecordPayload) -> Result<()> {
        let mut state = self.state.lock().await;

        let mut next = state.clone();
        let record = next
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| WeatherError::not_found(format!("record {id} not found")))?;
        *record = SavedRecord::from_payload(id, payload.clone());
        self.persist(&next).await?;
        *state = next;

        info!(id, "record updated");
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<()> {
        let mut state = self.state.lock().await;

        let mut next = state.clone();
        next.records.retain(|r| r.id != id);
        if next.records.len() == state.records.len() {
            return Err(WeatherError::not_found(format!("record {id} not found")));
        }
        self.persist(&next).await?;
        *state = next;

        info!(id, "record deleted");
        Ok(())
    }
}
