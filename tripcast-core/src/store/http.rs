use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{
    error::{Result, WeatherError},
    model::{RecordPayload, SavedRecord},
    provider::truncate_body,
};

use super::RecordStore;

/// Record store behind a REST endpoint:
///
/// - `GET    {base}`      list
/// - `POST   {base}`      create, response carries the new `id`
/// - `PUT    {base}/{id}` update
/// - `DELETE {base}/{id}` delete
#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: u64,
}

impl HttpRecordStore {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), http: Client::new() }
    }

    fn record_url(&self, id: u64) -> String {
        format!("{}/{}", self.base_url, id)
    }

    async fn check(&self, what: &str, res: reqwest::Result<Response>, id: Option<u64>) -> Result<Response> {
        let res = res.map_err(|e| {
            WeatherError::provider(format!("Failed to reach record store ({what}): {e}"))
        })?;

        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
            return Err(WeatherError::not_found(format!("record {id} not found")));
        }

        let body = res.text().await.unwrap_or_default();
        Err(WeatherError::provider(format!(
            "Record store {what} failed with status {status}: {}",
            truncate_body(&body),
        )))
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn list(&self) -> Result<Vec<SavedRecord>> {
        let res = self.http.get(&self.base_url).send().await;
        let res = self.check("list", res, None).await?;

        res.json()
            .await
            .map_err(|e| WeatherError::provider(format!("Failed to parse saved records: {e}")))
    }

    #[instrument(skip(self, payload), fields(location = %payload.location))]
    async fn create(&self, payload: &RecordPayload) -> Result<u64> {
        let res = self.http.post(&self.base_url).json(payload).send().await;
        let res = self.check("create", res, None).await?;

        let created: Created = res.json().await.map_err(|e| {
            WeatherError::provider(format!("Record store did not return a record id: {e}"))
        })?;

        info!(id = created.id, "record created");
        Ok(created.id)
    }

    #[instrument(skip(self, payload))]
    async fn update(&self, id: u64, payload: &RecordPayload) -> Result<()> {
        let res = self.http.put(self.record_url(id)).json(payload).send().await;
        self.check("update", res, Some(id)).await?;

        info!("record updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: u64) -> Result<()> {
        let res = self.http.delete(self.record_url(id)).send().await;
        self.check("delete", res, Some(id)).await?;

        info!("record deleted");
        Ok(())
    }
}
