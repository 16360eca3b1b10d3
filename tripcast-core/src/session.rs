//! Per-user state between actions: what was typed, the last search result,
//! the record being edited and the saved records.

use chrono::NaiveDate;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

use crate::{
    error::{Result, WeatherError},
    forecast::{DateRange, parse_day, validate_date_range},
    model::{RecordPayload, SavedRecord},
    pipeline::{Pipeline, SearchOutcome},
    store::RecordStore,
};

/// Identifies one search. Only the most recently issued ticket may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

/// Monotonic counter of searches started.
#[derive(Debug, Default)]
pub struct RequestGeneration(AtomicU64);

impl RequestGeneration {
    pub fn next(&self) -> SearchTicket {
        SearchTicket(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.0.load(Ordering::SeqCst) == ticket.0
    }
}

#[derive(Debug, Default)]
pub struct Session {
    pub location: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    outcome: Option<SearchOutcome>,
    edit_id: Option<u64>,
    records: Vec<SavedRecord>,
    generation: RequestGeneration,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcome(&self) -> Option<&SearchOutcome> {
        self.outcome.as_ref()
    }

    pub fn records(&self) -> &[SavedRecord] {
        &self.records
    }

    pub fn edit_id(&self) -> Option<u64> {
        self.edit_id
    }

    /// Set the date inputs from `YYYY-MM-DD` strings. Blank clears a bound.
    pub fn set_dates(&mut self, start: Option<&str>, end: Option<&str>) -> Result<()> {
        let start = start.map(parse_day).transpose()?.flatten();
        let end = end.map(parse_day).transpose()?.flatten();
        self.start_date = start;
        self.end_date = end;
        Ok(())
    }

    pub fn date_range(&self) -> Option<DateRange> {
        DateRange::from_bounds(self.start_date, self.end_date)
    }

    /// Start a search that the caller runs and later hands to [`commit`].
    /// Callers that run searches concurrently drive tickets themselves;
    /// [`search`] and [`search_here`] borrow the session mutably and so
    /// never overlap.
    ///
    /// [`commit`]: Session::commit
    /// [`search`]: Session::search
    /// [`search_here`]: Session::search_here
    pub fn begin_search(&self) -> SearchTicket {
        self.generation.next()
    }

    /// Store a finished search unless a newer one has started since.
    pub fn commit(&mut self, ticket: SearchTicket, outcome: SearchOutcome) -> bool {
        if !self.generation.is_current(ticket) {
            warn!(?ticket, "dropping result of a superseded search");
            return false;
        }

        self.outcome = Some(outcome);
        true
    }

    /// Search for the current location input with the current dates.
    /// Takes a fresh ticket, so any search still in flight from
    /// [`begin_search`](Session::begin_search) can no longer commit.
    pub async fn search(&mut self, pipeline: &Pipeline) -> Result<()> {
        let ticket = self.begin_search();
        let range = self.date_range();
        let outcome = pipeline.search(&self.location, range.as_ref()).await?;
        self.commit(ticket, outcome);
        Ok(())
    }

    /// Search at the device position; the location input becomes the
    /// resolved display name.
    pub async fn search_here(&mut self, pipeline: &Pipeline, lat: f64, lon: f64) -> Result<()> {
        let ticket = self.begin_search();
        let range = self.date_range();
        let outcome = pipeline.search_at(lat, lon, range.as_ref()).await?;
        let location = outcome.summary.location.clone();
        if self.commit(ticket, outcome) {
            self.location = location;
        }
        Ok(())
    }

    /// Save the current summary with the current dates, updating the record
    /// being edited if there is one. Returns the record id.
    pub async fn save(&mut self, store: &dyn RecordStore, today: NaiveDate) -> Result<u64> {
        let (Some(outcome), Some(range)) = (self.outcome.as_ref(), self.date_range()) else {
            return Err(WeatherError::validation(
                "Please fetch weather and enter start/end dates",
            ));
        };

        validate_date_range(&range, today)?;
        let payload = RecordPayload::from_summary(&outcome.summary, range.start, range.end);

        let id = match self.edit_id {
            Some(id) => {
                store.update(id, &payload).await?;
                id
            }
            None => store.create(&payload).await?,
        };
        info!(id, location = %payload.location, "weather saved");

        self.start_date = None;
        self.end_date = None;
        self.edit_id = None;

        if let Err(e) = self.refresh(store).await {
            warn!(error = %e, "saved, but reloading records failed");
        }
        Ok(id)
    }

    /// Load a saved record into the inputs so the next save updates it.
    pub fn begin_edit(&mut self, record: &SavedRecord) {
        self.edit_id = Some(record.id);
        self.location = record.location.clone();
        self.start_date = Some(record.start_date);
        self.end_date = Some(record.end_date);
    }

    pub async fn delete(&mut self, store: &dyn RecordStore, id: u64) -> Result<()> {
        store.delete(id).await?;

        if self.edit_id == Some(id) {
            self.edit_id = None;
        }
        self.refresh(store).await
    }

    pub async fn refresh(&mut self, store: &dyn RecordStore) -> Result<()> {
        self.records = store.list().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pipeline::tests::services, store::LocalRecordStore};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn pipeline() -> Pipeline {
        Pipeline::new(services(None).0)
    }

    /// Counts every call and stores nothing.
    #[derive(Debug, Default)]
    struct CountingStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RecordStore for CountingStore {
        async fn list(&self) -> Result<Vec<SavedRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn create(&self, _payload: &RecordPayload) -> Result<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(1)
        }

        async fn update(&self, _id: u64, _payload: &RecordPayload) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn delete(&self, _id: u64) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn only_the_latest_ticket_is_current() {
        let generation = RequestGeneration::default();
        let first = generation.next();
        let second = generation.next();

        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[tokio::test]
    async fn stale_results_do_not_overwrite_newer_ones() {
        let pipeline = pipeline();
        let mut session = Session::new();

        let slow = session.begin_search();
        let fast = session.begin_search();

        let lisbon = pipeline.search("Lisbon", None).await.unwrap();
        let porto = pipeline.search("Porto", None).await.unwrap();

        assert!(session.commit(fast, porto));
        assert!(!session.commit(slow, lisbon));
        assert_eq!(session.outcome().unwrap().summary.location, "Porto, PT");
    }

    #[tokio::test]
    async fn direct_search_supersedes_tickets_in_flight() {
        let pipeline = pipeline();
        let mut session = Session::new();

        let pending = session.begin_search();
        let lisbon = pipeline.search("Lisbon", None).await.unwrap();

        session.location = "Porto".into();
        session.search(&pipeline).await.unwrap();

        assert!(!session.commit(pending, lisbon));
        assert_eq!(session.outcome().unwrap().summary.location, "Porto, PT");
    }

    #[tokio::test]
    async fn failed_search_keeps_previous_outcome() {
        let pipeline = pipeline();
        let mut session = Session::new();

        session.location = "Lisbon".into();
        session.search(&pipeline).await.unwrap();

        session.location = "Lisbon".into();
        session.set_dates(Some("2030-01-01"), Some("2030-01-02")).unwrap();
        let err = session.search(&pipeline).await.unwrap_err();

        assert_eq!(err, WeatherError::EmptyForecastWindow);
        assert_eq!(session.outcome().unwrap().summary.daily.len(), 5);
    }

    #[tokio::test]
    async fn saving_without_dates_makes_no_store_call() {
        let pipeline = pipeline();
        let store = CountingStore::default();
        let mut session = Session::new();

        // Nothing fetched yet.
        let err = session.save(&store, today()).await.unwrap_err();
        assert!(matches!(err, WeatherError::Validation(_)));

        session.location = "Lisbon".into();
        session.search(&pipeline).await.unwrap();
        session.set_dates(Some("2024-06-01"), None).unwrap();

        let err = session.save(&store, today()).await.unwrap_err();
        assert!(matches!(err, WeatherError::Validation(_)));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_range_is_rejected_before_saving() {
        let pipeline = pipeline();
        let store = CountingStore::default();
        let mut session = Session::new();

        session.location = "Lisbon".into();
        session.search(&pipeline).await.unwrap();
        session.set_dates(Some("2024-06-05"), Some("2024-06-01")).unwrap();

        assert!(session.save(&store, today()).await.is_err());
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn save_edit_and_delete_cycle() {
        let pipeline = pipeline();
        let store = LocalRecordStore::in_memory();
        let mut session = Session::new();

        session.location = "Lisbon".into();
        session.set_dates(Some("2024-06-01"), Some("2024-06-03")).unwrap();
        session.search(&pipeline).await.unwrap();
        let id = session.save(&store, today()).await.unwrap();

        assert_eq!(session.date_range(), None);
        assert_eq!(session.records().len(), 1);
        let saved = session.records()[0].clone();
        assert_eq!(saved.location, "Lisbon, PT");
        assert_eq!(saved.temp_min, 5.0);

        session.begin_edit(&saved);
        assert_eq!(session.edit_id(), Some(id));
        assert_eq!(session.location, "Lisbon, PT");

        session.set_dates(Some("2024-06-02"), Some("2024-06-04")).unwrap();
        session.search(&pipeline).await.unwrap();
        assert_eq!(session.save(&store, today()).await.unwrap(), id);

        assert_eq!(session.edit_id(), None);
        assert_eq!(session.records().len(), 1);
        assert_eq!(
            session.records()[0].start_date,
            NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
        );

        session.delete(&store, id).await.unwrap();
        assert!(session.records().is_empty());
    }

    #[tokio::test]
    async fn device_search_adopts_display_name() {
        let pipeline = pipeline();
        let mut session = Session::new();

        session.search_here(&pipeline, 37.77, -122.41).await.unwrap();
        assert_eq!(session.location, "Your Location");
    }

    #[test]
    fn malformed_dates_leave_inputs_alone() {
        let mut session = Session::new();
        session.set_dates(Some("2024-06-01"), Some("2024-06-02")).unwrap();

        assert!(session.set_dates(Some("june"), Some("2024-06-02")).is_err());
        assert!(session.date_range().is_some());
    }
}
