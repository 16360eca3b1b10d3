//! Core library for the `tripcast` CLI.
//!
//! This crate defines:
//! - Location resolution (postal codes, coordinates, place names)
//! - Forecast windowing, date-range filtering and summaries
//! - Provider clients (OpenWeather, YouTube, Google Maps links)
//! - Saved weather records (remote REST or local file) and their export
//! - Configuration & credentials handling
//!
//! It is used by `tripcast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod export;
pub mod forecast;
pub mod location;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod session;
pub mod store;
pub mod summary;

pub use config::{Config, ProviderConfig};
pub use error::{Result, WeatherError};
pub use export::{ExportFormat, export};
pub use forecast::{DateRange, filter_by_range, latest_window};
pub use location::{LocationQuery, resolve};
pub use model::{
    DailyForecastEntry, RecordPayload, ResolvedLocation, SavedRecord, VideoLink, WeatherSummary,
};
pub use pipeline::{Pipeline, SearchOutcome};
pub use provider::{ProviderId, Services};
pub use session::Session;
pub use store::{RecordStore, store_from_config};
pub use summary::summarize;
