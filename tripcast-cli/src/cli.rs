use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use std::path::PathBuf;
use tripcast_core::{
    Config, ExportFormat, Pipeline, ProviderId, Services, Session, export, store_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "tripcast", version, about = "Weather lookups and a log of trips")]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Log errors only.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a provider.
    Configure {
        /// Provider short name: "openweather", "youtube" or "googlemaps".
        provider: String,
    },

    /// Point at a remote record store, or go back to the local file.
    Store {
        /// Base URL, e.g. "http://localhost:5001/weather".
        url: Option<String>,

        /// Forget the remote URL and keep records locally.
        #[arg(long, conflicts_with = "url")]
        local: bool,
    },

    /// Show the forecast for a city, zip code ("94105" or "94105,CA") or "lat,lon".
    Show {
        location: String,

        #[command(flatten)]
        range: RangeArgs,

        /// Skip the travel video lookup.
        #[arg(long)]
        no_videos: bool,
    },

    /// Show the forecast at explicit coordinates.
    Here {
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        #[arg(allow_negative_numbers = true)]
        lon: f64,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// Look up a location and save the summary for a date range.
    Save {
        location: String,

        /// First day, YYYY-MM-DD.
        #[arg(long)]
        start: String,

        /// Last day, YYYY-MM-DD.
        #[arg(long)]
        end: String,

        /// Update this saved record instead of creating a new one.
        #[arg(long)]
        id: Option<u64>,
    },

    /// List saved records.
    List,

    /// Delete a saved record.
    Delete { id: u64 },

    /// Export saved records.
    Export {
        /// "json", "csv" or "markdown".
        #[arg(long, short, default_value = "json")]
        format: String,

        /// Output file; "-" prints to stdout. Defaults to weather_data.<ext>.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, clap::Args)]
pub struct RangeArgs {
    /// Only days from this date, YYYY-MM-DD.
    #[arg(long)]
    pub start: Option<String>,

    /// Only days up to this date, YYYY-MM-DD.
    #[arg(long)]
    pub end: Option<String>,
}

impl Cli {
    pub fn init_tracing(&self) -> anyhow::Result<()> {
        let level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        let filter = tracing_subscriber::EnvFilter::try_from_env("TRIPCAST_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|error| anyhow!("failed to initialize tracing subscriber: {error}"))
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure { provider } => {
                let id = ProviderId::try_from(provider.as_str())?;
                let api_key = Password::new(&format!("API key for {id}:"))
                    .with_display_mode(PasswordDisplayMode::Masked)
                    .without_confirmation()
                    .prompt()
                    .context("Failed to read API key")?;

                config.upsert_provider_api_key(id, api_key.trim().to_string());
                config.save()?;
                println!("Saved API key for {id}.");
            }
            Command::Store { url, local } => {
                match (url, local) {
                    (Some(url), _) => {
                        config.set_store_url(Some(url.clone()));
                        println!("Records will be kept at {url}.");
                    }
                    (None, true) => {
                        config.set_store_url(None);
                        println!("Records will be kept locally.");
                    }
                    (None, false) => {
                        match config.effective_store_url() {
                            Some(url) => println!("Record store: {url}"),
                            None => println!("Record store: local file"),
                        }
                        return Ok(());
                    }
                }
                config.save()?;
            }
            Command::Show { location, range, no_videos } => {
                let mut pipeline = Pipeline::new(Services::from_config(&config)?);
                if no_videos {
                    pipeline = pipeline.without_videos();
                }

                let mut session = Session::new();
                session.location = location;
                session.set_dates(range.start.as_deref(), range.end.as_deref())?;
                session.search(&pipeline).await?;

                if let Some(outcome) = session.outcome() {
                    render::print_outcome(outcome);
                }
            }
            Command::Here { lat, lon, range } => {
                let pipeline = Pipeline::new(Services::from_config(&config)?);

                let mut session = Session::new();
                session.set_dates(range.start.as_deref(), range.end.as_deref())?;
                session.search_here(&pipeline, lat, lon).await?;

                if let Some(outcome) = session.outcome() {
                    render::print_outcome(outcome);
                }
            }
            Command::Save { location, start, end, id } => {
                let pipeline = Pipeline::new(Services::from_config(&config)?).without_videos();
                let store = store_from_config(&config).await?;

                let mut session = Session::new();
                if let Some(id) = id {
                    session.refresh(store.as_ref()).await?;
                    let record = session
                        .records()
                        .iter()
                        .find(|r| r.id == id)
                        .cloned()
                        .ok_or_else(|| anyhow!("No saved record with id {id}."))?;
                    session.begin_edit(&record);
                }

                session.location = location;
                session.set_dates(Some(&start), Some(&end))?;
                session.search(&pipeline).await?;

                let today = chrono::Local::now().date_naive();
                let saved_id = session.save(store.as_ref(), today).await?;

                if let Some(outcome) = session.outcome() {
                    render::print_summary_line(&outcome.summary);
                }
                println!("Saved record {saved_id}.");
            }
            Command::List => {
                let store = store_from_config(&config).await?;
                let mut session = Session::new();
                session.refresh(store.as_ref()).await?;
                render::print_records(session.records());
            }
            Command::Delete { id } => {
                let store = store_from_config(&config).await?;
                let mut session = Session::new();
                session.delete(store.as_ref(), id).await?;
                println!("Deleted record {id}. {} left.", session.records().len());
            }
            Command::Export { format, output } => {
                let format = ExportFormat::try_from(format.as_str())?;
                let store = store_from_config(&config).await?;
                let records = store.list().await?;
                let artifact = export(&records, format)?;

                let path = output.unwrap_or_else(|| PathBuf::from(format.default_file_name()));
                if path.as_os_str() == "-" {
                    println!("{artifact}");
                } else {
                    std::fs::write(&path, artifact)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported {} records to {}.", records.len(), path.display());
                }
            }
        }

        Ok(())
    }
}
