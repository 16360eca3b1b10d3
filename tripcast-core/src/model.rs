use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WeatherError};

/// Name given to points that were entered as raw coordinates.
pub const YOUR_LOCATION: &str = "Your Location";

/// A geocoded point. `lat` is within [-90, 90] and `lon` within [-180, 180].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub country: String,
}

impl ResolvedLocation {
    pub fn new(lat: f64, lon: f64, name: impl Into<String>, country: impl Into<String>) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(WeatherError::validation(format!(
                "latitude {lat} is outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(WeatherError::validation(format!(
                "longitude {lon} is outside [-180, 180]"
            )));
        }

        Ok(Self { lat, lon, name: name.into(), country: country.into() })
    }

    /// A point typed in (or reported by the device) rather than geocoded.
    pub fn here(lat: f64, lon: f64) -> Result<Self> {
        Self::new(lat, lon, YOUR_LOCATION, "")
    }

    /// `name`, plus `, country` when a country is known.
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherTag {
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastEntry {
    /// Unix seconds.
    pub dt: i64,
    pub temp: TempRange,
    #[serde(default)]
    pub weather: Vec<WeatherTag>,
}

/// Current conditions as reported next to the daily forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub dt: i64,
    pub temp: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub humidity: Option<u8>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub weather: Vec<WeatherTag>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastReport {
    pub current: CurrentConditions,
    pub daily: Vec<DailyForecastEntry>,
}

/// The view shown after a search and the source of saved records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSummary {
    pub resolved: ResolvedLocation,
    pub location: String,
    pub current: CurrentConditions,
    pub daily: Vec<DailyForecastEntry>,
    pub temp_min: f64,
    pub temp_max: f64,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoLink {
    pub id: String,
    pub title: String,
}

impl VideoLink {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

/// Fields sent to the record store on create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPayload {
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub temp_min: f64,
    pub temp_max: f64,
    pub description: String,
}

impl RecordPayload {
    pub fn from_summary(summary: &WeatherSummary, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            location: summary.location.clone(),
            start_date,
            end_date,
            temp_min: summary.temp_min,
            temp_max: summary.temp_max,
            description: summary.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRecord {
    pub id: u64,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub temp_min: f64,
    pub temp_max: f64,
    pub description: String,
}

impl SavedRecord {
    pub fn from_payload(id: u64, payload: RecordPayload) -> Self {
        Self {
            id,
            location: payload.location,
            start_date: payload.start_date,
            end_date: payload.end_date,
            temp_min: payload.temp_min,
            temp_max: payload.temp_max,
            description: payload.description,
        }
    }

    pub fn payload(&self) -> RecordPayload {
        RecordPayload {
            location: self.location.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            temp_min: self.temp_min,
            temp_max: self.temp_max,
            description: self.description.clone(),
        }
    }
}
