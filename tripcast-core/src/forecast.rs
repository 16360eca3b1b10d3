use chrono::{Datelike, Local, NaiveDate, NaiveTime, TimeDelta, TimeZone};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, WeatherError},
    model::DailyForecastEntry,
};

/// Days of the provider's daily forecast that are shown and summarized.
pub const FORECAST_WINDOW_DAYS: usize = 5;

const MAX_RANGE_DAYS: i64 = 365;
const EARLIEST_YEAR: i32 = 1950;
const MAX_YEARS_AHEAD: i32 = 2;

const GAP_STEP_MINUTES: i64 = 15;
const GAP_SEARCH_STEPS: i64 = 24 * 60 / GAP_STEP_MINUTES;

/// Inclusive day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// A range exists only when both bounds do.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        Some(Self { start: start?, end: end? })
    }

    /// Millisecond bounds at local midnight of each day in `tz`.
    fn bounds_ms<Tz: TimeZone>(&self, tz: &Tz) -> (i64, i64) {
        (midnight_ms(self.start, tz), midnight_ms(self.end, tz))
    }
}

/// Parse a `YYYY-MM-DD` day. A blank string is a missing day.
pub(crate) fn parse_day(raw: &str) -> Result<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| WeatherError::validation(format!("'{raw}' is not a date (expected YYYY-MM-DD)")))
}

/// Start of `day` in `tz`. When a DST jump skips midnight, the first
/// wall-clock time after the gap is used.
fn midnight_ms<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> i64 {
    let midnight = day.and_time(NaiveTime::MIN);
    (0..=GAP_SEARCH_STEPS)
        .map(|step| midnight + TimeDelta::minutes(GAP_STEP_MINUTES * step))
        .find_map(|wall| tz.from_local_datetime(&wall).earliest())
        .map(|local| local.timestamp_millis())
        .unwrap_or_else(|| midnight.and_utc().timestamp_millis())
}

/// Keep the first [`FORECAST_WINDOW_DAYS`] entries.
pub fn latest_window(mut entries: Vec<DailyForecastEntry>) -> Vec<DailyForecastEntry> {
    entries.truncate(FORECAST_WINDOW_DAYS);
    entries
}

/// Keep entries whose timestamp lies within the range, bounds taken at
/// local midnight. No range means no filtering.
pub fn filter_by_range(
    entries: Vec<DailyForecastEntry>,
    range: Option<&DateRange>,
) -> Vec<DailyForecastEntry> {
    filter_by_range_in(entries, range, &Local)
}

pub fn filter_by_range_in<Tz: TimeZone>(
    entries: Vec<DailyForecastEntry>,
    range: Option<&DateRange>,
    tz: &Tz,
) -> Vec<DailyForecastEntry> {
    let Some(range) = range else {
        return entries;
    };

    let (start_ms, end_ms) = range.bounds_ms(tz);
    entries
        .into_iter()
        .filter(|entry| {
            let ms = entry.dt.saturating_mul(1000);
            ms >= start_ms && ms <= end_ms
        })
        .collect()
}

/// Checks applied before a range is saved with a record.
pub fn validate_date_range(range: &DateRange, today: NaiveDate) -> Result<()> {
    if range.start > range.end {
        return Err(WeatherError::validation("Start date must be before end date."));
    }

    if (range.end - range.start).num_days() > MAX_RANGE_DAYS {
        return Err(WeatherError::validation("Date range too long (max 1 year)."));
    }

    if range.start.year() < EARLIEST_YEAR {
        return Err(WeatherError::validation("Start date too far in the past."));
    }

    if range.end.year() > today.year() + MAX_YEARS_AHEAD {
        return Err(WeatherError::validation("End date too far in the future."));
    }

    Ok(())
}
