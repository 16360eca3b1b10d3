use crate::{
    error::{Result, WeatherError},
    model::{CurrentConditions, DailyForecastEntry, ResolvedLocation, WeatherSummary},
};

const UNKNOWN_CONDITION: &str = "Unknown";

/// Build the display model from an already windowed and filtered forecast.
///
/// Temperature bounds span every entry; the headline description and icon
/// come from the first one. An empty forecast is an error rather than a
/// summary with undefined bounds.
pub fn summarize(
    resolved: &ResolvedLocation,
    current: CurrentConditions,
    daily: Vec<DailyForecastEntry>,
) -> Result<WeatherSummary> {
    let first = daily.first().ok_or(WeatherError::EmptyForecastWindow)?;

    let (description, icon) = first
        .weather
        .first()
        .map(|w| (w.description.clone(), w.icon.clone()))
        .unwrap_or_else(|| (UNKNOWN_CONDITION.to_string(), String::new()));

    let temp_min = daily.iter().map(|d| d.temp.min).fold(f64::INFINITY, f64::min);
    let temp_max = daily.iter().map(|d| d.temp.max).fold(f64::NEG_INFINITY, f64::max);

    Ok(WeatherSummary {
        resolved: resolved.clone(),
        location: resolved.display_name(),
        current,
        daily,
        temp_min,
        temp_max,
        description,
        icon,
    })
}
