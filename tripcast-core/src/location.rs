//! Turning what the user typed into a point on the map.
//!
//! Input is classified first, then resolved:
//! 1. postal code: `digits` or `digits,CC` (two-letter country, default `US`)
//! 2. coordinate pair: `lat,lon[,...]`, used as-is without geocoding
//! 3. anything else: a place name for forward geocoding
//!
//! A postal code with a country suffix that is not exactly two letters
//! (`94105,USA`) is not a postal code and ends up as a place name.

use tracing::{debug, info};

use crate::{
    error::{Result, WeatherError},
    model::ResolvedLocation,
    provider::Geocoder,
};

const DEFAULT_COUNTRY: &str = "US";

#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    PostalCode { zip: String, country: String },
    Coordinates { lat: f64, lon: f64 },
    PlaceName(String),
}

impl LocationQuery {
    pub fn classify(input: &str) -> Self {
        let trimmed = input.trim();
        let normalized = trimmed.strip_suffix(',').unwrap_or(trimmed);

        if let Some((zip, country)) = parse_postal_code(normalized) {
            return LocationQuery::PostalCode { zip, country };
        }

        if let Some((lat, lon)) = parse_coordinates(normalized) {
            return LocationQuery::Coordinates { lat, lon };
        }

        LocationQuery::PlaceName(normalized.to_string())
    }
}

fn parse_postal_code(input: &str) -> Option<(String, String)> {
    let (zip, country) = match input.split_once(',') {
        Some((zip, country)) => (zip, Some(country)),
        None => (input, None),
    };

    if zip.is_empty() || !zip.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let country = match country {
        None => DEFAULT_COUNTRY.to_string(),
        Some(c) if c.len() == 2 && c.chars().all(|ch| ch.is_ascii_alphabetic()) => {
            c.to_string()
        }
        Some(_) => return None,
    };

    Some((zip.to_string(), country))
}

/// The first two comma-separated parts; anything after them is ignored.
fn parse_coordinates(input: &str) -> Option<(f64, f64)> {
    let mut parts = input.split(',').map(str::trim);
    let lat = parts.next()?.parse::<f64>().ok()?;
    let lon = parts.next()?.parse::<f64>().ok()?;

    (lat.is_finite() && lon.is_finite()).then_some((lat, lon))
}

/// Resolve free-form input to a location. Single attempt, no retries.
pub async fn resolve(input: &str, geocoder: &dyn Geocoder) -> Result<ResolvedLocation> {
    let query = LocationQuery::classify(input);
    debug!(?query, "classified location input");

    let resolved = match query {
        LocationQuery::PostalCode { zip, country } => geocoder
            .by_postal_code(&zip, &country)
            .await
            .map_err(|e| {
                debug!(error = %e, "postal code lookup failed");
                WeatherError::not_found("zip code not found")
            })?,
        LocationQuery::Coordinates { lat, lon } => ResolvedLocation::here(lat, lon)?,
        LocationQuery::PlaceName(name) => {
            if name.is_empty() {
                return Err(WeatherError::validation("enter a city, zip code or coordinates"));
            }

            match geocoder.by_name(&name).await {
                Ok(Some(found)) => found,
                Ok(None) => return Err(WeatherError::not_found("location not found")),
                Err(e) => {
                    debug!(error = %e, "geocoding by name failed");
                    return Err(WeatherError::not_found("error fetching coordinates"));
                }
            }
        }
    };

    info!(
        "Resolved location: {} at ({}, {})",
        resolved.display_name(),
        resolved.lat,
        resolved.lon
    );
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingGeocoder {
        calls: Mutex<Vec<String>>,
        by_name: Option<ResolvedLocation>,
        fail: bool,
    }

    impl RecordingGeocoder {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Geocoder for RecordingGeocoder {
        async fn by_name(&self, query: &str) -> Result<Option<ResolvedLocation>> {
            self.calls.lock().unwrap().push(format!("name:{query}"));
            if self.fail {
                return Err(WeatherError::provider("connection refused"));
            }
            Ok(self.by_name.clone())
        }

        async fn by_postal_code(&self, zip: &str, country: &str) -> Result<ResolvedLocation> {
            self.calls.lock().unwrap().push(format!("zip:{zip},{country}"));
            if self.fail {
                return Err(WeatherError::provider("404 city not found"));
            }
            ResolvedLocation::new(37.79, -122.39, "San Francisco", country)
        }
    }

    #[test]
    fn postal_codes_default_to_us() {
        assert_eq!(
            LocationQuery::classify("94105"),
            LocationQuery::PostalCode { zip: "94105".into(), country: "US".into() }
        );
        assert_eq!(
            LocationQuery::classify(" 94105,CA "),
            LocationQuery::PostalCode { zip: "94105".into(), country: "CA".into() }
        );
        assert_eq!(
            LocationQuery::classify("94105,"),
            LocationQuery::PostalCode { zip: "94105".into(), country: "US".into() }
        );
    }

    #[test]
    fn long_country_suffix_falls_through_to_place_name() {
        assert_eq!(
            LocationQuery::classify("94105,USA"),
            LocationQuery::PlaceName("94105,USA".into())
        );
    }

    #[test]
    fn numeric_pairs_are_coordinates() {
        assert_eq!(
            LocationQuery::classify("37.77,-122.41"),
            LocationQuery::Coordinates { lat: 37.77, lon: -122.41 }
        );
        assert_eq!(
            LocationQuery::classify("37.77, -122.41"),
            LocationQuery::Coordinates { lat: 37.77, lon: -122.41 }
        );
    }

    #[test]
    fn everything_else_is_a_place_name() {
        assert_eq!(LocationQuery::classify("Paris"), LocationQuery::PlaceName("Paris".into()));
        assert_eq!(
            LocationQuery::classify("Paris, FR"),
            LocationQuery::PlaceName("Paris, FR".into())
        );
    }

    #[test]
    fn extra_parts_after_a_coordinate_pair_are_ignored() {
        assert_eq!(
            LocationQuery::classify("1,2,3"),
            LocationQuery::Coordinates { lat: 1.0, lon: 2.0 }
        );
        assert_eq!(
            LocationQuery::classify("48.85, 2.35, Paris"),
            LocationQuery::Coordinates { lat: 48.85, lon: 2.35 }
        );
        assert_eq!(
            LocationQuery::classify("48.85,Paris,2.35"),
            LocationQuery::PlaceName("48.85,Paris,2.35".into())
        );
    }

    #[tokio::test]
    async fn postal_code_dispatches_with_country() {
        let geocoder = RecordingGeocoder::default();

        let us = resolve("94105", &geocoder).await.unwrap();
        let ca = resolve("94105,CA", &geocoder).await.unwrap();

        assert_eq!(us.country, "US");
        assert_eq!(ca.country, "CA");
        assert_eq!(geocoder.calls(), vec!["zip:94105,US", "zip:94105,CA"]);
    }

    #[tokio::test]
    async fn coordinates_skip_geocoding() {
        let geocoder = RecordingGeocoder::default();

        let here = resolve("37.77,-122.41", &geocoder).await.unwrap();

        assert_eq!(here.name, "Your Location");
        assert_eq!(here.country, "");
        assert_eq!((here.lat, here.lon), (37.77, -122.41));
        assert!(geocoder.calls().is_empty());
    }

    #[tokio::test]
    async fn out_of_range_coordinates_are_invalid() {
        let geocoder = RecordingGeocoder::default();

        let err = resolve("123.0,45.0", &geocoder).await.unwrap_err();
        assert!(matches!(err, WeatherError::Validation(_)));
        assert!(geocoder.calls().is_empty());
    }

    #[tokio::test]
    async fn place_name_uses_top_match() {
        let geocoder = RecordingGeocoder {
            by_name: Some(ResolvedLocation::new(48.85, 2.35, "Paris", "FR").unwrap()),
            ..Default::default()
        };

        let found = resolve("  Paris ", &geocoder).await.unwrap();
        assert_eq!(found.display_name(), "Paris, FR");
        assert_eq!(geocoder.calls(), vec!["name:Paris"]);
    }

    #[tokio::test]
    async fn resolution_failures_map_to_not_found() {
        let empty = RecordingGeocoder::default();
        assert_eq!(
            resolve("Atlantis", &empty).await.unwrap_err(),
            WeatherError::not_found("location not found")
        );

        let failing = RecordingGeocoder { fail: true, ..Default::default() };
        assert_eq!(
            resolve("Atlantis", &failing).await.unwrap_err(),
            WeatherError::not_found("error fetching coordinates")
        );
        assert_eq!(
            resolve("00000", &failing).await.unwrap_err(),
            WeatherError::not_found("zip code not found")
        );
    }

    #[tokio::test]
    async fn blank_input_is_rejected_without_lookup() {
        let geocoder = RecordingGeocoder::default();
        let err = resolve("   ", &geocoder).await.unwrap_err();
        assert!(matches!(err, WeatherError::Validation(_)));
        assert!(geocoder.calls().is_empty());
    }
}
