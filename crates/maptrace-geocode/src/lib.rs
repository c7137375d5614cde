//! Geocoding search client.
//!
//! Issues one outbound lookup per search against a Nominatim-style endpoint
//! and returns candidate places for recentring the map. Empty queries are
//! rejected locally without touching the network.

use log::debug;
use reqwest::header;
use serde::Deserialize;
use thiserror::Error;

/// Public Nominatim search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// Client identification required by the Nominatim usage policy.
pub const USER_AGENT: &str = "MapAreaTracer/1.0";

/// Maximum number of candidates requested per search.
pub const RESULT_LIMIT: u8 = 5;

/// Geocoding errors.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("search query is empty")]
    EmptyQuery,
    #[error("geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed geocoding response: {0}")]
    Malformed(String),
}

/// One geocoding candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// Full display name, comma-separated from most to least specific.
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Place {
    /// The leading component of the display name, for compact result lists.
    pub fn short_name(&self) -> &str {
        self.display_name
            .split(',')
            .next()
            .unwrap_or(&self.display_name)
            .trim()
    }
}

/// Wire format: the service returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct PlaceRecord {
    display_name: String,
    lat: String,
    lon: String,
}

fn places_from_records(records: Vec<PlaceRecord>) -> Result<Vec<Place>, GeocodeError> {
    records
        .into_iter()
        .map(|record| {
            let lat = record
                .lat
                .parse()
                .map_err(|_| GeocodeError::Malformed(format!("bad latitude: {}", record.lat)))?;
            let lon = record
                .lon
                .parse()
                .map_err(|_| GeocodeError::Malformed(format!("bad longitude: {}", record.lon)))?;
            Ok(Place {
                display_name: record.display_name,
                lat,
                lon,
            })
        })
        .collect()
}

/// Blocking geocoding client.
pub struct GeocodeClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl GeocodeClient {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Point the client at a different search endpoint (tests, self-hosted
    /// Nominatim).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Search for places matching `query`, at most [`RESULT_LIMIT`] results.
    ///
    /// An empty or whitespace-only query fails with [`GeocodeError::EmptyQuery`]
    /// before any network activity.
    pub fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        debug!("geocoding query: {query}");
        let limit = RESULT_LIMIT.to_string();
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("format", "json"), ("q", query), ("limit", limit.as_str())])
            .header(header::USER_AGENT, USER_AGENT)
            .send()?
            .error_for_status()?;

        let records: Vec<PlaceRecord> = response.json()?;
        places_from_records(records)
    }
}

impl Default for GeocodeClient {
    fn default() -> Self {
        Self::new()
    }
}
