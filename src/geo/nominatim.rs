//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Plain HTTP access to `/search` and `/reverse`. Rate limiting and
//! caching happen one level up in [`crate::geo::GeoClient`].

use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::geo::SearchResult;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
}

/// Nominatim search response item
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

/// Nominatim reverse response
///
/// Unresolvable coordinates come back as HTTP 200 with only `error` set.
#[derive(Debug, Deserialize)]
struct NominatimReverse {
    display_name: Option<String>,
    error: Option<String>,
}

/// Search area hint, in Nominatim's `lonMin,latMin,lonMax,latMax` order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewbox {
    pub lon_min: f64,
    pub lat_min: f64,
    pub lon_max: f64,
    pub lat_max: f64,
}

impl Viewbox {
    /// Square box of `half_width` degrees each side of `center`
    pub fn around(center: Coordinate, half_width: f64) -> Self {
        Self {
            lon_min: center.longitude - half_width,
            lat_min: center.latitude - half_width,
            lon_max: center.longitude + half_width,
            lat_max: center.latitude + half_width,
        }
    }

    fn to_param(self) -> String {
        format!(
            "{},{},{},{}",
            self.lon_min, self.lat_min, self.lon_max, self.lat_max
        )
    }
}

impl NominatimBackend {
    /// Create a backend for `base_url`, identifying as `user_agent`
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the forward search URL
    ///
    /// With a viewbox the search is marked `bounded`. Nominatim treats this
    /// as a preference, so results outside the box can still appear.
    pub fn search_url(&self, query: &str, limit: usize, viewbox: Option<Viewbox>) -> String {
        let mut url = format!(
            "{}/search?q={}&format=json&limit={}&addressdetails=1",
            self.base_url,
            urlencoding::encode(query),
            limit
        );
        if let Some(viewbox) = viewbox {
            url.push_str(&format!("&viewbox={}&bounded=1", viewbox.to_param()));
        }
        url
    }

    /// Build the reverse geocoding URL
    pub fn reverse_url(&self, at: Coordinate) -> String {
        format!(
            "{}/reverse?lat={}&lon={}&format=json",
            self.base_url, at.latitude, at.longitude
        )
    }

    /// Forward search, in upstream order and without distances
    ///
    /// Entries with unparsable coordinates are skipped.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
        viewbox: Option<Viewbox>,
    ) -> Result<Vec<SearchResult>> {
        let places: Vec<NominatimPlace> = self.get_json(&self.search_url(query, limit, viewbox)).await?;

        let results = places
            .into_iter()
            .filter_map(|place| match Self::parse_coords(&place.lat, &place.lon) {
                Ok((latitude, longitude)) => Some(SearchResult {
                    address: place.display_name,
                    latitude,
                    longitude,
                    distance_km: None,
                }),
                Err(e) => {
                    warn!(error = %e, address = %place.display_name, "skipping Nominatim result");
                    None
                }
            })
            .collect();

        Ok(results)
    }

    /// Reverse geocode to the full display name
    pub async fn reverse(&self, at: Coordinate) -> Result<String> {
        let reply: NominatimReverse = self.get_json(&self.reverse_url(at)).await?;

        match (reply.display_name, reply.error) {
            (Some(name), _) => Ok(name),
            (None, error) => Err(Error::LocationNotFound(
                error.unwrap_or_else(|| format!("{}, {}", at.latitude, at.longitude)),
            )),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url, "Nominatim request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("Nominatim request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::TooManyUpstreamRequests("Nominatim".to_string()));
        }
        if !status.is_success() {
            return Err(Error::UpstreamUnavailable(format!(
                "Nominatim returned status: {}",
                status
            )));
        }

        response.json().await.map_err(|e| {
            Error::UpstreamUnavailable(format!("Failed to parse Nominatim response: {}", e))
        })
    }

    /// Parse lat/lon strings to f64
    fn parse_coords(lat: &str, lon: &str) -> Result<(f64, f64)> {
        let lat: f64 = lat
            .parse()
            .map_err(|_| Error::InvalidCoordinates(format!("Invalid latitude: {}", lat)))?;
        let lon: f64 = lon
            .parse()
            .map_err(|_| Error::InvalidCoordinates(format!("Invalid longitude: {}", lon)))?;
        Ok((lat, lon))
    }
}

/// Keep the first three comma-separated parts of an address
pub fn shorten_address(display_name: &str) -> String {
    display_name
        .split(',')
        .take(3)
        .collect::<Vec<_>>()
        .join(",")
}
