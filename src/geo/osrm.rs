//! OSRM routing backend
//!
//! OSRM speaks GeoJSON, so every coordinate it returns is a
//! `[longitude, latitude]` pair. They are flipped into [`Coordinate`]s
//! here and never leave this module in that order.

use crate::coord::Coordinate;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// OSRM routing backend
#[derive(Debug, Clone)]
pub struct OsrmBackend {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    /// Meters
    distance: f64,
    /// Seconds
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// The first route OSRM proposes, before simplification
#[derive(Debug, Clone, PartialEq)]
pub struct RawRoute {
    pub geometry: Vec<Coordinate>,
    pub distance_m: f64,
    pub duration_s: f64,
}

impl OsrmBackend {
    /// Create a backend for `base_url` whose requests give up after `timeout`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the driving route URL
    pub fn route_url(&self, start: Coordinate, end: Coordinate) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson&steps=true&annotations=true",
            self.base_url, start.longitude, start.latitude, end.longitude, end.latitude
        )
    }

    /// Fetch the first route between two points
    pub async fn route(&self, start: Coordinate, end: Coordinate) -> Result<RawRoute> {
        let url = self.route_url(start, end);
        debug!(url = %url, "OSRM request");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::UpstreamUnavailable("OSRM request timed out".to_string())
            } else {
                Error::UpstreamUnavailable(format!("OSRM request failed: {}", e))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("OSRM response failed: {}", e)))?;

        let parsed = serde_json::from_str::<OsrmResponse>(&body);

        if !status.is_success() {
            // OSRM reports unroutable pairs as 400 with code "NoRoute"
            return match parsed {
                Ok(reply) if reply.code.as_deref() == Some("NoRoute") => Err(Error::RouteNotFound),
                _ => Err(Error::UpstreamUnavailable(format!(
                    "OSRM returned status: {}",
                    status
                ))),
            };
        }

        let reply = parsed.map_err(|e| {
            Error::UpstreamUnavailable(format!("Failed to parse OSRM response: {}", e))
        })?;

        let route = reply.routes.into_iter().next().ok_or(Error::RouteNotFound)?;

        Ok(RawRoute {
            geometry: route
                .geometry
                .coordinates
                .into_iter()
                .map(Coordinate::from_lng_lat)
                .collect(),
            distance_m: route.distance,
            duration_s: route.duration,
        })
    }
}
