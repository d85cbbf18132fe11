//! Geocoding and routing
//!
//! HTTP backends for Nominatim (geocoding) and OSRM (routing), and the
//! [`GeoClient`] that puts rate limiting, caching, ranking and route
//! simplification in front of them.

pub mod client;
pub mod nominatim;
pub mod osrm;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{CacheStats, GeoClient};

use crate::coord::Coordinate;
use serde::{Deserialize, Serialize};

/// A forward geocoding hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Full display name
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Great-circle distance from the reference location, when one was given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl SearchResult {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// A route ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    /// Simplified polyline from origin to destination
    pub geometry: Vec<Coordinate>,
    /// Kilometers, one decimal place
    pub distance_km: f64,
    /// Whole minutes
    pub duration_minutes: i64,
}

impl RouteResult {
    /// Build from the raw meters/seconds the routing service reports
    pub fn new(geometry: Vec<Coordinate>, distance_m: f64, duration_s: f64) -> Self {
        Self {
            geometry,
            distance_km: (distance_m / 100.0).round() / 10.0,
            duration_minutes: (duration_s / 60.0).round() as i64,
        }
    }
}

/// One end of a planned route
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    /// A known coordinate
    At(Coordinate),
    /// Free text to geocode; the best hit is used
    Query(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_result_units() {
        let route = RouteResult::new(Vec::new(), 3_249.0, 2_530.0);
        assert_eq!(route.distance_km, 3.2);
        assert_eq!(route.duration_minutes, 42);
    }

    #[test]
    fn test_route_result_rounds_half_up() {
        let route = RouteResult::new(Vec::new(), 1_250.0, 150.0);
        assert_eq!(route.distance_km, 1.3);
        assert_eq!(route.duration_minutes, 3);
    }

    #[test]
    fn test_search_result_serialization() {
        let near = SearchResult {
            address: "Terminal Parque Dom Pedro II".to_string(),
            latitude: -23.5489,
            longitude: -46.6283,
            distance_km: Some(0.7),
        };
        let json = serde_json::to_value(&near).unwrap();
        assert_eq!(json["distanceKm"], 0.7);

        let plain = SearchResult {
            distance_km: None,
            ..near
        };
        let json = serde_json::to_value(&plain).unwrap();
        assert!(json.get("distanceKm").is_none());
    }

    #[test]
    fn test_route_result_serialization() {
        let route = RouteResult::new(vec![Coordinate::new(-23.5, -46.6)], 1_000.0, 60.0);
        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(json["distanceKm"], 1.0);
        assert_eq!(json["durationMinutes"], 1);
        assert_eq!(json["geometry"][0]["latitude"], -23.5);
    }
}
