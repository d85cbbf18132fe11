//! mob-acesso: geocoding and routing for accessible transit
//!
//! The client side of a bus-stop accessibility app: find places, label the
//! user's position and fetch routes, without hammering the public
//! OpenStreetMap services it relies on.
//!
//! ## Features
//!
//! - Nominatim forward search with proximity ranking
//! - Reverse geocoding to short, display-ready labels
//! - OSRM routing with polyline simplification
//! - 1 request/second floor on geocoding, time-expiring caches
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```no_run
//! use mob_acesso::{Config, Coordinate, GeoClient};
//!
//! # async fn demo() -> mob_acesso::Result<()> {
//! let client = GeoClient::new(&Config::default())?;
//! let here = Coordinate::new(-23.5505, -46.6333); // São Paulo
//!
//! let stops = client.search("Terminal Bandeira", Some(here)).await?;
//! if let Some(stop) = stops.first() {
//!     let route = client.get_route(here, stop.coordinate()).await?;
//!     println!("{} km, {} min", route.distance_km, route.duration_minutes);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod clock;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod format;
pub mod geo;
pub mod limiter;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use coord::{Coordinate, Region};
pub use error::{Error, Result};
pub use geo::{Endpoint, GeoClient, RouteResult, SearchResult};
