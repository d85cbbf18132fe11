//! Server shared state
//!
//! Holds configuration and the one `GeoClient` every request shares.

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::Result;
use crate::geo::GeoClient;
use std::time::Instant;

/// Shared state for the HTTP server
pub struct AppState<C: Clock = SystemClock> {
    /// Configuration
    pub config: Config,

    /// Geocoding and routing client
    pub client: GeoClient<C>,

    started: Instant,
}

impl AppState<SystemClock> {
    /// Create new application state
    pub fn new(config: Config) -> Result<Self> {
        let client = GeoClient::new(&config)?;
        Ok(Self::with_client(config, client))
    }
}

impl<C: Clock> AppState<C> {
    /// Create state around an existing client
    pub fn with_client(config: Config, client: GeoClient<C>) -> Self {
        Self {
            config,
            client,
            started: Instant::now(),
        }
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
