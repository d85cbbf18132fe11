//! Centralized constants for the mob-acesso crate
//!
//! Values shared by the core, the config defaults and the tests.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometers
    pub const EARTH_RADIUS_KM: f64 = 6371.0;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// Public OSRM demo server
    pub const OSRM_URL: &str = "https://router.project-osrm.org";

    /// Nominatim's usage policy requires an identifying User-Agent
    pub const USER_AGENT: &str = "MobAcesso App";

    /// Routing request timeout in milliseconds
    pub const ROUTE_TIMEOUT_MS: u64 = 5000;
}

/// Cache settings
pub mod cache {
    /// Search results stay fresh for 5 minutes
    pub const SEARCH_TTL_SECS: u64 = 5 * 60;

    /// Routes stay fresh for 30 minutes
    pub const ROUTE_TTL_SECS: u64 = 30 * 60;

    /// Decimal places of the reference location in search keys (~110 m)
    pub const SEARCH_KEY_PRECISION: usize = 3;

    /// Decimal places of route endpoints in route keys (~1 m)
    pub const ROUTE_KEY_PRECISION: usize = 5;
}

/// Geocoding request settings
pub mod search {
    /// Minimum spacing between two outbound geocoding requests
    pub const MIN_INTERVAL_MS: i64 = 1000;

    /// Number of results requested from Nominatim
    pub const RESULT_LIMIT: usize = 5;

    /// Queries shorter than this never reach the network
    pub const MIN_QUERY_CHARS: usize = 3;

    /// Half-width of the viewbox around a reference location (~50 km)
    pub const VIEWBOX_DEGREES: f64 = 0.5;

    /// Label returned when reverse geocoding fails
    pub const REVERSE_FALLBACK_LABEL: &str = "Localização atual";
}

/// Routing settings
pub mod routing {
    /// Simplifier tolerance in degrees
    pub const SIMPLIFY_TOLERANCE: f64 = 0.00001;
}

/// Initial map region
pub mod region {
    use crate::coord::Region;

    /// São Paulo city centre
    pub const INITIAL_REGION: Region = Region {
        latitude: -23.5505,
        longitude: -46.6333,
        latitude_delta: 0.0922,
        longitude_delta: 0.0421,
    };
}
