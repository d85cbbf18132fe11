//! Default configuration values
//!
//! Named constants for all tunable parameters

pub use crate::constants::api::{NOMINATIM_URL as DEFAULT_NOMINATIM_URL, OSRM_URL as DEFAULT_OSRM_URL};

/// User-Agent sent to Nominatim
pub const DEFAULT_USER_AGENT: &str = crate::constants::api::USER_AGENT;

/// Routing request timeout in milliseconds
pub const DEFAULT_ROUTE_TIMEOUT_MS: u64 = crate::constants::api::ROUTE_TIMEOUT_MS;

/// Results requested per search
pub const DEFAULT_SEARCH_LIMIT: usize = crate::constants::search::RESULT_LIMIT;

/// Shortest query that reaches the network
pub const DEFAULT_MIN_QUERY_CHARS: usize = crate::constants::search::MIN_QUERY_CHARS;

/// Viewbox half-width around the reference location, in degrees
pub const DEFAULT_VIEWBOX_DEGREES: f64 = crate::constants::search::VIEWBOX_DEGREES;

/// Search cache freshness window in seconds
pub const DEFAULT_SEARCH_CACHE_TTL_SECS: u64 = crate::constants::cache::SEARCH_TTL_SECS;

/// Minimum spacing between geocoding requests in milliseconds
pub const DEFAULT_MIN_INTERVAL_MS: u64 = crate::constants::search::MIN_INTERVAL_MS as u64;

/// Route cache freshness window in seconds
pub const DEFAULT_ROUTE_CACHE_TTL_SECS: u64 = crate::constants::cache::ROUTE_TTL_SECS;

/// Route simplification tolerance in degrees
pub const DEFAULT_SIMPLIFY_TOLERANCE: f64 = crate::constants::routing::SIMPLIFY_TOLERANCE;

/// Label returned when reverse geocoding fails
pub const DEFAULT_FALLBACK_LABEL: &str = crate::constants::search::REVERSE_FALLBACK_LABEL;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "mob-acesso";
