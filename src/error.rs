//! Error types for mob-acesso

use thiserror::Error;

/// Main error type for mob-acesso operations
#[derive(Error, Debug)]
pub enum Error {
    /// The local limiter rejected a geocoding call before any network I/O
    #[error("Too many requests in a short period, retry in {retry_after_ms} ms")]
    RateLimitExceeded { retry_after_ms: i64 },

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The upstream service answered HTTP 429
    #[error("Upstream rate limited: {0}")]
    TooManyUpstreamRequests(String),

    #[error("No route found between the given points")]
    RouteNotFound,

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for mob-acesso operations
pub type Result<T> = std::result::Result<T, Error>;
