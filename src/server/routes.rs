//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::clock::Clock;
use crate::coord::Coordinate;
use crate::error::Error;
use crate::geo::{CacheStats, Endpoint, RouteResult, SearchResult};
use crate::server::state::AppState;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router<C: Clock + 'static>(state: Arc<AppState<C>>) -> Router {
    Router::new()
        .route("/api/search", get(search_handler::<C>))
        .route("/api/reverse", get(reverse_handler::<C>))
        .route("/api/route", get(route_handler::<C>))
        .route("/api/plan", get(plan_handler::<C>))
        .route("/api/status", get(status_handler::<C>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, code) = match &err {
            Error::RateLimitExceeded { .. } => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            Error::RouteNotFound => (StatusCode::NOT_FOUND, "ROUTE_NOT_FOUND"),
            Error::LocationNotFound(_) => (StatusCode::NOT_FOUND, "LOCATION_NOT_FOUND"),
            Error::InvalidCoordinates(_) => (StatusCode::BAD_REQUEST, "INVALID_COORDINATES"),
            Error::UpstreamUnavailable(_) | Error::TooManyUpstreamRequests(_) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
            status,
        }
    }
}

/// Validate an optional lat/lng pair from query parameters
fn optional_coordinate(lat: Option<f64>, lng: Option<f64>) -> Result<Option<Coordinate>, ApiError> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => {
            let at = Coordinate::new(lat, lng);
            at.validate()?;
            Ok(Some(at))
        }
        (None, None) => Ok(None),
        _ => Err(Error::InvalidCoordinates("lat and lng must be given together".to_string()).into()),
    }
}

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Forward search endpoint
///
/// GET /api/search?q=&lat=&lng=
async fn search_handler<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let reference = optional_coordinate(params.lat, params.lng)?;
    let results = state.client.search(&params.q, reference).await?;
    Ok(Json(results))
}

/// Reverse geocoding query parameters
#[derive(Debug, Deserialize)]
pub struct ReverseParams {
    pub lat: f64,
    pub lng: f64,
}

/// Reverse geocoding response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReverseResponse {
    pub address: String,
}

/// Reverse geocoding endpoint
///
/// GET /api/reverse?lat=&lng=
async fn reverse_handler<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Query(params): Query<ReverseParams>,
) -> Result<Json<ReverseResponse>, ApiError> {
    let at = Coordinate::new(params.lat, params.lng);
    at.validate()?;
    let address = state.client.reverse_geocode(at).await;
    Ok(Json(ReverseResponse { address }))
}

/// Route query parameters
#[derive(Debug, Deserialize)]
pub struct RouteParams {
    pub from_lat: f64,
    pub from_lng: f64,
    pub to_lat: f64,
    pub to_lng: f64,
}

/// Route between coordinates endpoint
///
/// GET /api/route?from_lat=&from_lng=&to_lat=&to_lng=
async fn route_handler<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Query(params): Query<RouteParams>,
) -> Result<Json<RouteResult>, ApiError> {
    let start = Coordinate::new(params.from_lat, params.from_lng);
    let end = Coordinate::new(params.to_lat, params.to_lng);
    start.validate()?;
    end.validate()?;
    let route = state.client.get_route(start, end).await?;
    Ok(Json(route))
}

/// Plan query parameters
#[derive(Debug, Deserialize)]
pub struct PlanParams {
    pub from: String,
    pub to: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Route between two text locations endpoint
///
/// GET /api/plan?from=&to=&lat=&lng=
async fn plan_handler<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Query(params): Query<PlanParams>,
) -> Result<Json<RouteResult>, ApiError> {
    let reference = optional_coordinate(params.lat, params.lng)?;
    let route = state
        .client
        .plan_route(
            Endpoint::Query(params.from),
            Endpoint::Query(params.to),
            reference,
        )
        .await?;
    Ok(Json(route))
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Cache sizes
    #[serde(flatten)]
    pub caches: CacheStats,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler<C: Clock>(State(state): State<Arc<AppState<C>>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        caches: state.client.stats().await,
        uptime_secs: state.uptime_secs(),
    })
}
