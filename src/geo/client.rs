//! Geocoding and routing client
//!
//! One `GeoClient` is built at startup and shared by every caller. It owns
//! the search cache, the route cache and the rate limiter, so their state
//! is per-client rather than process-global.
//!
//! Locks are only held for in-memory bookkeeping, never across a network
//! call. Concurrent searches for different queries may complete in any
//! order; discarding superseded results is up to the caller.

use crate::cache::{route_key, search_key, RouteCache, SearchCache};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::constants::region::INITIAL_REGION;
use crate::coord::distance::distance_km;
use crate::coord::simplify::simplify;
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::geo::nominatim::{shorten_address, NominatimBackend, Viewbox};
use crate::geo::osrm::OsrmBackend;
use crate::geo::{Endpoint, RouteResult, SearchResult};
use crate::limiter::RateLimiter;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Tunables copied out of [`Config`]
#[derive(Debug, Clone)]
struct Settings {
    limit: usize,
    min_query_chars: usize,
    viewbox_degrees: f64,
    simplify_tolerance: f64,
    fallback_label: String,
    default_reference: Option<Coordinate>,
}

/// Entry counts of both caches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub search_entries: usize,
    pub route_entries: usize,
}

/// Rate-limited, caching client for geocoding and routing
pub struct GeoClient<C: Clock = SystemClock> {
    nominatim: NominatimBackend,
    osrm: OsrmBackend,
    search_cache: Mutex<SearchCache>,
    route_cache: Mutex<RouteCache>,
    limiter: Mutex<RateLimiter>,
    settings: Settings,
    clock: C,
}

impl GeoClient<SystemClock> {
    /// Create a client on the wall clock
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> GeoClient<C> {
    /// Create a client reading time from `clock`
    pub fn with_clock(config: &Config, clock: C) -> Result<Self> {
        let nominatim =
            NominatimBackend::new(&config.services.nominatim_url, &config.services.user_agent)?;
        let osrm = OsrmBackend::new(
            &config.services.osrm_url,
            Duration::from_millis(config.services.route_timeout_ms),
        )?;

        Ok(Self {
            nominatim,
            osrm,
            search_cache: Mutex::new(SearchCache::for_search(Duration::from_secs(
                config.search.cache_ttl_secs,
            ))),
            route_cache: Mutex::new(RouteCache::for_routes(Duration::from_secs(
                config.routing.cache_ttl_secs,
            ))),
            limiter: Mutex::new(RateLimiter::new(Duration::from_millis(
                config.search.min_interval_ms,
            ))),
            settings: Settings {
                limit: config.search.limit,
                min_query_chars: config.search.min_query_chars,
                viewbox_degrees: config.search.viewbox_degrees,
                simplify_tolerance: config.routing.simplify_tolerance,
                fallback_label: config.reverse.fallback_label.clone(),
                default_reference: config
                    .location
                    .default_bias
                    .then(|| INITIAL_REGION.center()),
            },
            clock,
        })
    }

    /// Forward search for free text
    ///
    /// Queries shorter than the configured minimum return nothing without
    /// touching the network. A fresh cache entry is served without
    /// consulting the limiter. With a reference location the results carry
    /// `distance_km` and are sorted nearest first.
    ///
    /// # Errors
    /// - [`Error::RateLimitExceeded`] if the previous geocoding request was
    ///   too recent
    /// - [`Error::UpstreamUnavailable`] on transport or server failure, and
    ///   on an upstream 429 when there is no stale entry to fall back to
    pub async fn search(
        &self,
        query: &str,
        reference: Option<Coordinate>,
    ) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.chars().count() < self.settings.min_query_chars {
            return Ok(Vec::new());
        }

        let reference = reference.or(self.settings.default_reference);
        let key = search_key(query, reference);
        let now = self.clock.now_ms();

        // Take the stale copy before get() evicts it
        let stale = {
            let mut cache = self.search_cache.lock().await;
            let stale = cache.get_stale(&key);
            if let Some(results) = cache.get(&key, now) {
                debug!(key = %key, "search cache hit");
                return Ok(results);
            }
            stale
        };

        self.limiter.lock().await.check_and_record(now)?;

        let viewbox = reference.map(|at| Viewbox::around(at, self.settings.viewbox_degrees));
        match self.nominatim.search(query, self.settings.limit, viewbox).await {
            Ok(mut results) => {
                if let Some(at) = reference {
                    rank_by_distance(&mut results, at);
                }
                self.search_cache
                    .lock()
                    .await
                    .put(key, results.clone(), now);
                Ok(results)
            }
            Err(Error::TooManyUpstreamRequests(service)) => {
                let stale = match stale {
                    Some(results) => Some(results),
                    None => self.search_cache.lock().await.get_stale(&key),
                };
                match stale {
                    Some(results) => {
                        warn!(key = %key, "{} rate limited, serving stale results", service);
                        Ok(results)
                    }
                    None => Err(Error::UpstreamUnavailable(format!(
                        "{} rate limited the request",
                        service
                    ))),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Short address for a coordinate
    ///
    /// Never fails: any error, including a limiter rejection, yields the
    /// configured fallback label.
    pub async fn reverse_geocode(&self, at: Coordinate) -> String {
        match self.try_reverse_geocode(at).await {
            Ok(address) => shorten_address(&address),
            Err(e) => {
                warn!(error = %e, "reverse geocoding failed, using fallback label");
                self.settings.fallback_label.clone()
            }
        }
    }

    async fn try_reverse_geocode(&self, at: Coordinate) -> Result<String> {
        at.validate()?;
        self.limiter
            .lock()
            .await
            .check_and_record(self.clock.now_ms())?;
        self.nominatim.reverse(at).await
    }

    /// Route between two coordinates
    ///
    /// Routing does not go through the geocoding rate limiter. Expired
    /// routes are never served, not even when the routing service fails.
    ///
    /// # Errors
    /// - [`Error::RouteNotFound`] when the service has no route
    /// - [`Error::UpstreamUnavailable`] on timeout, transport or server failure
    pub async fn get_route(&self, start: Coordinate, end: Coordinate) -> Result<RouteResult> {
        let key = route_key(start, end);

        let cached = self.route_cache.lock().await.get(&key, self.clock.now_ms());
        if let Some(route) = cached {
            debug!(key = %key, "route cache hit");
            return Ok(route);
        }

        let raw = self.osrm.route(start, end).await?;
        let before = raw.geometry.len();
        let geometry = simplify(&raw.geometry, self.settings.simplify_tolerance);
        debug!(key = %key, before, after = geometry.len(), "route simplified");

        let route = RouteResult::new(geometry, raw.distance_m, raw.duration_s);
        self.route_cache
            .lock()
            .await
            .put(key, route.clone(), self.clock.now_ms());
        Ok(route)
    }

    /// Route between two endpoints that may still need geocoding
    ///
    /// Text endpoints resolve to their best search hit, biased to
    /// `reference`. Before each text lookup the client waits out the rate
    /// limiter so a two-text plan does not reject itself.
    ///
    /// # Errors
    /// [`Error::LocationNotFound`] when a text endpoint has no hits, plus
    /// anything [`GeoClient::search`] or [`GeoClient::get_route`] return.
    pub async fn plan_route(
        &self,
        from: Endpoint,
        to: Endpoint,
        reference: Option<Coordinate>,
    ) -> Result<RouteResult> {
        let start = self.resolve(from, reference).await?;
        let end = self.resolve(to, reference).await?;
        self.get_route(start, end).await
    }

    async fn resolve(&self, endpoint: Endpoint, reference: Option<Coordinate>) -> Result<Coordinate> {
        match endpoint {
            Endpoint::At(at) => {
                at.validate()?;
                Ok(at)
            }
            Endpoint::Query(query) => {
                self.wait_for_limiter().await;
                let results = self.search(&query, reference).await?;
                results
                    .first()
                    .map(SearchResult::coordinate)
                    .ok_or(Error::LocationNotFound(query))
            }
        }
    }

    async fn wait_for_limiter(&self) {
        let wait_ms = self.limiter.lock().await.remaining_ms(self.clock.now_ms());
        if wait_ms > 0 {
            debug!(wait_ms, "pacing geocoding request");
            self.clock.sleep(Duration::from_millis(wait_ms as u64)).await;
        }
    }

    /// Current cache sizes, expired entries included
    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            search_entries: self.search_cache.lock().await.len(),
            route_entries: self.route_cache.lock().await.len(),
        }
    }

    /// Drop expired entries from both caches
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now_ms();
        self.search_cache.lock().await.purge_expired(now)
            + self.route_cache.lock().await.purge_expired(now)
    }

    /// Empty both caches
    pub async fn clear_caches(&self) {
        self.search_cache.lock().await.clear();
        self.route_cache.lock().await.clear();
    }
}

/// Attach distances from `reference` and sort nearest first
///
/// The sort is stable, so equidistant results keep the upstream order.
fn rank_by_distance(results: &mut [SearchResult], reference: Coordinate) {
    for result in results.iter_mut() {
        result.distance_km = Some(distance_km(reference, result.coordinate()));
    }
    results.sort_by(|a, b| {
        a.distance_km
            .unwrap_or(f64::INFINITY)
            .total_cmp(&b.distance_km.unwrap_or(f64::INFINITY))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::geo::fake::{config_for, FakeUpstream};
    use axum::http::StatusCode;
    use serde_json::json;

    const T0: i64 = 1_700_000_000_000;

    struct Harness {
        nominatim: FakeUpstream,
        osrm: FakeUpstream,
        clock: ManualClock,
        client: GeoClient<ManualClock>,
    }

    async fn harness_with(config_edit: impl FnOnce(&mut Config)) -> Harness {
        let nominatim = FakeUpstream::json(
            StatusCode::OK,
            json!([{"display_name": "Praça da Sé, Sé, São Paulo, Brasil", "lat": "-23.5503", "lon": "-46.6339"}]),
        )
        .await;
        let osrm = FakeUpstream::json(StatusCode::OK, osrm_body()).await;
        let clock = ManualClock::new(T0);
        let mut config = config_for(&nominatim, &osrm);
        config_edit(&mut config);
        let client = GeoClient::with_clock(&config, clock.clone()).unwrap();
        Harness {
            nominatim,
            osrm,
            clock,
            client,
        }
    }

    async fn harness() -> Harness {
        harness_with(|_| {}).await
    }

    fn osrm_body() -> serde_json::Value {
        json!({
            "code": "Ok",
            "routes": [{
                "geometry": {"coordinates": [[-46.6, -23.5], [-46.55, -23.45], [-46.5, -23.4]]},
                "distance": 14_260.0,
                "duration": 1_530.0
            }]
        })
    }

    fn place(name: &str, lat: f64, lon: f64) -> serde_json::Value {
        json!({"display_name": name, "lat": lat.to_string(), "lon": lon.to_string()})
    }

    #[tokio::test]
    async fn test_short_query_never_hits_network() {
        let h = harness().await;
        assert!(h.client.search("ab", None).await.unwrap().is_empty());
        assert!(h.client.search("", None).await.unwrap().is_empty());
        assert!(h.client.search("  a  ", None).await.unwrap().is_empty());
        assert_eq!(h.nominatim.hits(), 0);
    }

    #[tokio::test]
    async fn test_repeated_search_uses_cache() {
        let h = harness().await;
        let reference = Some(Coordinate::new(-23.5512, -46.6331));

        let first = h.client.search("Praça da Sé", reference).await.unwrap();
        h.clock.advance(Duration::from_secs(60));
        // Same key after rounding the jittered location
        let second = h
            .client
            .search("Praça da Sé", Some(Coordinate::new(-23.5508, -46.6329)))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(h.nominatim.hits(), 1);
    }

    #[tokio::test]
    async fn test_cache_hit_bypasses_limiter() {
        let h = harness().await;
        h.client.search("Praça da Sé", None).await.unwrap();
        // 10 ms later: a miss would be rate limited, a hit is not
        h.clock.advance(Duration::from_millis(10));
        assert!(h.client.search("Praça da Sé", None).await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_search_refetches() {
        let h = harness().await;
        h.client.search("Praça da Sé", None).await.unwrap();
        h.clock.advance(Duration::from_secs(5 * 60) + Duration::from_millis(1));
        h.client.search("Praça da Sé", None).await.unwrap();
        assert_eq!(h.nominatim.hits(), 2);
    }

    #[tokio::test]
    async fn test_rate_limiter_floor() {
        let h = harness().await;
        h.client.search("Estação da Luz", None).await.unwrap();

        h.clock.advance(Duration::from_millis(500));
        let result = h.client.search("Avenida Paulista", None).await;
        assert!(matches!(result, Err(Error::RateLimitExceeded { .. })));
        assert_eq!(h.nominatim.hits(), 1);

        h.clock.advance(Duration::from_millis(500));
        assert!(h.client.search("Avenida Paulista", None).await.is_ok());
        assert_eq!(h.nominatim.hits(), 2);
    }

    #[tokio::test]
    async fn test_proximity_sort() {
        let h = harness().await;
        // ~5 km, ~1 km and ~3 km east of the origin along the equator
        h.nominatim.set_json(
            StatusCode::OK,
            json!([
                place("five", 0.0, 0.045),
                place("one", 0.0, 0.009),
                place("three", 0.0, 0.027),
            ]),
        );

        let results = h
            .client
            .search("paradas", Some(Coordinate::new(0.0, 0.0)))
            .await
            .unwrap();

        let names: Vec<&str> = results.iter().map(|r| r.address.as_str()).collect();
        assert_eq!(names, vec!["one", "three", "five"]);
        let one = results[0].distance_km.unwrap();
        assert!((one - 1.0).abs() < 0.05, "got {}", one);
    }

    #[tokio::test]
    async fn test_no_reference_keeps_upstream_order_without_distances() {
        let h = harness().await;
        h.nominatim.set_json(
            StatusCode::OK,
            json!([place("far", 0.0, 1.0), place("near", 0.0, 0.1)]),
        );

        let results = h.client.search("paradas", None).await.unwrap();

        assert_eq!(results[0].address, "far");
        assert!(results.iter().all(|r| r.distance_km.is_none()));
        assert!(!h.nominatim.requests()[0].uri.contains("viewbox"));
    }

    #[tokio::test]
    async fn test_reference_adds_bounded_viewbox() {
        let h = harness().await;
        h.client
            .search("paradas", Some(Coordinate::new(0.0, 0.0)))
            .await
            .unwrap();

        let uri = &h.nominatim.requests()[0].uri;
        assert!(uri.starts_with("/search?q=paradas&format=json&limit=5&addressdetails=1"));
        assert!(uri.contains("viewbox=-0.5,-0.5,0.5,0.5"));
        assert!(uri.contains("bounded=1"));
    }

    #[tokio::test]
    async fn test_default_bias_uses_initial_region() {
        let h = harness_with(|c| c.location.default_bias = true).await;
        let results = h.client.search("Praça da Sé", None).await.unwrap();
        assert!(results[0].distance_km.is_some());
        assert!(h.nominatim.requests()[0].uri.contains("bounded=1"));
    }

    #[tokio::test]
    async fn test_upstream_429_serves_stale_entry() {
        let h = harness().await;
        let fresh = h.client.search("Praça da Sé", None).await.unwrap();

        h.clock.advance(Duration::from_secs(10 * 60));
        h.nominatim.set_reply(StatusCode::TOO_MANY_REQUESTS, "");

        let stale = h.client.search("Praça da Sé", None).await.unwrap();
        assert_eq!(stale, fresh);
        assert_eq!(h.nominatim.hits(), 2);
    }

    #[tokio::test]
    async fn test_upstream_429_without_stale_entry_is_unavailable() {
        let h = harness().await;
        h.nominatim.set_reply(StatusCode::TOO_MANY_REQUESTS, "");
        let result = h.client.search("Praça da Sé", None).await;
        assert!(matches!(result, Err(Error::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn test_upstream_error_does_not_use_stale_entry() {
        let h = harness().await;
        h.client.search("Praça da Sé", None).await.unwrap();

        h.clock.advance(Duration::from_secs(10 * 60));
        h.nominatim.set_reply(StatusCode::INTERNAL_SERVER_ERROR, "");

        let result = h.client.search("Praça da Sé", None).await;
        assert!(matches!(result, Err(Error::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn test_reverse_geocode_shortens() {
        let h = harness().await;
        h.nominatim.set_json(
            StatusCode::OK,
            json!({"display_name": "Rua Augusta, Consolação, São Paulo, Região Metropolitana, Brasil"}),
        );
        let label = h.client.reverse_geocode(Coordinate::new(-23.55, -46.65)).await;
        assert_eq!(label, "Rua Augusta, Consolação, São Paulo");
        assert!(h.nominatim.requests()[0].uri.starts_with("/reverse?lat=-23.55&lon=-46.65"));
    }

    #[tokio::test]
    async fn test_reverse_geocode_fails_soft() {
        let h = harness().await;
        h.nominatim.set_reply(StatusCode::INTERNAL_SERVER_ERROR, "");
        let label = h.client.reverse_geocode(Coordinate::new(-23.55, -46.65)).await;
        assert_eq!(label, "Localização atual");

        // Rate limited by the previous call: still the fallback, no request
        let label = h.client.reverse_geocode(Coordinate::new(-23.55, -46.65)).await;
        assert_eq!(label, "Localização atual");
        assert_eq!(h.nominatim.hits(), 1);
    }

    #[tokio::test]
    async fn test_reverse_geocode_shares_limiter_with_search() {
        let h = harness().await;
        h.client.search("Praça da Sé", None).await.unwrap();
        let label = h.client.reverse_geocode(Coordinate::new(-23.55, -46.65)).await;
        assert_eq!(label, "Localização atual");
        assert_eq!(h.nominatim.hits(), 1);
    }

    #[tokio::test]
    async fn test_get_route_flips_simplifies_and_converts() {
        let h = harness().await;
        let route = h
            .client
            .get_route(Coordinate::new(-23.5, -46.6), Coordinate::new(-23.4, -46.5))
            .await
            .unwrap();

        // The midpoint is collinear and dropped
        assert_eq!(
            route.geometry,
            vec![Coordinate::new(-23.5, -46.6), Coordinate::new(-23.4, -46.5)]
        );
        assert_eq!(route.distance_km, 14.3);
        assert_eq!(route.duration_minutes, 26);
    }

    #[tokio::test]
    async fn test_route_cache_and_expiry() {
        let h = harness().await;
        let start = Coordinate::new(-23.5, -46.6);
        let end = Coordinate::new(-23.4, -46.5);

        h.client.get_route(start, end).await.unwrap();
        h.clock.advance(Duration::from_secs(29 * 60));
        h.client
            .get_route(Coordinate::new(-23.500001, -46.600001), end)
            .await
            .unwrap();
        assert_eq!(h.osrm.hits(), 1);

        h.clock.advance(Duration::from_secs(2 * 60));
        h.client.get_route(start, end).await.unwrap();
        assert_eq!(h.osrm.hits(), 2);
    }

    #[tokio::test]
    async fn test_route_refetched_at_exactly_thirty_minutes() {
        let h = harness().await;
        let start = Coordinate::new(-23.5, -46.6);
        let end = Coordinate::new(-23.4, -46.5);

        h.client.get_route(start, end).await.unwrap();
        h.clock.advance(Duration::from_secs(30 * 60));
        h.client.get_route(start, end).await.unwrap();
        assert_eq!(h.osrm.hits(), 2);
    }

    #[tokio::test]
    async fn test_routes_ignore_geocoding_limiter() {
        let h = harness().await;
        h.client.search("Praça da Sé", None).await.unwrap();
        assert!(h
            .client
            .get_route(Coordinate::new(-23.5, -46.6), Coordinate::new(-23.4, -46.5))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_expired_route_not_served_on_failure() {
        let h = harness().await;
        let start = Coordinate::new(-23.5, -46.6);
        let end = Coordinate::new(-23.4, -46.5);
        h.client.get_route(start, end).await.unwrap();

        h.clock.advance(Duration::from_secs(31 * 60));
        h.osrm.set_reply(StatusCode::BAD_GATEWAY, "");
        assert!(matches!(
            h.client.get_route(start, end).await,
            Err(Error::UpstreamUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_route_not_found() {
        let h = harness().await;
        h.osrm.set_json(StatusCode::OK, json!({"code": "Ok", "routes": []}));
        let result = h
            .client
            .get_route(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0))
            .await;
        assert!(matches!(result, Err(Error::RouteNotFound)));
        assert_eq!(h.client.stats().await.route_entries, 0);
    }

    #[tokio::test]
    async fn test_plan_route_with_two_queries_paces_itself() {
        let h = harness().await;
        let route = h
            .client
            .plan_route(
                Endpoint::Query("Praça da Sé".to_string()),
                Endpoint::Query("Estação da Luz".to_string()),
                None,
            )
            .await
            .unwrap();

        assert_eq!(route.duration_minutes, 26);
        assert_eq!(h.nominatim.hits(), 2);
        assert_eq!(h.osrm.hits(), 1);
        // The second lookup waited out the interval
        assert!(h.clock.now_ms() >= T0 + 1_000);
        let osrm_uri = &h.osrm.requests()[0].uri;
        assert!(osrm_uri.starts_with("/route/v1/driving/-46.6339,-23.5503;-46.6339,-23.5503"));
    }

    #[tokio::test]
    async fn test_plan_route_location_not_found() {
        let h = harness().await;
        h.nominatim.set_json(StatusCode::OK, json!([]));
        let result = h
            .client
            .plan_route(
                Endpoint::At(Coordinate::new(-23.5, -46.6)),
                Endpoint::Query("lugar nenhum".to_string()),
                None,
            )
            .await;

        match result {
            Err(Error::LocationNotFound(query)) => assert_eq!(query, "lugar nenhum"),
            other => panic!("expected LocationNotFound, got {:?}", other),
        }
        assert_eq!(h.osrm.hits(), 0);
    }

    #[tokio::test]
    async fn test_plan_route_rejects_invalid_coordinate() {
        let h = harness().await;
        let result = h
            .client
            .plan_route(
                Endpoint::At(Coordinate::new(95.0, 0.0)),
                Endpoint::At(Coordinate::new(0.0, 0.0)),
                None,
            )
            .await;
        assert!(matches!(result, Err(Error::InvalidCoordinates(_))));
    }

    #[tokio::test]
    async fn test_stats_purge_and_clear() {
        let h = harness().await;
        h.client.search("Praça da Sé", None).await.unwrap();
        h.client
            .get_route(Coordinate::new(-23.5, -46.6), Coordinate::new(-23.4, -46.5))
            .await
            .unwrap();
        assert_eq!(
            h.client.stats().await,
            CacheStats {
                search_entries: 1,
                route_entries: 1
            }
        );

        h.clock.advance(Duration::from_secs(6 * 60));
        assert_eq!(h.client.purge_expired().await, 1);

        h.client.clear_caches().await;
        assert_eq!(h.client.stats().await.route_entries, 0);
    }

    #[test]
    fn test_rank_by_distance_is_stable() {
        let mut results = vec![
            SearchResult {
                address: "a".to_string(),
                latitude: 0.0,
                longitude: 1.0,
                distance_km: None,
            },
            SearchResult {
                address: "b".to_string(),
                latitude: 0.0,
                longitude: -1.0,
                distance_km: None,
            },
        ];
        rank_by_distance(&mut results, Coordinate::new(0.0, 0.0));
        assert_eq!(results[0].address, "a");
        assert_eq!(results[0].distance_km, results[1].distance_km);
    }
}
