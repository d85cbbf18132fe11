//! Time-expiring in-memory caches
//!
//! Entries are stamped with the time they were stored and expire lazily:
//! nothing sweeps the map in the background, a lookup that finds an
//! expired entry evicts it. Callers pass the current time in, so the cache
//! itself holds no clock.
//!
//! The two caches disagree on the boundary: a search entry exactly `ttl`
//! old is still fresh, a route exactly `ttl` old is not.

use crate::constants::cache::{ROUTE_KEY_PRECISION, SEARCH_KEY_PRECISION};
use crate::coord::Coordinate;
use crate::geo::{RouteResult, SearchResult};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// A cached value with its storage timestamp
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub stored_at_ms: i64,
}

/// When an entry stops being fresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Fresh while `age <= ttl`
    AfterTtl,
    /// Fresh while `age < ttl`
    AtTtl,
}

impl<T> CacheEntry<T> {
    fn is_expired(&self, now_ms: i64, ttl_ms: i64, expiry: Expiry) -> bool {
        let age = now_ms - self.stored_at_ms;
        match expiry {
            Expiry::AfterTtl => age > ttl_ms,
            Expiry::AtTtl => age >= ttl_ms,
        }
    }
}

/// String-keyed cache with a fixed time-to-live
#[derive(Debug, Clone)]
pub struct TtlCache<T> {
    entries: HashMap<String, CacheEntry<T>>,
    ttl_ms: i64,
    expiry: Expiry,
}

/// Forward search results keyed by [`search_key`]
pub type SearchCache = TtlCache<Vec<SearchResult>>;

/// Routes keyed by [`route_key`]
pub type RouteCache = TtlCache<RouteResult>;

impl<T: Clone> TtlCache<T> {
    /// Create an empty cache whose entries expire once older than `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self::with_expiry(ttl, Expiry::AfterTtl)
    }

    /// Create an empty cache with an explicit boundary rule
    pub fn with_expiry(ttl: Duration, expiry: Expiry) -> Self {
        Self {
            entries: HashMap::new(),
            ttl_ms: ttl.as_millis() as i64,
            expiry,
        }
    }

    /// Get a fresh entry, evicting it if it has expired
    pub fn get(&mut self, key: &str, now_ms: i64) -> Option<T> {
        let expired = self.entries.get(key)?.is_expired(now_ms, self.ttl_ms, self.expiry);
        if expired {
            debug!(key, "cache entry expired");
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Get an entry regardless of age, without evicting it
    pub fn get_stale(&self, key: &str) -> Option<T> {
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Store a value, replacing any previous entry
    pub fn put(&mut self, key: impl Into<String>, value: T, now_ms: i64) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                stored_at_ms: now_ms,
            },
        );
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&mut self, now_ms: i64) -> usize {
        let before = self.entries.len();
        let (ttl_ms, expiry) = (self.ttl_ms, self.expiry);
        self.entries
            .retain(|_, entry| !entry.is_expired(now_ms, ttl_ms, expiry));
        before - self.entries.len()
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl SearchCache {
    /// Search cache; an entry exactly `ttl` old is still served
    pub fn for_search(ttl: Duration) -> Self {
        Self::with_expiry(ttl, Expiry::AfterTtl)
    }
}

impl RouteCache {
    /// Route cache; an entry is served only while younger than `ttl`
    pub fn for_routes(ttl: Duration) -> Self {
        Self::with_expiry(ttl, Expiry::AtTtl)
    }
}

/// Key for a forward search
///
/// The reference location is rounded so GPS jitter between keystrokes
/// still lands on the same entry.
pub fn search_key(query: &str, reference: Option<Coordinate>) -> String {
    match reference {
        None => query.to_string(),
        Some(at) => format!(
            "{}-{:.p$}-{:.p$}",
            query,
            at.latitude,
            at.longitude,
            p = SEARCH_KEY_PRECISION
        ),
    }
}

/// Key for a route between two endpoints
pub fn route_key(start: Coordinate, end: Coordinate) -> String {
    format!(
        "{:.p$},{:.p$}-{:.p$},{:.p$}",
        start.latitude,
        start.longitude,
        end.latitude,
        end.longitude,
        p = ROUTE_KEY_PRECISION
    )
}
