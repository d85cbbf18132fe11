//! Outbound request spacing
//!
//! Nominatim's usage policy allows at most one request per second. The
//! limiter enforces that floor locally, before any network I/O.

use crate::error::{Error, Result};
use std::time::Duration;

/// Minimum-interval rate limiter
#[derive(Debug, Clone)]
pub struct RateLimiter {
    last_request_ms: Option<i64>,
    min_interval_ms: i64,
}

impl RateLimiter {
    /// Create a limiter with the given minimum spacing
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_request_ms: None,
            min_interval_ms: min_interval.as_millis() as i64,
        }
    }

    /// Reject if the previous request was less than the interval ago,
    /// otherwise record `now_ms` as the latest request
    pub fn check_and_record(&mut self, now_ms: i64) -> Result<()> {
        let wait = self.remaining_ms(now_ms);
        if wait > 0 {
            return Err(Error::RateLimitExceeded {
                retry_after_ms: wait,
            });
        }
        self.last_request_ms = Some(now_ms);
        Ok(())
    }

    /// Milliseconds until the next request is allowed (0 when allowed now)
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        match self.last_request_ms {
            Some(last) => (self.min_interval_ms - (now_ms - last)).max(0),
            None => 0,
        }
    }
}
