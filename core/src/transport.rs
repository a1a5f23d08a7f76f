#![deny(missing_docs)]

//! # Transport
//!
//! Narrow interfaces to the collaborators the engine relies on but does not
//! own: the HTTP transport and the rate limiter.
//!
//! Retries, timeouts and permit bookkeeping all live behind these traits.

use crate::platform::Platform;
use derive_more::Display;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpTransport;

/// Failures reported by a `Transport`.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The remote service reported the resource as absent.
    #[display("{_0}")]
    NotFound(String),

    /// Any other non-success status.
    #[display("HTTP {code} from {url}")]
    Status {
        /// Status code.
        code: u16,
        /// Requested URL.
        url: String,
    },

    /// Connection level failure.
    #[display("IO Error: {_0}")]
    Io(String),

    /// The body could not be decoded.
    #[display("Decode Error: {_0}")]
    Decode(String),
}

impl std::error::Error for TransportError {}

/// Query string parameters, in send order.
pub type Params = Vec<(String, String)>;

/// Performs a GET and returns the decoded JSON payload.
pub trait Transport: Send + Sync {
    /// Fetches `url` with `params`, waiting on `limiter` before sending.
    fn fetch(&self, url: &str, params: &Params, limiter: &LimiterHandle)
        -> Result<Value, TransportError>;
}

/// A throttle scoped to one platform and endpoint bucket.
pub trait Throttle: Send + Sync {
    /// Blocks until a request may be sent.
    fn acquire(&self);
}

/// Shared handle to a bucket throttle.
pub type LimiterHandle = Arc<dyn Throttle>;

/// Hands out throttles per platform and bucket (e.g. `staticdata/champion`).
pub trait RateLimiter: Send + Sync {
    /// Returns the throttle for a bucket.
    fn for_bucket(&self, platform: Platform, bucket: &str) -> LimiterHandle;
}

/// A rate limiter that never waits.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnlimitedRateLimiter;

struct NoWait;

impl Throttle for NoWait {
    fn acquire(&self) {}
}

impl RateLimiter for UnlimitedRateLimiter {
    fn for_bucket(&self, _platform: Platform, _bucket: &str) -> LimiterHandle {
        Arc::new(NoWait)
    }
}

/// Enforces a minimum interval between requests of the same bucket.
pub struct IntervalRateLimiter {
    interval: Duration,
    buckets: Mutex<HashMap<(Platform, String), LimiterHandle>>,
}

impl IntervalRateLimiter {
    /// Creates a limiter with the given minimum spacing.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            buckets: Mutex::new(HashMap::new()),
        }
    }
}

struct IntervalThrottle {
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Throttle for IntervalThrottle {
    fn acquire(&self) {
        let mut last = self.last_request.lock();
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                std::thread::sleep(self.interval - elapsed);
            }
        }
        *last = Some(Instant::now());
    }
}

impl RateLimiter for IntervalRateLimiter {
    fn for_bucket(&self, platform: Platform, bucket: &str) -> LimiterHandle {
        let mut buckets = self.buckets.lock();
        buckets
            .entry((platform, bucket.to_string()))
            .or_insert_with(|| {
                Arc::new(IntervalThrottle {
                    interval: self.interval,
                    last_request: Mutex::new(None),
                })
            })
            .clone()
    }
}
