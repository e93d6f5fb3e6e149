//! Token-bucket limiter shared by every outbound catalog request.

use std::num::NonZeroU32;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use kourai_common::{Error, Result};

/// Shared request limiter.
///
/// Construct one per run and hand it to every provider by `Arc`; all
/// requests then draw from the same bucket.
pub struct RequestLimiter {
    inner: DefaultDirectRateLimiter,
    per_second: NonZeroU32,
    burst: NonZeroU32,
}

impl RequestLimiter {
    /// Create a limiter allowing `per_second` sustained requests and bursts
    /// of up to `burst`.
    pub fn new(per_second: NonZeroU32, burst: NonZeroU32) -> Self {
        let quota = Quota::per_second(per_second).allow_burst(burst);
        Self {
            inner: RateLimiter::direct(quota),
            per_second,
            burst,
        }
    }

    /// Create a limiter from plain integers, rejecting zero.
    pub fn try_new(per_second: u32, burst: u32) -> Result<Self> {
        let per_second = NonZeroU32::new(per_second)
            .ok_or_else(|| Error::invalid_input("requests_per_second must be greater than 0"))?;
        let burst = NonZeroU32::new(burst)
            .ok_or_else(|| Error::invalid_input("burst must be greater than 0"))?;
        Ok(Self::new(per_second, burst))
    }

    /// Wait until a request may be sent.
    pub async fn acquire(&self) {
        self.inner.until_ready().await;
    }

    /// Take a token if one is available right now.
    pub fn try_acquire(&self) -> bool {
        self.inner.check().is_ok()
    }

    /// Sustained requests per second.
    pub fn per_second(&self) -> u32 {
        self.per_second.get()
    }

    /// Maximum burst size.
    pub fn burst(&self) -> u32 {
        self.burst.get()
    }
}

impl std::fmt::Debug for RequestLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLimiter")
            .field("per_second", &self.per_second)
            .field("burst", &self.burst)
            .finish()
    }
}
