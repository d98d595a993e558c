use futures_util::{future::BoxFuture, FutureExt};
use runtime::rate_limiting::{Error, RateLimiter, RateLimiterContext, RateLimiterInner};

/// Rate limiter admitting every operation.
pub struct NoopRateLimiter;

impl NoopRateLimiter {
    pub fn runtime() -> RateLimiter {
        RateLimiter::new(NoopRateLimiter)
    }
}

impl RateLimiterInner for NoopRateLimiter {
    fn limit<'a>(&'a self, _context: &'a dyn RateLimiterContext) -> BoxFuture<'a, Result<(), Error>> {
        async { Ok(()) }.boxed()
    }
}
