use std::{collections::HashMap, num::NonZeroU32, time::Duration};

use futures_util::{future::BoxFuture, FutureExt};
use governor::Quota;
use runtime::rate_limiting::{Error, RateLimiter, RateLimiterContext, RateLimiterInner};

/// Bucket consulted when no bucket matches the operation's own key.
pub const GLOBAL_RATE_LIMITER: &str = "global";

/// Admission budget for one bucket: `limit` operations per `duration`.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub limit: usize,
    pub duration: Duration,
}

/// Keyed in-memory rate limiter.
///
/// Operations are bucketed by their limiter key (the operation name unless
/// the caller provides something more specific), falling back to the
/// [`GLOBAL_RATE_LIMITER`] bucket. An operation matching no bucket at all is
/// admitted.
#[derive(Default)]
pub struct InMemoryRateLimiter {
    inner: HashMap<String, governor::DefaultKeyedRateLimiter<usize>>,
}

impl InMemoryRateLimiter {
    pub fn runtime(global_config: Option<RateLimitConfig>) -> RateLimiter {
        let mut limiter = Self::default();

        if let Some(config) = global_config {
            limiter = limiter.with_rate_limiter(GLOBAL_RATE_LIMITER, config);
        }

        RateLimiter::new(limiter)
    }

    pub fn with_rate_limiter(mut self, key: &str, config: RateLimitConfig) -> Self {
        let quota = (config.limit as u64)
            .checked_div(config.duration.as_secs())
            .expect("rate limit duration cannot be 0");

        self.inner.insert(
            key.to_string(),
            governor::RateLimiter::keyed(Quota::per_second(
                NonZeroU32::new(quota as u32).expect("rate limiter with invalid per second quota"),
            )),
        );
        self
    }

    fn bucket(&self, context: &dyn RateLimiterContext) -> Option<&governor::DefaultKeyedRateLimiter<usize>> {
        context
            .key()
            .or_else(|| context.operation_name())
            .and_then(|key| self.inner.get(key))
            .or_else(|| self.inner.get(GLOBAL_RATE_LIMITER))
    }
}

impl RateLimiterInner for InMemoryRateLimiter {
    fn limit<'a>(&'a self, context: &'a dyn RateLimiterContext) -> BoxFuture<'a, Result<(), Error>> {
        async {
            if let Some(rate_limiter) = self.bucket(context) {
                rate_limiter
                    .check_key(&usize::MIN)
                    .map_err(|_err| Error::ExceededCapacity)?;
            }

            Ok(())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestContext {
        operation_name: Option<&'static str>,
        variables: serde_json::Map<String, serde_json::Value>,
    }

    impl TestContext {
        fn named(operation_name: &'static str) -> Self {
            Self {
                operation_name: Some(operation_name),
                variables: Default::default(),
            }
        }
    }

    impl RateLimiterContext for TestContext {
        fn query(&self) -> &str {
            "query { me { id } }"
        }

        fn operation_name(&self) -> Option<&str> {
            self.operation_name
        }

        fn variables(&self) -> &serde_json::Map<String, serde_json::Value> {
            &self.variables
        }

        fn variable_types(&self) -> Option<&serde_json::Value> {
            None
        }
    }

    #[tokio::test]
    async fn rejects_once_bucket_capacity_is_exhausted() {
        let limiter = InMemoryRateLimiter::default().with_rate_limiter(
            "getUser",
            RateLimitConfig {
                limit: 2,
                duration: Duration::from_secs(1),
            },
        );
        let context = TestContext::named("getUser");

        assert!(limiter.limit(&context).await.is_ok());
        assert!(limiter.limit(&context).await.is_ok());
        assert!(matches!(
            limiter.limit(&context).await,
            Err(Error::ExceededCapacity)
        ));
    }

    #[tokio::test]
    async fn falls_back_to_the_global_bucket() {
        let limiter = InMemoryRateLimiter::default().with_rate_limiter(
            GLOBAL_RATE_LIMITER,
            RateLimitConfig {
                limit: 1,
                duration: Duration::from_secs(1),
            },
        );
        let context = TestContext::named("unknownOperation");

        assert!(limiter.limit(&context).await.is_ok());
        assert!(matches!(
            limiter.limit(&context).await,
            Err(Error::ExceededCapacity)
        ));
    }

    #[tokio::test]
    async fn admits_when_no_bucket_is_configured() {
        let limiter = InMemoryRateLimiter::default();
        let context = TestContext::named("anything");

        for _ in 0..16 {
            assert!(limiter.limit(&context).await.is_ok());
        }
    }
}
