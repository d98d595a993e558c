use std::sync::Arc;

use futures_util::future::BoxFuture;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Too many requests")]
    ExceededCapacity,
    #[error("internal error: {0}")]
    Internal(String),
}

/// Everything a rate limiter may inspect about the operation being admitted.
///
/// The engine consults the limiter exactly once per operation, before any
/// field resolution starts. Variable type metadata comes from the
/// introspection layer and is passed through opaquely.
pub trait RateLimiterContext: Send + Sync {
    /// Raw source text of the operation.
    fn query(&self) -> &str;
    fn operation_name(&self) -> Option<&str>;
    /// Variable values bound to the operation.
    fn variables(&self) -> &serde_json::Map<String, serde_json::Value>;
    /// Type metadata for the operation variables, if the caller resolved any.
    fn variable_types(&self) -> Option<&serde_json::Value>;
    /// Bucket key for keyed limiters.
    fn key(&self) -> Option<&str> {
        None
    }
}

pub trait RateLimiterInner: Send + Sync {
    fn limit<'a>(&'a self, context: &'a dyn RateLimiterContext) -> BoxFuture<'a, Result<(), Error>>;
}

#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<dyn RateLimiterInner>,
}

impl RateLimiter {
    pub fn new(inner: impl RateLimiterInner + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    pub async fn limit(&self, context: &dyn RateLimiterContext) -> Result<(), Error> {
        self.inner.limit(context).await
    }
}
