use std::time::Duration;

/// Feature switches and budgets read once at schema construction and shared,
/// immutably, with every operation executed against the schema.
#[derive(Debug, Clone, Default)]
pub struct ExecutionConfig {
    /// Permit fields to bind method shaped resolvers.
    pub use_resolver_methods: bool,
    /// Upper bound on concurrently resolving fields within one operation.
    /// `0` means unbounded.
    pub max_parallelism: usize,
    /// Wall clock budget for a whole operation.
    pub timeout: Option<Duration>,
}

impl ExecutionConfig {
    #[must_use]
    pub fn use_resolver_methods(mut self, enabled: bool) -> Self {
        self.use_resolver_methods = enabled;
        self
    }

    #[must_use]
    pub fn max_parallelism(mut self, limit: usize) -> Self {
        self.max_parallelism = limit;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
