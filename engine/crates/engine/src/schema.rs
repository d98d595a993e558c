use std::{any::Any, ops::Deref, sync::Arc};

use runtime::rate_limiting::{RateLimiter, RateLimiterContext};
use runtime_noop::rate_limiting::NoopRateLimiter;
use tokio::time::Instant;
use tracing::{debug, info_span, Instrument};

use crate::{
    config::ExecutionConfig,
    context::{ContextSelectionSet, Data, QueryEnv},
    error::{ErrorCode, PropagateNull, ServerError},
    query_path::QueryPath,
    registry::{resolvers::ResolvedValue, Registry},
    request::{OperationType, Request},
    resolver_utils::{resolve_root_container, resolve_root_container_serial},
    response::{ExecutionStatus, Response},
};

/// Schema-scoped execution environment, shared by every operation.
pub struct SchemaEnvInner {
    pub registry: Registry,
    pub config: ExecutionConfig,
    pub rate_limiter: RateLimiter,
    pub data: Data,
}

#[derive(Clone)]
pub struct SchemaEnv(Arc<SchemaEnvInner>);

impl Deref for SchemaEnv {
    type Target = SchemaEnvInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// An executable schema: type metadata, resolver bindings and the
/// collaborators consulted around every operation.
#[derive(Clone)]
pub struct Schema {
    env: SchemaEnv,
}

pub struct SchemaBuilder {
    registry: Registry,
    config: ExecutionConfig,
    rate_limiter: Option<RateLimiter>,
    data: Data,
}

impl SchemaBuilder {
    /// Insert a value every operation's resolvers can borrow.
    #[must_use]
    pub fn data<D: Any + Send + Sync>(mut self, data: D) -> Self {
        self.data.insert(data);
        self
    }

    #[must_use]
    pub fn with_execution_config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_rate_limiter(mut self, rate_limiter: RateLimiter) -> Self {
        self.rate_limiter = Some(rate_limiter);
        self
    }

    pub fn finish(self) -> Schema {
        Schema {
            env: SchemaEnv(Arc::new(SchemaEnvInner {
                registry: self.registry,
                config: self.config,
                rate_limiter: self.rate_limiter.unwrap_or_else(NoopRateLimiter::runtime),
                data: self.data,
            })),
        }
    }
}

impl Schema {
    pub fn build(registry: Registry) -> SchemaBuilder {
        SchemaBuilder {
            registry,
            config: ExecutionConfig::default(),
            rate_limiter: None,
            data: Data::default(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.env.registry
    }

    pub fn env(&self) -> &SchemaEnv {
        &self.env
    }

    /// Execute one operation: consult the admission gate exactly once, then
    /// walk the selection tree.
    pub async fn execute(&self, request: Request) -> Response {
        let span = info_span!(
            "execute",
            operation = request.operation_name.as_deref().unwrap_or_default()
        );
        async move {
            if let Err(error) = self.env.rate_limiter.limit(&AdmissionContext(&request)).await {
                debug!(%error, "operation rejected by the rate limiter");
                return Response::rejected(
                    ServerError::new(error.to_string(), None).with_code(ErrorCode::RateLimited),
                );
            }

            self.execute_once(request).await
        }
        .instrument(span)
        .await
    }

    async fn execute_once(&self, request: Request) -> Response {
        if request.operation_type == OperationType::Subscription {
            return Response::from_errors(vec![ServerError::new(
                "Subscriptions are not supported on this transport.",
                None,
            )
            .with_code(ErrorCode::BadRequest)]);
        }

        let Some(root_type) = self.env.registry.root_type(request.operation_type) else {
            return Response::from_errors(vec![ServerError::new(
                "The schema does not define a root type for this operation",
                None,
            )
            .with_code(ErrorCode::BadRequest)]);
        };

        let Request {
            operation_name,
            operation_type,
            selection_set,
            variables,
            data,
            cancellation,
            ..
        } = request;

        if let Some(timeout) = self.env.config.timeout {
            cancellation.set_deadline(Instant::now() + timeout);
        }

        let env = QueryEnv::new(
            operation_name,
            operation_type,
            variables,
            data,
            cancellation,
            self.env.config.max_parallelism,
        );

        // A signal observed before any field starts leaves `data` empty.
        if env.cancellation.is_cancelled() {
            env.report_cancellation();
            return Response::new(None, env.take_errors(), ExecutionStatus::Cancelled);
        }

        let ctx = ContextSelectionSet {
            path: QueryPath::empty(),
            ty: root_type,
            item: &selection_set,
            schema_env: &self.env,
            query_env: &env,
        };

        let root_value = ResolvedValue::null();
        let result = if operation_type == OperationType::Mutation {
            resolve_root_container_serial(&ctx, &root_value).await
        } else {
            resolve_root_container(&ctx, &root_value).await
        };

        let data = match result {
            Ok(value) => Some(value),
            // The root itself could not tolerate a null below it.
            Err(PropagateNull) => Some(serde_json::Value::Null),
        };
        let status = if env.was_cancelled() {
            ExecutionStatus::Cancelled
        } else {
            ExecutionStatus::Completed
        };

        Response::new(data, env.take_errors(), status)
    }
}

/// View of a request handed to the rate limiter.
struct AdmissionContext<'a>(&'a Request);

impl RateLimiterContext for AdmissionContext<'_> {
    fn query(&self) -> &str {
        &self.0.query
    }

    fn operation_name(&self) -> Option<&str> {
        self.0.operation_name.as_deref()
    }

    fn variables(&self) -> &serde_json::Map<String, serde_json::Value> {
        self.0.variables.as_map()
    }

    fn variable_types(&self) -> Option<&serde_json::Value> {
        self.0.variable_types.as_ref()
    }
}
