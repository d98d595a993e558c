//! Runtime core of a typed, schema driven query execution engine.
//!
//! The engine receives operations that were parsed and validated upstream
//! and takes them from admission to a `{data, errors}` response:
//!
//! - a [`runtime::rate_limiting::RateLimiter`] is consulted exactly once per
//!   operation, before any field resolution starts;
//! - the scheduler walks the [`SelectedField`] tree, resolving sibling
//!   fields and list elements concurrently under the schema's parallelism
//!   budget;
//! - each field runs its directive middleware chain
//!   ([`ResolverVisitor`]s composed around the terminal [`Resolver`]);
//! - failures are recorded once and converted into GraphQL null
//!   propagation, and the merged response always follows selection order.
//!
//! Parsing, validation and transport are external collaborators; nothing in
//! here survives the operation that owns it.

pub mod config;
mod context;
pub mod directives;
mod error;
mod query_path;
pub mod registry;
mod request;
mod resolver_utils;
mod response;
mod schema;
mod selection;

pub use config::ExecutionConfig;
pub use context::{Cancellation, ContextField, ContextSelectionSet, Data, QueryEnv, QueryEnvInner};
pub use directives::{NextResolver, ResolverVisitor};
pub use error::{Error, ErrorCode, Pos, ServerError, ServerResult};
pub use query_path::{QueryPath, QueryPathSegment};
pub use registry::resolvers::{BoxResolverFn, MethodResolver, ResolvedValue, Resolver, ResolverContext};
pub use request::{OperationType, Request, Variables};
pub use response::{ExecutionStatus, Response};
pub use schema::{Schema, SchemaBuilder, SchemaEnv, SchemaEnvInner};
pub use selection::SelectedField;
