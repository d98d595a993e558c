//! Resolver dispatch.
//!
//! Every field binds one [`Resolver`] at schema construction time. The
//! binding is a closed variant, so dispatch never inspects the runtime type
//! of anything: a field either reads out of its parent's data, calls a plain
//! function value, or calls a method on a shared receiver object.

mod resolved_value;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;

pub use self::resolved_value::ResolvedValue;

use crate::{
    context::ContextField,
    error::Error,
    query_path::QueryPath,
    registry::{MetaField, MetaType},
    request::Variables,
    selection::SelectedField,
};

/// Boxed function resolver: `(ctx, args) -> value`.
pub type BoxResolverFn = Arc<
    dyn for<'a> Fn(&'a ResolverContext<'a>, &'a Variables) -> BoxFuture<'a, Result<serde_json::Value, Error>>
        + Send
        + Sync,
>;

/// Receiver object exposing resolver logic as named methods.
///
/// The method-shaped counterpart of a function resolver: one receiver serves
/// any number of fields, dispatching on the schema field name.
#[async_trait::async_trait]
pub trait MethodResolver: Send + Sync {
    async fn call(
        &self,
        field: &str,
        ctx: &ResolverContext<'_>,
        args: &Variables,
    ) -> Result<serde_json::Value, Error>;
}

/// How a field obtains its value.
#[derive(Clone, Default)]
pub enum Resolver {
    /// Read the field out of the parent resolver's data, under the schema
    /// field name.
    #[default]
    Parent,
    /// A plain function value.
    Function(BoxResolverFn),
    /// A method on a receiver object, dispatched by field name. Only
    /// permitted when the execution configuration allows method resolution.
    Method(Arc<dyn MethodResolver>),
}

impl Resolver {
    pub fn function<F>(function: F) -> Self
    where
        F: for<'a> Fn(&'a ResolverContext<'a>, &'a Variables) -> BoxFuture<'a, Result<serde_json::Value, Error>>
            + Send
            + Sync
            + 'static,
    {
        Resolver::Function(Arc::new(function))
    }

    pub fn method(receiver: Arc<dyn MethodResolver>) -> Self {
        Resolver::Method(receiver)
    }

    pub(crate) async fn resolve(
        &self,
        ctx: &ResolverContext<'_>,
        args: &Variables,
    ) -> Result<serde_json::Value, Error> {
        match self {
            Resolver::Parent => Ok(ctx
                .parent_value
                .get_field(&ctx.field.name)
                .cloned()
                .unwrap_or(serde_json::Value::Null)),
            Resolver::Function(function) => function(ctx, args).await,
            Resolver::Method(receiver) => {
                if !ctx.use_resolver_methods() {
                    return Err(Error::new(format!(
                        "Method resolvers are disabled, but field `{}` is bound to one",
                        ctx.field.name
                    )));
                }
                receiver.call(&ctx.field.name, ctx, args).await
            }
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolver::Parent => f.write_str("Parent"),
            Resolver::Function(_) => f.write_str("Function"),
            Resolver::Method(_) => f.write_str("Method"),
        }
    }
}

/// Snapshot of execution state handed to one resolver invocation.
pub struct ResolverContext<'a> {
    /// Schema metadata of the field being resolved.
    pub field: &'a MetaField,
    /// The type the field lives on.
    pub parent_type: &'a MetaType,
    /// Response path of the field.
    pub path: &'a QueryPath,
    /// The selection node, sub-selection included.
    pub item: &'a SelectedField,
    /// Output of the parent resolver.
    pub parent_value: &'a ResolvedValue,
    ctx: &'a ContextField<'a>,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new(ctx: &'a ContextField<'a>, parent_value: &'a ResolvedValue) -> Self {
        Self {
            field: ctx.field,
            parent_type: ctx.parent_type,
            path: &ctx.path,
            item: ctx.item,
            parent_value,
            ctx,
        }
    }

    /// The sub-selection requested beneath this field, so resolvers can
    /// compute only what was asked for.
    pub fn selections(&self) -> &'a [SelectedField] {
        self.item.sub_selections()
    }

    pub fn operation_name(&self) -> Option<&str> {
        self.ctx.query_env.operation_name.as_deref()
    }

    /// Borrow a value injected into the operation, falling back to schema
    /// level data.
    pub fn data<D: Any + Send + Sync>(&self) -> Option<&D> {
        self.ctx.data()
    }

    fn use_resolver_methods(&self) -> bool {
        self.ctx.schema_env.config.use_resolver_methods
    }
}
