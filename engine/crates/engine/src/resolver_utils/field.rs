use async_recursion::async_recursion;
use tracing::{info_span, Instrument};

use super::{container::resolve_container, list::resolve_list};
use crate::{
    context::ContextField,
    directives::NextResolver,
    error::{Error, ErrorCode, ExecutionResult, PropagateNull, ServerError},
    registry::{
        resolvers::{ResolvedValue, ResolverContext},
        MetaType, WrappingType,
    },
};

/// Resolve a single field: run its middleware chain and terminal resolver
/// under the parallelism budget, then complete the returned value against
/// the field's declared type.
#[async_recursion]
pub(super) async fn resolve_field(
    ctx: &ContextField<'_>,
    parent_value: &ResolvedValue,
) -> ExecutionResult<serde_json::Value> {
    let env = ctx.query_env;

    // Cancellation gates every new unit of work; whatever is already in
    // flight is left to finish.
    if env.cancellation.is_cancelled() {
        env.report_cancellation();
        return propagate_by_nullability(ctx);
    }

    let resolver_ctx = ResolverContext::new(ctx, parent_value);
    let chain = NextResolver::new(&ctx.field.visitors, &ctx.field.resolver);
    let span = info_span!("resolve_field", field = %ctx.field.name, path = %ctx.path);
    let result = async {
        let _permit = env.acquire_permit().await;
        chain.run(&resolver_ctx, ctx.item.arguments()).await
    }
    .instrument(span)
    .await;

    match result {
        Ok(value) => {
            let wrappers: Vec<WrappingType> = ctx.field.ty.wrapping_types().collect();
            complete_value(ctx, &wrappers, ResolvedValue::new(value)).await
        }
        Err(error) => {
            ctx.add_error(field_error(ctx, error));
            propagate_by_nullability(ctx)
        }
    }
}

/// Check the value produced for one wrapping level of the field's type and
/// recurse into lists and selection sets.
///
/// A failure below a nullable level is absorbed there; below a non-null
/// level it keeps bubbling towards the nearest nullable ancestor.
pub(super) async fn complete_value(
    ctx: &ContextField<'_>,
    wrappers: &[WrappingType],
    value: ResolvedValue,
) -> ExecutionResult<serde_json::Value> {
    let (non_null, wrappers) = match wrappers.split_first() {
        Some((WrappingType::NonNull, rest)) => (true, rest),
        _ => (false, wrappers),
    };

    if value.data_resolved().is_null() {
        if non_null {
            ctx.add_error(non_null_violation(ctx));
            return Err(PropagateNull);
        }
        return Ok(serde_json::Value::Null);
    }

    let result = if let Some((WrappingType::List, rest)) = wrappers.split_first() {
        resolve_list(ctx, rest, value).await
    } else {
        resolve_named_type(ctx, value).await
    };

    match result {
        Err(PropagateNull) if !non_null => Ok(serde_json::Value::Null),
        other => other,
    }
}

async fn resolve_named_type(
    ctx: &ContextField<'_>,
    value: ResolvedValue,
) -> ExecutionResult<serde_json::Value> {
    let Some(field_type) = ctx.schema_env.registry.lookup(&ctx.field.ty) else {
        ctx.add_error(
            ServerError::new(
                format!("Unknown type `{}`", ctx.field.ty.named_type()),
                Some(ctx.item.pos()),
            )
            .with_path(ctx.path.clone())
            .with_code(ErrorCode::BadRequest),
        );
        return Err(PropagateNull);
    };

    match field_type {
        MetaType::Scalar(_) => Ok(value.data_resolved().clone()),
        MetaType::Object(_) => {
            let child_ctx = ctx.with_selection_set(field_type);
            resolve_container(&child_ctx, &value).await
        }
    }
}

/// Null the field out if its declared type allows it, otherwise pass the
/// failure up to the nearest nullable ancestor.
fn propagate_by_nullability(ctx: &ContextField<'_>) -> ExecutionResult<serde_json::Value> {
    if ctx.field.ty.is_non_null() {
        Err(PropagateNull)
    } else {
        Ok(serde_json::Value::Null)
    }
}

/// Anchor a resolver error at this field. Recorded exactly once, however far
/// the null propagation reaches afterwards.
fn field_error(ctx: &ContextField<'_>, error: Error) -> ServerError {
    let server_error = error.into_server_error(Some(ctx.item.pos()), ctx.path.clone());
    if server_error.has_code() {
        server_error
    } else {
        server_error.with_code(ErrorCode::FieldError)
    }
}

fn non_null_violation(ctx: &ContextField<'_>) -> ServerError {
    ServerError::new(
        format!(
            "An error occurred while fetching `{}`, a non-nullable value was expected but no value was found.",
            ctx.field.name
        ),
        Some(ctx.item.pos()),
    )
    .with_path(ctx.path.clone())
    .with_code(ErrorCode::NonNullViolation)
}
