use futures_util::future::join_all;

use super::field::resolve_field;
use crate::{
    context::ContextSelectionSet,
    error::{ErrorCode, ExecutionResult, PropagateNull, ServerError},
    registry::resolvers::ResolvedValue,
};

/// Resolve a selection set by executing each of its fields concurrently.
pub(crate) async fn resolve_root_container(
    ctx: &ContextSelectionSet<'_>,
    parent_value: &ResolvedValue,
) -> ExecutionResult<serde_json::Value> {
    resolve_container_inner(ctx, parent_value, true).await
}

/// Resolve a selection set by executing each of its fields serially, in
/// selection order. Mutation roots require this.
pub(crate) async fn resolve_root_container_serial(
    ctx: &ContextSelectionSet<'_>,
    parent_value: &ResolvedValue,
) -> ExecutionResult<serde_json::Value> {
    resolve_container_inner(ctx, parent_value, false).await
}

/// Resolve a nested selection set; siblings always run concurrently.
pub(super) async fn resolve_container(
    ctx: &ContextSelectionSet<'_>,
    parent_value: &ResolvedValue,
) -> ExecutionResult<serde_json::Value> {
    resolve_container_inner(ctx, parent_value, true).await
}

async fn resolve_container_inner(
    ctx: &ContextSelectionSet<'_>,
    parent_value: &ResolvedValue,
    parallel: bool,
) -> ExecutionResult<serde_json::Value> {
    tracing::trace!(container = ctx.ty.name(), "resolving selection set");

    let mut response_keys = Vec::with_capacity(ctx.item.len());
    let mut futures = Vec::with_capacity(ctx.item.len());
    for selected in ctx.item {
        response_keys.push(selected.response_key().to_string());
        futures.push(async move {
            let Some(field) = ctx.ty.field(selected.field_name()) else {
                // A validated operation never selects unknown fields; report
                // it but keep the key so the response shape stays intact.
                ctx.add_error(
                    ServerError::new(
                        format!(
                            "Could not find a field named `{}` on `{}`",
                            selected.field_name(),
                            ctx.ty.name()
                        ),
                        Some(selected.pos()),
                    )
                    .with_path(ctx.path.child(selected.response_key()))
                    .with_code(ErrorCode::BadRequest),
                );
                return Ok(serde_json::Value::Null);
            };
            let field_ctx = ctx.with_field(selected, field);
            resolve_field(&field_ctx, parent_value).await
        });
    }

    let results = if parallel {
        join_all(futures).await
    } else {
        let mut results = Vec::with_capacity(futures.len());
        for future in futures {
            results.push(future.await);
        }
        results
    };

    // Merge in selection order, whatever order the siblings finished in.
    let mut object = serde_json::Map::with_capacity(results.len());
    let mut propagate = false;
    for (key, result) in response_keys.into_iter().zip(results) {
        match result {
            Ok(value) => {
                object.insert(key, value);
            }
            Err(PropagateNull) => propagate = true,
        }
    }

    if propagate {
        Err(PropagateNull)
    } else {
        Ok(serde_json::Value::Object(object))
    }
}
