use async_recursion::async_recursion;
use futures_util::future::join_all;

use super::field::complete_value;
use crate::{
    context::ContextField,
    error::{ErrorCode, ExecutionResult, PropagateNull, ServerError},
    registry::{resolvers::ResolvedValue, WrappingType},
};

/// Resolve a list valued level of a field by completing each element
/// concurrently. Element order is preserved whatever order they finish in.
#[async_recursion]
pub(super) async fn resolve_list(
    ctx: &ContextField<'_>,
    wrappers: &[WrappingType],
    value: ResolvedValue,
) -> ExecutionResult<serde_json::Value> {
    let Some(items) = value.data_resolved().as_array() else {
        ctx.add_error(
            ServerError::new(
                format!(
                    "Encountered a {} where we expected a list",
                    json_kind_str(value.data_resolved())
                ),
                Some(ctx.item.pos()),
            )
            .with_path(ctx.path.clone())
            .with_code(ErrorCode::FieldError),
        );
        return Err(PropagateNull);
    };

    let futures = (0..items.len()).map(|index| {
        let element_ctx = ctx.with_index(index);
        let element = value.child_at_index(index);
        async move { complete_value(&element_ctx, wrappers, element).await }
    });

    let mut elements = Vec::with_capacity(items.len());
    let mut propagate = false;
    for result in join_all(futures).await {
        match result {
            Ok(element) => elements.push(element),
            // A non-null element failed; the list itself has to go.
            Err(PropagateNull) => propagate = true,
        }
    }

    if propagate {
        Err(PropagateNull)
    } else {
        Ok(serde_json::Value::Array(elements))
    }
}

fn json_kind_str(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "list",
        serde_json::Value::Object(_) => "object",
    }
}
