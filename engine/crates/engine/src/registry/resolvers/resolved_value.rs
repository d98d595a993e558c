use std::sync::Arc;

use crate::query_path::QueryPathSegment;

static NULL: serde_json::Value = serde_json::Value::Null;

/// Value handed from a parent resolver to its children.
///
/// Cheap to clone and to take sub-copies of: the JSON blob is shared behind
/// an `Arc` and a sub-copy only remembers its path inside it.
#[derive(Debug, Clone)]
pub struct ResolvedValue {
    /// The root of the JSON blob that contains this value.
    data_root: Arc<serde_json::Value>,
    /// The path to this value inside `data_root`.
    data_path: Vec<QueryPathSegment>,
}

impl ResolvedValue {
    pub fn new(value: serde_json::Value) -> Self {
        Self {
            data_root: Arc::new(value),
            data_path: Vec::new(),
        }
    }

    pub fn null() -> Self {
        Self::new(serde_json::Value::Null)
    }

    /// The JSON value this points at. Missing paths read as null.
    pub fn data_resolved(&self) -> &serde_json::Value {
        let mut value = self.data_root.as_ref();
        for segment in &self.data_path {
            value = match segment {
                QueryPathSegment::Field(name) => value.get(name).unwrap_or(&NULL),
                QueryPathSegment::Index(index) => value.get(index).unwrap_or(&NULL),
            };
        }
        value
    }

    /// A field of this value, when it is an object and has one.
    pub fn get_field(&self, name: &str) -> Option<&serde_json::Value> {
        self.data_resolved().as_object().and_then(|object| object.get(name))
    }

    /// Sub-copy pointing at one element of a list value.
    #[must_use]
    pub fn child_at_index(&self, index: usize) -> Self {
        let mut data_path = self.data_path.clone();
        data_path.push(QueryPathSegment::Index(index));
        Self {
            data_root: self.data_root.clone(),
            data_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn sub_copies_share_the_root_blob() {
        let value = ResolvedValue::new(json!([{"id": 1}, {"id": 2}]));

        let second = value.child_at_index(1);
        assert_eq!(second.data_resolved(), &json!({"id": 2}));
        assert_eq!(second.get_field("id"), Some(&json!(2)));
    }

    #[test]
    fn missing_paths_read_as_null() {
        let value = ResolvedValue::new(json!({"a": 1}));

        assert_eq!(value.child_at_index(4).data_resolved(), &serde_json::Value::Null);
        assert_eq!(value.get_field("b"), None);
    }
}
