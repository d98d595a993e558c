use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::query_path::QueryPath;

/// Position of an element in the original query source.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    /// One-based line number.
    pub line: usize,
    /// One-based column number.
    pub column: usize,
}

impl Pos {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Machine readable error codes, reported under the `code` error extension.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum_macros::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    BadRequest,
    FieldError,
    NonNullViolation,
    OperationCancelled,
    RateLimited,
}

/// Error produced by a resolver invocation.
///
/// Carries no position or path of its own. Both are attached when the
/// failing field converts it into a [`ServerError`] for the response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Error {
    pub message: String,
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl Error {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: Default::default(),
        }
    }

    /// Construct from anything that can describe itself.
    pub fn new_with_source(source: impl fmt::Display) -> Self {
        Self::new(source.to_string())
    }

    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    pub fn into_server_error(self, pos: Option<Pos>, path: QueryPath) -> ServerError {
        ServerError {
            message: self.message,
            locations: pos.into_iter().collect(),
            path,
            extensions: self.extensions,
        }
    }
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// An entry of the response `errors` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerError {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Pos>,
    #[serde(skip_serializing_if = "QueryPath::is_empty")]
    pub path: QueryPath,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl ServerError {
    pub fn new(message: impl Into<String>, pos: Option<Pos>) -> Self {
        Self {
            message: message.into(),
            locations: pos.into_iter().collect(),
            path: QueryPath::empty(),
            extensions: Default::default(),
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: QueryPath) -> Self {
        self.path = path;
        self
    }

    #[must_use]
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.extensions
            .insert("code".to_string(), code.to_string().into());
        self
    }

    pub(crate) fn has_code(&self) -> bool {
        self.extensions.contains_key("code")
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

/// A failure already recorded in the error sink that still has to null out
/// ancestors up to the nearest nullable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PropagateNull;

pub(crate) type ExecutionResult<T> = Result<T, PropagateNull>;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::query_path::QueryPath;

    #[test]
    fn error_codes_use_screaming_snake_case() {
        assert_eq!(ErrorCode::NonNullViolation.to_string(), "NON_NULL_VIOLATION");
        assert_eq!(ErrorCode::RateLimited.as_ref(), "RATE_LIMITED");
    }

    #[test]
    fn server_error_serializes_to_the_graphql_error_format() {
        let error = ServerError::new("boom", Some(Pos::new(2, 7)))
            .with_path(QueryPath::empty().child("user").child(0_usize).child("name"))
            .with_code(ErrorCode::FieldError);

        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({
                "message": "boom",
                "locations": [{"line": 2, "column": 7}],
                "path": ["user", 0, "name"],
                "extensions": {"code": "FIELD_ERROR"},
            })
        );
    }

    #[test]
    fn empty_parts_are_left_out_of_the_serialized_error() {
        let error = ServerError::new("boom", None);

        assert_eq!(serde_json::to_value(&error).unwrap(), json!({"message": "boom"}));
    }

    #[test]
    fn resolver_errors_keep_their_extensions() {
        let error = Error::new("denied")
            .with_extension("reason", "maintenance")
            .into_server_error(None, QueryPath::empty().child("user"));

        assert_eq!(error.extensions["reason"], json!("maintenance"));
        assert_eq!(error.path.to_string(), "user");
    }
}
