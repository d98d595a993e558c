use std::{
    any::Any,
    fmt::{self, Debug, Formatter},
};

use serde::{Deserialize, Serialize};

use crate::{
    context::{Cancellation, Data},
    selection::SelectedField,
};

/// Variable values bound to the current operation, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variables(serde_json::Map<String, serde_json::Value>);

impl Variables {
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.0
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Variables {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, serde_json::Value)> for Variables {
    fn from_iter<I: IntoIterator<Item = (String, serde_json::Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The kind of operation being executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    #[default]
    Query,
    Mutation,
    Subscription,
}

/// An already parsed and validated operation, ready to execute.
///
/// Parsing, validation and fragment flattening happen upstream; the executor
/// receives the flattened selection tree together with everything the
/// admission gate may inspect: the raw query text, the operation name, the
/// bound variables and their resolved type metadata.
pub struct Request {
    /// Raw source text, only ever looked at by the rate limiter.
    pub query: String,

    pub operation_name: Option<String>,

    pub operation_type: OperationType,

    /// The root selection of the operation.
    pub selection_set: Vec<SelectedField>,

    pub variables: Variables,

    /// Introspection metadata for the variables, passed through opaquely to
    /// the rate limiter.
    pub variable_types: Option<serde_json::Value>,

    /// Values resolvers can borrow through the execution context.
    ///
    /// **Only valid for this operation.**
    pub data: Data,

    /// Signal the caller may fire to stop dispatching new field resolutions.
    pub cancellation: Cancellation,
}

impl Request {
    pub fn new(selection_set: impl IntoIterator<Item = SelectedField>) -> Self {
        Self {
            query: String::new(),
            operation_name: None,
            operation_type: OperationType::default(),
            selection_set: selection_set.into_iter().collect(),
            variables: Variables::default(),
            variable_types: None,
            data: Data::default(),
            cancellation: Cancellation::default(),
        }
    }

    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    #[must_use]
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn operation_type(mut self, ty: OperationType) -> Self {
        self.operation_type = ty;
        self
    }

    #[must_use]
    pub fn variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    #[must_use]
    pub fn variable_types(mut self, variable_types: serde_json::Value) -> Self {
        self.variable_types = Some(variable_types);
        self
    }

    /// Insert a value resolvers can borrow through the execution context.
    #[must_use]
    pub fn data<D: Any + Send + Sync>(mut self, data: D) -> Self {
        self.data.insert(data);
        self
    }

    #[must_use]
    pub fn cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }
}

impl Debug for Request {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("query", &self.query)
            .field("operation_name", &self.operation_name)
            .field("operation_type", &self.operation_type)
            .field("selection_set", &self.selection_set)
            .field("variables", &self.variables)
            .finish()
    }
}
