use crate::{error::Pos, request::Variables};

/// A field requested by the operation, together with the sub-selection
/// beneath it.
///
/// The tree is built once from the validated query before execution starts
/// and is read-only afterwards; resolvers borrow it to inspect what was
/// asked for below them. Fragment spreads and inline fragments are expected
/// to be flattened away upstream.
#[derive(Debug, Clone, Default)]
pub struct SelectedField {
    field: String,
    alias: Option<String>,
    arguments: Variables,
    pos: Pos,
    sub_selections: Vec<SelectedField>,
}

impl SelectedField {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_arguments(mut self, arguments: Variables) -> Self {
        self.arguments = arguments;
        self
    }

    #[must_use]
    pub fn with_pos(mut self, pos: Pos) -> Self {
        self.pos = pos;
        self
    }

    #[must_use]
    pub fn with_sub_selections(mut self, sub_selections: impl IntoIterator<Item = SelectedField>) -> Self {
        self.sub_selections = sub_selections.into_iter().collect();
        self
    }

    /// The field name as declared in the schema.
    pub fn field_name(&self) -> &str {
        &self.field
    }

    /// The key under which the value appears in the response: the alias when
    /// one was given, the schema field name otherwise.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.field)
    }

    /// Argument values bound to this field.
    pub fn arguments(&self) -> &Variables {
        &self.arguments
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Fields requested beneath this one, in source order.
    pub fn sub_selections(&self) -> &[SelectedField] {
        &self.sub_selections
    }

    pub fn is_leaf(&self) -> bool {
        self.sub_selections.is_empty()
    }
}
