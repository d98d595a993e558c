//! Schema type metadata and resolver bindings.
//!
//! The registry is built by the schema layer before any operation runs and
//! is consulted, never mutated, during execution. Nullability and list-ness
//! are encoded in the field's wrapping type string, the way the schema
//! declares them.

pub mod resolvers;
mod type_names;

use std::sync::Arc;

use indexmap::IndexMap;

pub use self::type_names::{MetaFieldType, NamedType, WrappingType, WrappingTypeIter};

use self::resolvers::Resolver;
use crate::{directives::ResolverVisitor, request::OperationType};

/// A scalar leaf type.
pub struct ScalarType {
    pub name: String,
}

impl ScalarType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An object type and its fields, in declaration order.
pub struct ObjectType {
    pub name: String,
    pub fields: IndexMap<String, MetaField>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, field: MetaField) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }
}

/// Output types known to the registry.
pub enum MetaType {
    Scalar(ScalarType),
    Object(ObjectType),
}

impl MetaType {
    pub fn name(&self) -> &str {
        match self {
            MetaType::Scalar(scalar) => &scalar.name,
            MetaType::Object(object) => &object.name,
        }
    }

    pub fn field(&self, name: &str) -> Option<&MetaField> {
        match self {
            MetaType::Scalar(_) => None,
            MetaType::Object(object) => object.fields.get(name),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, MetaType::Scalar(_))
    }
}

impl From<ScalarType> for MetaType {
    fn from(scalar: ScalarType) -> Self {
        MetaType::Scalar(scalar)
    }
}

impl From<ObjectType> for MetaType {
    fn from(object: ObjectType) -> Self {
        MetaType::Object(object)
    }
}

/// A field on an object type, bound to its resolver and runtime directives.
pub struct MetaField {
    pub name: String,
    pub ty: MetaFieldType,
    pub resolver: Resolver,
    /// Directive visitors wrapped around the resolver, outermost first.
    pub visitors: Vec<Arc<dyn ResolverVisitor>>,
    /// Deprecation reason. Metadata only, never a runtime gate.
    pub deprecation: Option<String>,
}

impl MetaField {
    pub fn new(name: impl Into<String>, ty: impl Into<MetaFieldType>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            resolver: Resolver::default(),
            visitors: Vec::new(),
            deprecation: None,
        }
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    #[must_use]
    pub fn with_visitor(mut self, visitor: Arc<dyn ResolverVisitor>) -> Self {
        self.visitors.push(visitor);
        self
    }

    #[must_use]
    pub fn with_deprecation(mut self, reason: impl Into<String>) -> Self {
        self.deprecation = Some(reason.into());
        self
    }
}

/// Every type the schema knows about, plus the root bindings.
pub struct Registry {
    pub types: IndexMap<String, MetaType>,
    pub query_type: String,
    pub mutation_type: Option<String>,
}

impl Registry {
    pub fn new(query_type: impl Into<String>) -> Self {
        Self {
            types: IndexMap::new(),
            query_type: query_type.into(),
            mutation_type: None,
        }
    }

    #[must_use]
    pub fn with_type(mut self, ty: impl Into<MetaType>) -> Self {
        let ty = ty.into();
        self.types.insert(ty.name().to_string(), ty);
        self
    }

    #[must_use]
    pub fn with_mutation_type(mut self, name: impl Into<String>) -> Self {
        self.mutation_type = Some(name.into());
        self
    }

    /// Look a field type up by its named type, wrappers ignored.
    pub fn lookup(&self, ty: &MetaFieldType) -> Option<&MetaType> {
        self.types.get(ty.named_type().as_str())
    }

    pub(crate) fn root_type(&self, operation_type: OperationType) -> Option<&MetaType> {
        match operation_type {
            OperationType::Query => self.types.get(&self.query_type),
            OperationType::Mutation => self
                .mutation_type
                .as_ref()
                .and_then(|name| self.types.get(name)),
            OperationType::Subscription => None,
        }
    }
}
