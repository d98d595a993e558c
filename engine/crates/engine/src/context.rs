use std::{
    any::{Any, TypeId},
    fmt::{self, Debug, Formatter},
    ops::Deref,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, OnceLock,
    },
};

use tokio::{
    sync::{Semaphore, SemaphorePermit},
    time::Instant,
};

use crate::{
    error::{ErrorCode, ServerError},
    query_path::QueryPath,
    registry::{MetaField, MetaType},
    request::{OperationType, Variables},
    schema::SchemaEnv,
    selection::SelectedField,
};

/// Context values resolvers can borrow, keyed by type.
///
/// A bag lives on the schema (shared by every operation) and another on each
/// request (valid for that operation only).
#[derive(Default)]
pub struct Data(fnv::FnvHashMap<TypeId, Box<dyn Any + Send + Sync>>);

impl Data {
    pub fn insert<D: Any + Send + Sync>(&mut self, data: D) {
        self.0.insert(TypeId::of::<D>(), Box::new(data));
    }

    pub fn get<D: Any + Send + Sync>(&self) -> Option<&D> {
        self.0.get(&TypeId::of::<D>()).and_then(|boxed| boxed.downcast_ref())
    }
}

impl Debug for Data {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data").finish()
    }
}

/// Cooperative cancellation signal scoped to one operation.
///
/// The scheduler checks it before starting each new unit of work; resolver
/// invocations already in flight are never aborted.
#[derive(Clone, Default)]
pub struct Cancellation(Arc<CancellationInner>);

#[derive(Default)]
struct CancellationInner {
    cancelled: AtomicBool,
    deadline: OnceLock<Instant>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop dispatching new field resolutions.
    pub fn cancel(&self) {
        self.0.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.cancelled.load(Ordering::Relaxed)
            || self
                .0
                .deadline
                .get()
                .is_some_and(|deadline| Instant::now() >= *deadline)
    }

    pub(crate) fn set_deadline(&self, deadline: Instant) {
        let _ = self.0.deadline.set(deadline);
    }
}

/// State owned by one in-flight operation.
pub struct QueryEnvInner {
    pub operation_name: Option<String>,
    pub operation_type: OperationType,
    pub variables: Variables,
    pub ctx_data: Data,
    pub cancellation: Cancellation,
    pub(crate) errors: Mutex<Vec<ServerError>>,
    pub(crate) parallelism: Option<Arc<Semaphore>>,
    cancellation_reported: AtomicBool,
}

/// Cheaply cloneable handle on the per-operation state.
#[derive(Clone)]
pub struct QueryEnv(Arc<QueryEnvInner>);

impl Deref for QueryEnv {
    type Target = QueryEnvInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl QueryEnv {
    pub(crate) fn new(
        operation_name: Option<String>,
        operation_type: OperationType,
        variables: Variables,
        ctx_data: Data,
        cancellation: Cancellation,
        max_parallelism: usize,
    ) -> Self {
        Self(Arc::new(QueryEnvInner {
            operation_name,
            operation_type,
            variables,
            ctx_data,
            cancellation,
            errors: Mutex::new(Vec::new()),
            parallelism: (max_parallelism > 0).then(|| Arc::new(Semaphore::new(max_parallelism))),
            cancellation_reported: AtomicBool::new(false),
        }))
    }

    pub(crate) fn add_error(&self, error: ServerError) {
        self.errors.lock().unwrap().push(error);
    }

    /// Record the cancellation exactly once, whichever unit of work observes
    /// it first.
    pub(crate) fn report_cancellation(&self) {
        if !self.0.cancellation_reported.swap(true, Ordering::SeqCst) {
            self.add_error(
                ServerError::new("Operation was cancelled before it could complete", None)
                    .with_code(ErrorCode::OperationCancelled),
            );
        }
    }

    pub(crate) fn was_cancelled(&self) -> bool {
        self.0.cancellation_reported.load(Ordering::SeqCst)
    }

    /// A permit from the operation's parallelism budget, held for the
    /// duration of a single resolver invocation. `None` when the budget is
    /// unbounded.
    pub(crate) async fn acquire_permit(&self) -> Option<SemaphorePermit<'_>> {
        match &self.parallelism {
            Some(semaphore) => semaphore.acquire().await.ok(),
            None => None,
        }
    }

    pub(crate) fn take_errors(&self) -> Vec<ServerError> {
        std::mem::take(&mut *self.errors.lock().unwrap())
    }
}

/// Context for resolving one selection set against a container type.
#[derive(Clone)]
pub struct ContextSelectionSet<'a> {
    /// The current path being resolved.
    pub path: QueryPath,
    /// The container type the selection applies to.
    pub ty: &'a MetaType,
    /// The fields selected on it, in source order.
    pub item: &'a [SelectedField],
    /// Context scoped to the current schema.
    pub schema_env: &'a SchemaEnv,
    /// Context scoped to the current operation.
    pub query_env: &'a QueryEnv,
}

impl<'a> ContextSelectionSet<'a> {
    pub(crate) fn with_field(&self, item: &'a SelectedField, field: &'a MetaField) -> ContextField<'a> {
        ContextField {
            path: self.path.child(item.response_key()),
            parent_type: self.ty,
            field,
            item,
            schema_env: self.schema_env,
            query_env: self.query_env,
        }
    }

    pub(crate) fn add_error(&self, error: ServerError) {
        self.query_env.add_error(error);
    }
}

/// Context for resolving one field.
#[derive(Clone)]
pub struct ContextField<'a> {
    /// Response path of this field.
    pub path: QueryPath,
    /// The type the field lives on.
    pub parent_type: &'a MetaType,
    /// Schema metadata of the field, resolver binding included.
    pub field: &'a MetaField,
    /// The selection node being resolved.
    pub item: &'a SelectedField,
    pub schema_env: &'a SchemaEnv,
    pub query_env: &'a QueryEnv,
}

impl<'a> ContextField<'a> {
    /// Context for one element of a list valued field.
    pub(crate) fn with_index(&self, index: usize) -> ContextField<'a> {
        ContextField {
            path: self.path.child(index),
            ..self.clone()
        }
    }

    /// Context for the selection set beneath this field, once its concrete
    /// object type is known.
    pub(crate) fn with_selection_set(&self, ty: &'a MetaType) -> ContextSelectionSet<'a> {
        ContextSelectionSet {
            path: self.path.clone(),
            ty,
            item: self.item.sub_selections(),
            schema_env: self.schema_env,
            query_env: self.query_env,
        }
    }

    pub(crate) fn add_error(&self, error: ServerError) {
        self.query_env.add_error(error);
    }

    /// Borrow a value injected into the operation, falling back to schema
    /// level data.
    pub fn data<D: Any + Send + Sync>(&self) -> Option<&D> {
        self.query_env
            .ctx_data
            .get::<D>()
            .or_else(|| self.schema_env.data.get::<D>())
    }
}
