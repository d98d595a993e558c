//! Admission control: the rate limiter is consulted exactly once per
//! operation, before anything else happens.

mod common;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use futures_util::{future::BoxFuture, FutureExt};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::*;
use engine::{
    registry::{MetaField, ObjectType},
    Request, Schema, SelectedField, Variables,
};
use runtime::rate_limiting::{Error as RateError, RateLimiter, RateLimiterContext, RateLimiterInner};
use runtime_local::{rate_limiting::RateLimitConfig, InMemoryRateLimiter};

struct RejectAll;

impl RateLimiterInner for RejectAll {
    fn limit<'a>(&'a self, _context: &'a dyn RateLimiterContext) -> BoxFuture<'a, Result<(), RateError>> {
        async { Err(RateError::ExceededCapacity) }.boxed()
    }
}

#[derive(Debug, PartialEq)]
struct Seen {
    query: String,
    operation_name: Option<String>,
    variables: Value,
    variable_types: Option<Value>,
}

struct CaptureLimiter(Arc<Mutex<Option<Seen>>>);

impl RateLimiterInner for CaptureLimiter {
    fn limit<'a>(&'a self, context: &'a dyn RateLimiterContext) -> BoxFuture<'a, Result<(), RateError>> {
        *self.0.lock().unwrap() = Some(Seen {
            query: context.query().to_string(),
            operation_name: context.operation_name().map(str::to_string),
            variables: Value::Object(context.variables().clone()),
            variable_types: context.variable_types().cloned(),
        });
        async { Ok(()) }.boxed()
    }
}

#[tokio::test]
async fn a_rejected_operation_never_reaches_a_resolver() {
    let invocations = Arc::new(AtomicUsize::new(0));
    let registry = base_registry().with_type(
        ObjectType::new("Query")
            .field(MetaField::new("me", "String").with_resolver(counting_resolver(invocations.clone(), json!("x")))),
    );
    let schema = Schema::build(registry)
        .with_rate_limiter(RateLimiter::new(RejectAll))
        .finish();

    let response = schema.execute(Request::new([SelectedField::new("me")])).await;

    assert!(response.status.is_rejected());
    assert_eq!(invocations.load(Ordering::SeqCst), 0);
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({
            "data": null,
            "errors": [{
                "message": "Too many requests",
                "extensions": {"code": "RATE_LIMITED"},
            }],
        })
    );
}

#[tokio::test]
async fn an_admitting_limiter_leaves_execution_unaffected() {
    let registry = base_registry().with_type(
        ObjectType::new("Query").field(MetaField::new("me", "String").with_resolver(value_resolver(json!("ada")))),
    );
    let schema = Schema::build(registry)
        .with_rate_limiter(InMemoryRateLimiter::runtime(None))
        .finish();

    let response = schema.execute(Request::new([SelectedField::new("me")])).await;

    assert!(response.status.is_completed());
    assert!(response.is_ok());
    assert_eq!(response.data, Some(json!({"me": "ada"})));
}

#[tokio::test]
async fn operations_are_bucketed_by_name() {
    let registry = base_registry().with_type(
        ObjectType::new("Query").field(MetaField::new("me", "String").with_resolver(value_resolver(json!("ada")))),
    );
    let limiter = InMemoryRateLimiter::default().with_rate_limiter(
        "getUser",
        RateLimitConfig {
            limit: 1,
            duration: std::time::Duration::from_secs(1),
        },
    );
    let schema = Schema::build(registry)
        .with_rate_limiter(RateLimiter::new(limiter))
        .finish();

    let admitted = schema
        .execute(Request::new([SelectedField::new("me")]).operation_name("getUser"))
        .await;
    let rejected = schema
        .execute(Request::new([SelectedField::new("me")]).operation_name("getUser"))
        .await;

    assert!(admitted.status.is_completed());
    assert!(rejected.status.is_rejected());
    assert_eq!(rejected.data, None);
    assert_eq!(rejected.errors.len(), 1);
}

#[tokio::test]
async fn the_limiter_sees_the_operation_inputs() {
    let seen = Arc::new(Mutex::new(None));
    let registry = base_registry().with_type(
        ObjectType::new("Query").field(MetaField::new("me", "String").with_resolver(value_resolver(json!("ada")))),
    );
    let schema = Schema::build(registry)
        .with_rate_limiter(RateLimiter::new(CaptureLimiter(seen.clone())))
        .finish();

    let mut variables = Variables::default();
    variables.insert("id", 7);
    let response = schema
        .execute(
            Request::new([SelectedField::new("me")])
                .query("query getUser($id: ID!) { me }")
                .operation_name("getUser")
                .variables(variables)
                .variable_types(json!({"id": "ID!"})),
        )
        .await;

    assert!(response.is_ok());
    assert_eq!(
        seen.lock().unwrap().take().unwrap(),
        Seen {
            query: "query getUser($id: ID!) { me }".to_string(),
            operation_name: Some("getUser".to_string()),
            variables: json!({"id": 7}),
            variable_types: Some(json!({"id": "ID!"})),
        }
    );
}

#[tokio::test]
async fn the_default_rate_limiter_admits_everything() {
    let registry = base_registry().with_type(
        ObjectType::new("Query").field(MetaField::new("me", "String").with_resolver(value_resolver(json!("ada")))),
    );
    let schema = Schema::build(registry).finish();

    for _ in 0..32 {
        let response = schema.execute(Request::new([SelectedField::new("me")])).await;
        assert!(response.status.is_completed());
    }
}
