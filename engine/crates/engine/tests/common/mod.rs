#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use futures_util::FutureExt;
use serde_json::{json, Value};

use engine::{
    registry::{Registry, ScalarType},
    Resolver, ResolverContext, Variables,
};

/// A registry that already knows the built-in scalars.
pub fn base_registry() -> Registry {
    Registry::new("Query")
        .with_type(ScalarType::new("String"))
        .with_type(ScalarType::new("Int"))
}

/// Resolver returning a fixed value.
pub fn value_resolver(value: Value) -> Resolver {
    Resolver::function(move |_ctx: &ResolverContext<'_>, _args: &Variables| {
        let value = value.clone();
        async move { Ok(value) }.boxed()
    })
}

/// Resolver failing with a fixed message.
pub fn failing_resolver(message: &'static str) -> Resolver {
    Resolver::function(move |_ctx: &ResolverContext<'_>, _args: &Variables| {
        async move { Err(engine::Error::new(message)) }.boxed()
    })
}

/// Resolver counting its invocations before returning a fixed value.
pub fn counting_resolver(counter: Arc<AtomicUsize>, value: Value) -> Resolver {
    Resolver::function(move |_ctx: &ResolverContext<'_>, _args: &Variables| {
        counter.fetch_add(1, Ordering::SeqCst);
        let value = value.clone();
        async move { Ok(value) }.boxed()
    })
}

/// Resolver sleeping for `delay` before returning a fixed value.
pub fn sleepy_resolver(delay: Duration, value: Value) -> Resolver {
    Resolver::function(move |_ctx: &ResolverContext<'_>, _args: &Variables| {
        let value = value.clone();
        async move {
            tokio::time::sleep(delay).await;
            Ok(value)
        }
        .boxed()
    })
}

/// Resolver appending its name to a shared log after sleeping for `delay`.
pub fn logging_resolver(name: &'static str, delay: Duration, log: Arc<Mutex<Vec<String>>>) -> Resolver {
    Resolver::function(move |_ctx: &ResolverContext<'_>, _args: &Variables| {
        let log = log.clone();
        async move {
            tokio::time::sleep(delay).await;
            log.lock().unwrap().push(name.to_string());
            Ok(json!(name))
        }
        .boxed()
    })
}

/// Tracks how many resolver invocations are in flight at once.
#[derive(Default)]
pub struct Gauge {
    active: AtomicUsize,
    max: AtomicUsize,
}

impl Gauge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn max(&self) -> usize {
        self.max.load(Ordering::SeqCst)
    }
}

/// Resolver recording its concurrency in `gauge` while it sleeps.
pub fn gauge_resolver(gauge: Arc<Gauge>) -> Resolver {
    Resolver::function(move |_ctx: &ResolverContext<'_>, _args: &Variables| {
        let gauge = gauge.clone();
        async move {
            let active = gauge.active.fetch_add(1, Ordering::SeqCst) + 1;
            gauge.max.fetch_max(active, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            gauge.active.fetch_sub(1, Ordering::SeqCst);
            Ok(json!(1))
        }
        .boxed()
    })
}

/// The response object's keys, in serialization order.
pub fn object_keys(value: &Value) -> Vec<&str> {
    value
        .as_object()
        .map(|object| object.keys().map(String::as_str).collect())
        .unwrap_or_default()
}
