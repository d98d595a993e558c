//! Directive middleware.
//!
//! A schema directive maps, at runtime, to a [`ResolverVisitor`] wrapped
//! around the field's terminal resolver. Visitors compose right to left: the
//! outermost visitor runs first and its `next` is the composition of the
//! remaining visitors, terminating in the field's own resolver.

use std::sync::Arc;

use crate::{
    error::Error,
    registry::resolvers::{Resolver, ResolverContext},
    request::Variables,
};

/// Middleware wrapped around a field's terminal resolver.
///
/// A visitor decides whether, how many times and with which arguments the
/// rest of the chain runs: it may rewrite `args` before forwarding them,
/// skip `next` entirely to short-circuit, or run it repeatedly to retry. A
/// failure coming back from `next` is a value, not control flow, and may be
/// inspected, wrapped or replaced.
#[async_trait::async_trait]
pub trait ResolverVisitor: Send + Sync {
    async fn resolve(
        &self,
        ctx: &ResolverContext<'_>,
        args: &Variables,
        next: NextResolver<'_>,
    ) -> Result<serde_json::Value, Error>;
}

/// The remainder of a middleware chain: the visitors still to run and the
/// terminal resolver behind them.
///
/// Built once per field at dispatch time. `Copy`, so a visitor that wants to
/// run its tail more than once simply calls [`NextResolver::run`] again.
#[derive(Clone, Copy)]
pub struct NextResolver<'a> {
    visitors: &'a [Arc<dyn ResolverVisitor>],
    terminal: &'a Resolver,
}

impl<'a> NextResolver<'a> {
    pub(crate) fn new(visitors: &'a [Arc<dyn ResolverVisitor>], terminal: &'a Resolver) -> Self {
        Self { visitors, terminal }
    }

    /// Run the rest of the chain. When no visitors are left this is the
    /// terminal resolver itself.
    pub async fn run(self, ctx: &ResolverContext<'_>, args: &Variables) -> Result<serde_json::Value, Error> {
        match self.visitors.split_first() {
            Some((head, tail)) => {
                head.resolve(
                    ctx,
                    args,
                    NextResolver {
                        visitors: tail,
                        terminal: self.terminal,
                    },
                )
                .await
            }
            None => self.terminal.resolve(ctx, args).await,
        }
    }
}
