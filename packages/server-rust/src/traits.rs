use std::marker::PhantomData;

use async_trait::async_trait;
use strata_core::{ContextKey, RequestContext};

/// Pluggable unit-of-work backend used by the transaction middleware.
/// Implementations: relational databases (external), no-op (default, tests).
///
/// A backend hands out one `Handle` per transaction. The handle is attached
/// to the request context under [`ActiveTransaction`] for the duration of the
/// wrapped call, so gateways find it without it appearing in their signature.
#[async_trait]
pub trait UnitOfWork: Send + Sync + 'static {
    /// Transaction handle gateways run their statements through.
    type Handle: Clone + Send + Sync + 'static;

    /// Opens a new transaction.
    async fn begin(&self) -> anyhow::Result<Self::Handle>;

    /// Makes every write done through `handle` durable.
    async fn commit(&self, handle: Self::Handle) -> anyhow::Result<()>;

    /// Discards every write done through `handle`.
    async fn rollback(&self, handle: Self::Handle) -> anyhow::Result<()>;
}

/// Context key reserved for the active transaction handle of type `H`.
pub struct ActiveTransaction<H>(PhantomData<fn() -> H>);

impl<H: Clone + Send + Sync + 'static> ContextKey for ActiveTransaction<H> {
    type Value = H;
    const NAME: &'static str = "active_transaction";
}

/// Returns the transaction attached to `ctx`, or `fallback` outside one.
///
/// Gateways pass their non-transactional handle (typically the pool) as the
/// fallback so the same code runs inside and outside a unit of work.
pub fn current_transaction<H>(ctx: &RequestContext, fallback: H) -> H
where
    H: Clone + Send + Sync + 'static,
{
    ctx.get::<ActiveTransaction<H>>(fallback)
}
