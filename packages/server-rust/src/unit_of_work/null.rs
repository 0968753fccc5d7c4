//! No-op [`UnitOfWork`] implementation.
//!
//! [`NullUnitOfWork`] hands out numbered handles and accepts every commit and
//! rollback without side effects. Useful for testing and for deployments
//! whose gateways do not touch a transactional store.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::traits::UnitOfWork;

/// Handle returned by [`NullUnitOfWork::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullTransaction(pub u64);

/// No-op unit of work. This is the default when no persistence backend is
/// configured.
#[derive(Debug, Default)]
pub struct NullUnitOfWork {
    next_id: AtomicU64,
}

impl NullUnitOfWork {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of transactions begun so far.
    #[must_use]
    pub fn begun(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl UnitOfWork for NullUnitOfWork {
    type Handle = NullTransaction;

    async fn begin(&self) -> anyhow::Result<NullTransaction> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(NullTransaction(id))
    }

    async fn commit(&self, _handle: NullTransaction) -> anyhow::Result<()> {
        Ok(())
    }

    async fn rollback(&self, _handle: NullTransaction) -> anyhow::Result<()> {
        Ok(())
    }
}
