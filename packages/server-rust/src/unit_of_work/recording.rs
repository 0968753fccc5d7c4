//! Test double that records every unit-of-work call and can be told to fail.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::traits::UnitOfWork;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Event {
    Begin(u64),
    Commit(u64),
    Rollback(u64),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingUnitOfWork {
    next_id: AtomicU64,
    events: Mutex<Vec<Event>>,
    pub(crate) fail_begin: AtomicBool,
    pub(crate) fail_commit: AtomicBool,
    pub(crate) fail_rollback: AtomicBool,
}

impl RecordingUnitOfWork {
    pub(crate) fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl UnitOfWork for RecordingUnitOfWork {
    type Handle = u64;

    async fn begin(&self) -> anyhow::Result<u64> {
        if self.fail_begin.load(Ordering::SeqCst) {
            anyhow::bail!("connection pool exhausted");
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.record(Event::Begin(id));
        Ok(id)
    }

    async fn commit(&self, handle: u64) -> anyhow::Result<()> {
        self.record(Event::Commit(handle));
        if self.fail_commit.load(Ordering::SeqCst) {
            anyhow::bail!("serialization failure");
        }
        Ok(())
    }

    async fn rollback(&self, handle: u64) -> anyhow::Result<()> {
        self.record(Event::Rollback(handle));
        if self.fail_rollback.load(Ordering::SeqCst) {
            anyhow::bail!("connection reset");
        }
        Ok(())
    }
}
