//! Retry middleware for action handlers.
//!
//! Re-invokes the inner handler until it succeeds or `attempts` calls have
//! been made; the first call counts as attempt 1. There is no backoff and no
//! jitter. On exhaustion the last attempt's error is returned unchanged.
//!
//! The loop does not observe cancellation on its own: it stops early only if
//! the caller drops the returned future. Writes made by failed attempts are
//! not undone here; put a [`TransactionLayer`](super::TransactionLayer) beneath
//! this one for that.

use std::task::{Context, Poll};

use strata_core::{Call, HandlerError, HandlerFuture};
use tower::{Layer, Service, ServiceExt};
use tracing::warn;

// ---------------------------------------------------------------------------
// RetryLayer
// ---------------------------------------------------------------------------

/// Tower layer that retries failed calls a fixed number of times.
#[derive(Debug, Clone, Copy)]
pub struct RetryLayer {
    attempts: u32,
}

impl RetryLayer {
    /// `attempts` is the total number of calls; values below 1 mean 1.
    #[must_use]
    pub fn new(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
        }
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl<S> Layer<S> for RetryLayer {
    type Service = RetryService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RetryService {
            inner,
            attempts: self.attempts,
        }
    }
}

// ---------------------------------------------------------------------------
// RetryService
// ---------------------------------------------------------------------------

/// Service wrapper produced by [`RetryLayer`].
#[derive(Debug, Clone)]
pub struct RetryService<S> {
    inner: S,
    attempts: u32,
}

impl<S, Req> Service<Call<Req>> for RetryService<S>
where
    S: Service<Call<Req>, Error = HandlerError> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    Req: Clone + Send + 'static,
{
    type Response = S::Response;
    type Error = HandlerError;
    type Future = HandlerFuture<S::Response>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, call: Call<Req>) -> Self::Future {
        // Keep the instance that was driven to readiness for the first attempt.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let attempts = self.attempts;

        Box::pin(async move {
            let mut attempt = 1;
            loop {
                match inner.call(call.clone()).await {
                    Ok(response) => return Ok(response),
                    Err(err) if attempt < attempts => {
                        warn!(attempt, attempts, error = %err, "action attempt failed, retrying");
                        attempt += 1;
                        ServiceExt::<Call<Req>>::ready(&mut inner).await?;
                    }
                    Err(err) => {
                        if attempts > 1 {
                            warn!(attempts, error = %err, "action failed on every attempt");
                        }
                        return Err(err);
                    }
                }
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
