//! Timing middleware for action handlers.
//!
//! Records wall-clock duration around the inner call in a `tracing` span and
//! reports it under a caller-supplied label. The clock starts before the
//! inner `call`, so synchronous work done there is included. Time is read
//! from `tokio::time`, which follows a paused test clock. The result is
//! passed through untouched.

use std::sync::Arc;
use std::task::{Context, Poll};
use strata_core::{Call, HandlerError, HandlerFuture};
use tokio::time::Instant;
use tower::{Layer, Service};
use tracing::{info_span, Instrument};

// ---------------------------------------------------------------------------
// TimingLayer
// ---------------------------------------------------------------------------

/// Tower layer that times every call under `label`.
#[derive(Debug, Clone)]
pub struct TimingLayer {
    label: Arc<str>,
}

impl TimingLayer {
    #[must_use]
    pub fn new(label: impl Into<Arc<str>>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl<S> Layer<S> for TimingLayer {
    type Service = TimingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TimingService {
            inner,
            label: Arc::clone(&self.label),
        }
    }
}

// ---------------------------------------------------------------------------
// TimingService
// ---------------------------------------------------------------------------

/// Service wrapper that records call duration and outcome in tracing spans.
#[derive(Debug, Clone)]
pub struct TimingService<S> {
    inner: S,
    label: Arc<str>,
}

impl<S, Req> Service<Call<Req>> for TimingService<S>
where
    S: Service<Call<Req>, Error = HandlerError>,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
{
    type Response = S::Response;
    type Error = HandlerError;
    type Future = HandlerFuture<S::Response>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, call: Call<Req>) -> Self::Future {
        let label = Arc::clone(&self.label);

        let span = info_span!(
            "action",
            label = %label,
            duration_ms = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );

        let start = Instant::now();
        let fut = span.in_scope(|| self.inner.call(call));

        Box::pin(
            async move {
                let result = fut.await;
                let elapsed = start.elapsed();

                let outcome = match &result {
                    Ok(_) => "ok",
                    Err(_) => "error",
                };

                let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
                tracing::Span::current().record("duration_ms", duration_ms);
                tracing::Span::current().record("outcome", outcome);

                tracing::info!(
                    label = %label,
                    duration_ms,
                    outcome,
                    "action {label} took {elapsed:?}"
                );

                result
            }
            .instrument(span),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
