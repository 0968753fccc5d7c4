//! Request/response logging middleware for action handlers.
//!
//! Renders the request before the inner call and the response (or error)
//! after it, each line prefixed with `indentation` spaces so nested handler
//! stacks stay readable. A separator line closes each call at indentation 0
//! only. Rendering failures fall back to the type name; logging never fails a
//! request.

use std::task::{Context, Poll};

use serde::Serialize;
use strata_core::{Call, HandlerError, HandlerFuture};
use tower::{Layer, Service};
use tracing::{info, warn};

/// Line emitted after each outermost call.
pub const SEPARATOR: &str = "----------------------------------------------------------------------------------------------------------";

/// Renders `value` as compact JSON, or as its type name if serialization fails.
pub fn describe<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| std::any::type_name::<T>().to_string())
}

// ---------------------------------------------------------------------------
// LoggingLayer
// ---------------------------------------------------------------------------

/// Tower layer that logs every call passing through the wrapped handler.
#[derive(Debug, Clone)]
pub struct LoggingLayer {
    indentation: usize,
}

impl LoggingLayer {
    #[must_use]
    pub fn new(indentation: usize) -> Self {
        Self { indentation }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingService {
            inner,
            indentation: self.indentation,
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingService
// ---------------------------------------------------------------------------

/// Service wrapper produced by [`LoggingLayer`].
#[derive(Debug, Clone)]
pub struct LoggingService<S> {
    inner: S,
    indentation: usize,
}

impl<S, Req> Service<Call<Req>> for LoggingService<S>
where
    S: Service<Call<Req>, Error = HandlerError>,
    S::Future: Send + 'static,
    S::Response: Serialize + Send + 'static,
    Req: Serialize,
{
    type Response = S::Response;
    type Error = HandlerError;
    type Future = HandlerFuture<S::Response>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, call: Call<Req>) -> Self::Future {
        let indentation = self.indentation;
        let pad = " ".repeat(indentation);

        info!(indentation, "{pad}>>> REQUEST          {}", describe(&call.request));

        let fut = self.inner.call(call);

        Box::pin(async move {
            let result = fut.await;
            match &result {
                Ok(response) => {
                    info!(indentation, "{pad}>>> RESPONSE SUCCESS {}", describe(response));
                }
                Err(err) => {
                    warn!(indentation, "{pad}>>> RESPONSE ERROR   {err}");
                }
            }
            if indentation == 0 {
                info!("{SEPARATOR}");
            }
            result
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
