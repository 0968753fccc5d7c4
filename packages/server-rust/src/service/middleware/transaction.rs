//! Transaction middleware for action handlers.
//!
//! Opens one unit of work per call, attaches its handle to the context under
//! [`ActiveTransaction`], runs the inner handler, then commits on success or
//! rolls back on error. A failed commit or rollback replaces the handler's
//! own outcome; a successful rollback hands the handler's error back
//! unchanged.

use std::fmt;
use std::sync::Arc;
use std::task::{Context, Poll};

use strata_core::{Call, HandlerError, HandlerFuture};
use tower::{Layer, Service};
use tracing::{debug, error};

use crate::traits::{ActiveTransaction, UnitOfWork};

// ---------------------------------------------------------------------------
// TransactionLayer
// ---------------------------------------------------------------------------

/// Tower layer that runs each call inside its own unit of work.
pub struct TransactionLayer<U> {
    unit_of_work: Arc<U>,
}

impl<U> TransactionLayer<U> {
    #[must_use]
    pub fn new(unit_of_work: Arc<U>) -> Self {
        Self { unit_of_work }
    }
}

impl<U> Clone for TransactionLayer<U> {
    fn clone(&self) -> Self {
        Self {
            unit_of_work: Arc::clone(&self.unit_of_work),
        }
    }
}

impl<U> fmt::Debug for TransactionLayer<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionLayer")
            .field("unit_of_work", &std::any::type_name::<U>())
            .finish()
    }
}

impl<S, U> Layer<S> for TransactionLayer<U> {
    type Service = TransactionService<S, U>;

    fn layer(&self, inner: S) -> Self::Service {
        TransactionService {
            inner,
            unit_of_work: Arc::clone(&self.unit_of_work),
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionService
// ---------------------------------------------------------------------------

/// Service wrapper produced by [`TransactionLayer`].
pub struct TransactionService<S, U> {
    inner: S,
    unit_of_work: Arc<U>,
}

impl<S: Clone, U> Clone for TransactionService<S, U> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            unit_of_work: Arc::clone(&self.unit_of_work),
        }
    }
}

impl<S: fmt::Debug, U> fmt::Debug for TransactionService<S, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionService")
            .field("inner", &self.inner)
            .field("unit_of_work", &std::any::type_name::<U>())
            .finish()
    }
}

impl<S, U, Req> Service<Call<Req>> for TransactionService<S, U>
where
    S: Service<Call<Req>, Error = HandlerError> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    U: UnitOfWork,
    Req: Send + 'static,
{
    type Response = S::Response;
    type Error = HandlerError;
    type Future = HandlerFuture<S::Response>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, call: Call<Req>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let unit_of_work = Arc::clone(&self.unit_of_work);

        Box::pin(async move {
            let handle = unit_of_work.begin().await.map_err(|err| {
                error!(error = %err, "unit of work failed to begin");
                HandlerError::Begin(err)
            })?;
            debug!("unit of work started");

            let ctx = call.ctx.attach::<ActiveTransaction<U::Handle>>(handle.clone());
            let result = inner.call(call.with_context(ctx)).await;

            match result {
                Ok(response) => {
                    if let Err(err) = unit_of_work.commit(handle).await {
                        error!(error = %err, "unit of work failed to commit");
                        return Err(HandlerError::Commit(err));
                    }
                    debug!("unit of work committed");
                    Ok(response)
                }
                Err(handler_err) => {
                    if let Err(err) = unit_of_work.rollback(handle).await {
                        error!(
                            error = %err,
                            handler_error = %handler_err,
                            "unit of work failed to roll back"
                        );
                        return Err(HandlerError::Rollback(err));
                    }
                    debug!(handler_error = %handler_err, "unit of work rolled back");
                    Err(handler_err)
                }
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
