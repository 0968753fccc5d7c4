//! The action handler contract.
//!
//! Every usecase, gateway and middleware in a Strata application has the same
//! shape: it receives a [`RequestContext`] together with a typed request and
//! produces either a typed response or a [`HandlerError`]. That shape is a
//! `tower::Service<Call<Req>>` with a boxed future, which lets middleware be
//! written as ordinary tower layers and stacked with `ServiceBuilder`.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::util::BoxCloneService;
use tower::{Service, ServiceExt};

use crate::context::RequestContext;
use crate::error::{HandlerError, HandlerResult};

/// Future returned by every action handler.
pub type HandlerFuture<Res> = Pin<Box<dyn Future<Output = HandlerResult<Res>> + Send>>;

/// A single invocation: the ambient context plus the typed request.
#[derive(Debug, Clone)]
pub struct Call<Req> {
    pub ctx: RequestContext,
    pub request: Req,
}

impl<Req> Call<Req> {
    #[must_use]
    pub fn new(ctx: RequestContext, request: Req) -> Self {
        Self { ctx, request }
    }

    /// Replaces the context, keeping the request.
    #[must_use]
    pub fn with_context(self, ctx: RequestContext) -> Self {
        Self {
            ctx,
            request: self.request,
        }
    }

    pub fn into_parts(self) -> (RequestContext, Req) {
        (self.ctx, self.request)
    }
}

/// Anything that turns `Call<Req>` into `Res` with the handler error type.
///
/// Blanket-implemented for every matching clonable service, so handlers never
/// implement it by hand.
pub trait ActionHandler<Req, Res>:
    Service<Call<Req>, Response = Res, Error = HandlerError, Future = HandlerFuture<Res>>
    + Clone
    + Send
    + 'static
{
}

impl<S, Req, Res> ActionHandler<Req, Res> for S where
    S: Service<Call<Req>, Response = Res, Error = HandlerError, Future = HandlerFuture<Res>>
        + Clone
        + Send
        + 'static
{
}

/// Convenience calls on any [`ActionHandler`].
pub trait ActionHandlerExt<Req, Res>: ActionHandler<Req, Res> {
    /// Invokes a clone of the handler once, waiting for readiness first.
    fn invoke(&self, ctx: RequestContext, request: Req) -> HandlerFuture<Res>
    where
        Req: Send + 'static,
        Res: 'static,
    {
        let handler = self.clone();
        Box::pin(handler.oneshot(Call::new(ctx, request)))
    }
}

impl<S, Req, Res> ActionHandlerExt<Req, Res> for S where S: ActionHandler<Req, Res> {}

/// Type-erased action handler. Request and response types stay static.
pub type BoxActionHandler<Req, Res> = BoxCloneService<Call<Req>, Res, HandlerError>;

/// Erases the concrete type of `handler`.
pub fn boxed<H, Req, Res>(handler: H) -> BoxActionHandler<Req, Res>
where
    H: ActionHandler<Req, Res>,
    Res: 'static,
{
    BoxCloneService::new(handler)
}

/// Lifts an async function of `(RequestContext, Req)` into an action handler.
///
/// ```
/// use strata_core::{handler_fn, ActionHandlerExt, HandlerError, RequestContext};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let double = handler_fn(|_ctx: RequestContext, n: u32| async move {
///     Ok::<_, HandlerError>(n * 2)
/// });
/// assert_eq!(double.invoke(RequestContext::new(), 21).await.unwrap(), 42);
/// # });
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F> {
    HandlerFn { f }
}

/// Action handler produced by [`handler_fn`].
#[derive(Clone, Copy)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn")
            .field("f", &std::any::type_name::<F>())
            .finish()
    }
}

impl<F, Fut, Req, Res> Service<Call<Req>> for HandlerFn<F>
where
    F: Fn(RequestContext, Req) -> Fut,
    Fut: Future<Output = HandlerResult<Res>> + Send + 'static,
{
    type Response = Res;
    type Error = HandlerError;
    type Future = HandlerFuture<Res>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, call: Call<Req>) -> Self::Future {
        let (ctx, request) = call.into_parts();
        Box::pin((self.f)(ctx, request))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
