//! Pipeline composition: combines all middleware layers around one handler.

use std::sync::Arc;

use serde::Serialize;
use strata_core::ActionHandler;
use tower::ServiceBuilder;

use super::logging::LoggingLayer;
use super::retry::RetryLayer;
use super::timing::TimingLayer;
use super::transaction::TransactionLayer;
use crate::service::config::PipelineConfig;
use crate::traits::UnitOfWork;

/// Wrap `handler` with the standard middleware stack.
///
/// Layer order (outermost to innermost):
/// 1. `LoggingLayer` -- render the request and the final outcome once
/// 2. `TimingLayer` -- time the whole call, retries included
/// 3. `RetryLayer` -- re-run failed attempts
/// 4. `TransactionLayer` -- one unit of work per attempt
///
/// Retry sits outside the transaction, so every attempt starts from a fresh
/// unit of work and a failed attempt is rolled back before the next begins.
/// Compose the layers by hand with `ServiceBuilder` to retry inside a single
/// transaction instead.
pub fn build_action_pipeline<H, U, Req, Res>(
    handler: H,
    unit_of_work: Arc<U>,
    config: &PipelineConfig,
) -> impl ActionHandler<Req, Res>
where
    H: ActionHandler<Req, Res>,
    U: UnitOfWork,
    Req: Serialize + Clone + Send + 'static,
    Res: Serialize + Send + 'static,
{
    ServiceBuilder::new()
        .layer(LoggingLayer::new(config.log_indentation))
        .layer(TimingLayer::new(config.label.as_str()))
        .layer(RetryLayer::new(config.retry_attempts))
        .layer(TransactionLayer::new(unit_of_work))
        .service(handler)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
