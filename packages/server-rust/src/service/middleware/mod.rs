//! Tower middleware layers for action handlers.
//!
//! Every layer keeps the request and response types of the handler it wraps,
//! so they stack in any order:
//!
//! - [`logging`]: Request/response rendering with nested indentation
//! - [`timing`]: Call duration under a label via `tracing` spans
//! - [`retry`]: Fixed-count re-invocation on error
//! - [`transaction`]: One unit of work per call, commit or roll back
//! - [`pipeline`]: The canonical composition of all four

#[cfg(test)]
mod capture;
pub mod logging;
pub mod pipeline;
pub mod retry;
pub mod timing;
pub mod transaction;

pub use logging::LoggingLayer;
pub use pipeline::build_action_pipeline;
pub use retry::RetryLayer;
pub use timing::TimingLayer;
pub use transaction::TransactionLayer;
