//! Action handler execution framework.
//!
//! 1. **Middleware** (`middleware`): Tower layers (logging, timing, retry,
//!    transaction) that decorate a handler without changing its shape
//! 2. **Configuration** (`config`): Settings for the canonical pipeline

pub mod config;
pub mod middleware;

pub use config::PipelineConfig;
pub use middleware::{
    build_action_pipeline, LoggingLayer, RetryLayer, TimingLayer, TransactionLayer,
};
