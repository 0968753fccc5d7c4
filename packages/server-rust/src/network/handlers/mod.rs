//! HTTP handler definitions for the Strata server.
//!
//! Defines `AppState`, the shared state carried through axum extractors.

pub mod health;

pub use health::{health_handler, liveness_handler};

use std::sync::Arc;
use std::time::Instant;

use super::NetworkConfig;

/// Shared application state passed to axum handlers via `State` extraction.
#[derive(Clone)]
pub struct AppState {
    /// Network configuration the server was started with.
    pub config: Arc<NetworkConfig>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}
