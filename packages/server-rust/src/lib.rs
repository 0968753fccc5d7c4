//! Strata server: action middleware, unit-of-work seam, gateways and the HTTP
//! surface publishing the generated API documents.

pub mod apidoc;
pub mod config;
pub mod gateway;
pub mod network;
pub mod routes;
pub mod service;
pub mod telemetry;
pub mod traits;
pub mod unit_of_work;

pub use apidoc::{ApiRegistry, EndpointDescriptor, TopicDescriptor, TopicRegistry};
pub use service::{build_action_pipeline, PipelineConfig};
pub use traits::{current_transaction, ActiveTransaction, UnitOfWork};
