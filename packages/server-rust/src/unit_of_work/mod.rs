//! [`UnitOfWork`](crate::traits::UnitOfWork) implementations shipped with the server.
//!
//! Real backends live with the application's persistence code; this module
//! only provides the no-op default and, under `cfg(test)`, a recording double.

pub mod null;

#[cfg(test)]
pub(crate) mod recording;

pub use null::{NullTransaction, NullUnitOfWork};
