//! Strata core: action handler contract, request context carrier, and
//! structural schema reflection.

pub mod context;
pub mod error;
pub mod handler;
pub mod schema;

pub use context::{ContextKey, RequestContext};
pub use error::{HandlerError, HandlerResult};
pub use handler::{
    boxed, handler_fn, ActionHandler, ActionHandlerExt, BoxActionHandler, Call, HandlerFn,
    HandlerFuture,
};
pub use schema::{object_schema, Field, Reflect, SchemaNode};
