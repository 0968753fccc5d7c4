//! Non-deterministic gateways.
//!
//! Usecases depend on these instead of calling the UUID generator or the
//! clock directly, so tests can substitute deterministic handlers of the same
//! shape.

use std::time::SystemTime;

use serde::Serialize;
use strata_core::{handler_fn, reflect, ActionHandler, HandlerError, RequestContext};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct GenerateUuidRequest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateUuidResponse {
    pub uuid: String,
}

reflect!(GenerateUuidRequest {});
reflect!(GenerateUuidResponse { uuid: String });

/// Gateway producing a random (v4) UUID.
pub fn generate_uuid() -> impl ActionHandler<GenerateUuidRequest, GenerateUuidResponse> {
    handler_fn(|_ctx: RequestContext, _req: GenerateUuidRequest| async move {
        Ok::<_, HandlerError>(GenerateUuidResponse {
            uuid: Uuid::new_v4().to_string(),
        })
    })
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CurrentTimeRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrentTimeResponse {
    pub now: SystemTime,
}

reflect!(CurrentTimeRequest {});
reflect!(CurrentTimeResponse { now: SystemTime });

/// Gateway reading the wall clock.
pub fn current_time() -> impl ActionHandler<CurrentTimeRequest, CurrentTimeResponse> {
    handler_fn(|_ctx: RequestContext, _req: CurrentTimeRequest| async move {
        Ok::<_, HandlerError>(CurrentTimeResponse {
            now: SystemTime::now(),
        })
    })
}
