//! HTTP routes exposing the gateways through the canonical pipeline.
//!
//! Each route runs its gateway inside [`build_action_pipeline`] and records a
//! matching [`EndpointDescriptor`], so the served document always lists what
//! the router serves.

use std::sync::Arc;

use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use strata_core::{ActionHandler, ActionHandlerExt, RequestContext};

use crate::apidoc::{ApiRegistry, EndpointDescriptor};
use crate::gateway::{current_time, generate_uuid, CurrentTimeRequest, GenerateUuidRequest};
use crate::service::{build_action_pipeline, PipelineConfig};
use crate::traits::UnitOfWork;

pub const UUID_PATH: &str = "/api/uuid";
pub const TIME_PATH: &str = "/api/time";

const TAG: &str = "Utility";

/// Builds the gateway routes and registers their descriptors in `api`.
pub fn gateway_routes<U: UnitOfWork>(unit_of_work: Arc<U>, api: &mut ApiRegistry) -> Router {
    let uuid = build_action_pipeline(
        generate_uuid(),
        Arc::clone(&unit_of_work),
        &PipelineConfig {
            label: "generate_uuid".to_string(),
            ..PipelineConfig::default()
        },
    );
    let time = build_action_pipeline(
        current_time(),
        unit_of_work,
        &PipelineConfig {
            label: "current_time".to_string(),
            ..PipelineConfig::default()
        },
    );

    api.add(
        EndpointDescriptor::new(Method::GET, UUID_PATH)
            .summary("Generate a random UUID")
            .tag(TAG)
            .example(200, json!({"uuid": "0b6f3c1e-8d0a-4e59-9a43-5f1d2c7e9b10"})),
    )
    .add(
        EndpointDescriptor::new(Method::GET, TIME_PATH)
            .summary("Current server time")
            .tag(TAG),
    );

    Router::new()
        .route(UUID_PATH, get(move || run(uuid.clone(), GenerateUuidRequest)))
        .route(TIME_PATH, get(move || run(time.clone(), CurrentTimeRequest)))
}

async fn run<H, Req, Res>(handler: H, request: Req) -> Response
where
    H: ActionHandler<Req, Res>,
    Req: Send + 'static,
    Res: Serialize + 'static,
{
    let pending = handler.invoke(RequestContext::new(), request);
    match pending.await {
        Ok(response) => Json(response).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            err.to_string(),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::unit_of_work::recording::{Event, RecordingUnitOfWork};
    use crate::unit_of_work::NullUnitOfWork;

    async fn get_body(router: Router, path: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn uuid_route_runs_the_gateway() {
        let mut api = ApiRegistry::new();
        let router = gateway_routes(Arc::new(NullUnitOfWork::new()), &mut api);

        let (status, body) = get_body(router, UUID_PATH).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(uuid::Uuid::parse_str(json["uuid"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn time_route_answers() {
        let mut api = ApiRegistry::new();
        let router = gateway_routes(Arc::new(NullUnitOfWork::new()), &mut api);
        let (status, body) = get_body(router, TIME_PATH).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("now"));
    }

    #[tokio::test]
    async fn each_request_gets_its_own_unit_of_work() {
        let uow = Arc::new(RecordingUnitOfWork::default());
        let router = gateway_routes(Arc::clone(&uow), &mut ApiRegistry::new());

        get_body(router.clone(), UUID_PATH).await;
        get_body(router, UUID_PATH).await;
        assert_eq!(
            uow.events(),
            vec![
                Event::Begin(1),
                Event::Commit(1),
                Event::Begin(2),
                Event::Commit(2)
            ]
        );
    }

    #[tokio::test]
    async fn unit_of_work_failure_is_a_plain_text_500() {
        let uow = Arc::new(RecordingUnitOfWork::default());
        uow.fail_begin.store(true, Ordering::SeqCst);
        let router = gateway_routes(uow, &mut ApiRegistry::new());

        let (status, body) = get_body(router, UUID_PATH).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "unit of work failed to begin: connection pool exhausted");
    }

    #[test]
    fn routes_are_documented() {
        let mut api = ApiRegistry::new();
        let _router = gateway_routes(Arc::new(NullUnitOfWork::new()), &mut api);

        let doc = api.generate_document("http://x");
        assert!(doc.paths.contains_key(UUID_PATH));
        assert!(doc.paths.contains_key(TIME_PATH));
        assert_eq!(doc.tags.len(), 1);
        assert_eq!(doc.tags[0].name, TAG);
    }
}
