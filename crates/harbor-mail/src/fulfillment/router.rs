use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::service::{FulfillmentService, FulfillmentServiceError, MailJobRequest};
use crate::campaigns::CampaignRepository;
use crate::context::RequestContext;

/// Router builder for mail jobs sent through the configured provider.
pub fn fulfillment_router<C>(service: Arc<FulfillmentService<C>>) -> Router
where
    C: CampaignRepository + 'static,
{
    Router::new()
        .route("/api/admin/fulfillment/jobs", post(create_job_handler::<C>))
        .route(
            "/api/admin/fulfillment/jobs/:job_id",
            get(tracking_handler::<C>).delete(cancel_handler::<C>),
        )
        .with_state(service)
}

pub(crate) async fn create_job_handler<C>(
    State(service): State<Arc<FulfillmentService<C>>>,
    context: RequestContext,
    axum::Json(request): axum::Json<MailJobRequest>,
) -> Response
where
    C: CampaignRepository + 'static,
{
    match service.create_job(&context, request) {
        Ok(job) => (StatusCode::CREATED, axum::Json(job)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn tracking_handler<C>(
    State(service): State<Arc<FulfillmentService<C>>>,
    context: RequestContext,
    Path(job_id): Path<String>,
) -> Response
where
    C: CampaignRepository + 'static,
{
    match service.tracking(&context, &job_id) {
        Ok(info) => (StatusCode::OK, axum::Json(info)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn cancel_handler<C>(
    State(service): State<Arc<FulfillmentService<C>>>,
    context: RequestContext,
    Path(job_id): Path<String>,
) -> Response
where
    C: CampaignRepository + 'static,
{
    match service.cancel(&context, &job_id) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "ok": true }))).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: FulfillmentServiceError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (error.status_code(), axum::Json(payload)).into_response()
}
