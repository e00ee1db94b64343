use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::repository::{CampaignRepository, ExclusivityRepository, RepositoryError};
use super::service::{
    CampaignAdminService, CampaignServiceError, ExclusivityRequest, StatusUpdateRequest,
};
use super::wizard::CampaignDraft;
use crate::context::RequestContext;

/// Router builder exposing draft submission plus the admin campaign, exclusivity,
/// and fulfillment endpoints.
pub fn admin_router<C, E>(service: Arc<CampaignAdminService<C, E>>) -> Router
where
    C: CampaignRepository + 'static,
    E: ExclusivityRepository + 'static,
{
    Router::new()
        .route("/api/campaigns", post(submit_handler::<C, E>))
        .route("/api/admin/campaigns", put(update_status_handler::<C, E>))
        .route("/api/admin/exclusivity", post(exclusivity_handler::<C, E>))
        .route("/api/admin/fulfillment", get(fulfillment_handler::<C, E>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FulfillmentQuery {
    #[serde(default)]
    pub(crate) stage: Option<String>,
}

pub(crate) async fn submit_handler<C, E>(
    State(service): State<Arc<CampaignAdminService<C, E>>>,
    context: RequestContext,
    axum::Json(draft): axum::Json<CampaignDraft>,
) -> Response
where
    C: CampaignRepository + 'static,
    E: ExclusivityRepository + 'static,
{
    match service.submit_draft(&context, draft) {
        Ok(campaign) => (
            StatusCode::CREATED,
            axum::Json(json!({
                "ok": true,
                "campaignId": campaign.id,
                "status": campaign.status,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_status_handler<C, E>(
    State(service): State<Arc<CampaignAdminService<C, E>>>,
    context: RequestContext,
    axum::Json(request): axum::Json<StatusUpdateRequest>,
) -> Response
where
    C: CampaignRepository + 'static,
    E: ExclusivityRepository + 'static,
{
    match service.update_status(&context, request) {
        Ok(_) => (StatusCode::OK, axum::Json(json!({ "ok": true }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn exclusivity_handler<C, E>(
    State(service): State<Arc<CampaignAdminService<C, E>>>,
    context: RequestContext,
    axum::Json(request): axum::Json<ExclusivityRequest>,
) -> Response
where
    C: CampaignRepository + 'static,
    E: ExclusivityRepository + 'static,
{
    match service.create_exclusivity(&context, request) {
        Ok(_) => (StatusCode::OK, axum::Json(json!({ "ok": true }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fulfillment_handler<C, E>(
    State(service): State<Arc<CampaignAdminService<C, E>>>,
    context: RequestContext,
    Query(query): Query<FulfillmentQuery>,
) -> Response
where
    C: CampaignRepository + 'static,
    E: ExclusivityRepository + 'static,
{
    match service.fulfillment_queue(&context, query.stage.as_deref()) {
        Ok(queue) => (StatusCode::OK, axum::Json(queue)).into_response(),
        Err(error) => error_response(error),
    }
}

impl CampaignServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::MissingFields(_) | Self::InvalidField(_) | Self::UnknownStatus(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Rejected(_) => StatusCode::CONFLICT,
            Self::Incomplete(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            Self::Repository(RepositoryError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn error_response(error: CampaignServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (error.status_code(), axum::Json(payload)).into_response()
}
