use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use harbor_mail::audience::{audience_router, CoverageState};
use harbor_mail::campaigns::{
    admin_router, CampaignAdminService, CampaignRepository, ExclusivityRepository,
    LedgerRepository, ProfileRepository,
};
use harbor_mail::fulfillment::{fulfillment_router, FulfillmentService};
use harbor_mail::pricing::quote_router;
use harbor_mail::reports::{reports_router, ReportService};
use harbor_mail::users::{users_router, UserAdminService};
use serde_json::json;
use std::sync::Arc;

/// Services sharing one set of stores, handed to the router as a unit.
pub(crate) struct ServiceSet<C, E, L> {
    pub(crate) admin: Arc<CampaignAdminService<C, E>>,
    pub(crate) fulfillment: Arc<FulfillmentService<C>>,
    pub(crate) reports: Arc<ReportService<C, L>>,
    pub(crate) users: Arc<UserAdminService<L>>,
}

/// Compose the public explorer, quote, and admin routers with service plumbing.
pub(crate) fn with_service_routes<C, E, L>(
    coverage: Arc<CoverageState>,
    services: ServiceSet<C, E, L>,
) -> axum::Router
where
    C: CampaignRepository + 'static,
    E: ExclusivityRepository + 'static,
    L: LedgerRepository + ProfileRepository + 'static,
{
    audience_router(coverage)
        .merge(quote_router())
        .merge(admin_router(services.admin))
        .merge(fulfillment_router(services.fulfillment))
        .merge(reports_router(services.reports))
        .merge(users_router(services.users))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
