use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::put,
    Router,
};
use serde_json::json;

use super::{RoleChangeRequest, UserAdminError, UserAdminService};
use crate::campaigns::{ProfileRepository, RepositoryError};
use crate::context::RequestContext;

/// Router builder exposing the admin role change endpoint.
pub fn users_router<P>(service: Arc<UserAdminService<P>>) -> Router
where
    P: ProfileRepository + 'static,
{
    Router::new()
        .route("/api/admin/users", put(change_role_handler::<P>))
        .with_state(service)
}

pub(crate) async fn change_role_handler<P>(
    State(service): State<Arc<UserAdminService<P>>>,
    context: RequestContext,
    axum::Json(request): axum::Json<RoleChangeRequest>,
) -> Response
where
    P: ProfileRepository + 'static,
{
    match service.change_role(&context, request) {
        Ok(_) => (StatusCode::OK, axum::Json(json!({ "ok": true }))).into_response(),
        Err(error) => {
            let status = match error {
                UserAdminError::Forbidden(_) => StatusCode::FORBIDDEN,
                UserAdminError::MissingFields
                | UserAdminError::InvalidRole(_)
                | UserAdminError::SelfDemotion => StatusCode::BAD_REQUEST,
                UserAdminError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
                UserAdminError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
                UserAdminError::Repository(RepositoryError::Unavailable(_)) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            let payload = json!({ "error": error.to_string() });
            (status, axum::Json(payload)).into_response()
        }
    }
}
