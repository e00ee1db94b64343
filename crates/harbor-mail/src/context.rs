//! Request-scoped caller identity.
//!
//! Authentication happens upstream; the auth proxy forwards the verified user
//! id and role as headers. Handlers receive a [`RequestContext`] per request
//! instead of consulting any process-wide session.

use std::convert::Infallible;
use std::str::FromStr;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

/// Role names outside `customer` and `admin`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid role")]
pub struct InvalidRole(pub String);

impl FromStr for Role {
    type Err = InvalidRole;

    /// Exact wire names only; header parsing is the lenient path.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            other => Err(InvalidRole(other.to_string())),
        }
    }
}

impl Role {
    fn from_header(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            _ => Self::Customer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestContext {
    pub user_id: Option<UserId>,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Unauthorized")]
pub struct Forbidden;

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn customer(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(UserId(user_id.into())),
            role: Role::Customer,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(UserId(user_id.into())),
            role: Role::Admin,
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        let user_id = headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| UserId(value.to_string()));

        // A role without a user is meaningless.
        let role = match &user_id {
            Some(_) => headers
                .get(USER_ROLE_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(Role::from_header)
                .unwrap_or_default(),
            None => Role::Customer,
        };

        Self { user_id, role }
    }

    /// The signed-in admin, or [`Forbidden`] for anyone else.
    pub fn require_admin(&self) -> Result<&UserId, Forbidden> {
        match (&self.user_id, self.role) {
            (Some(user_id), Role::Admin) => Ok(user_id),
            _ => Err(Forbidden),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
