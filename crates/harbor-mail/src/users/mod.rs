//! Admin user management: promoting customers and demoting admins.

mod router;

pub use router::users_router;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::campaigns::{Profile, ProfileRepository, RepositoryError};
use crate::context::{Forbidden, InvalidRole, RequestContext, Role, UserId};

/// Role change as posted by the admin user screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleChangeRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

pub struct UserAdminService<P> {
    profiles: Arc<P>,
}

impl<P> UserAdminService<P>
where
    P: ProfileRepository + 'static,
{
    pub fn new(profiles: Arc<P>) -> Self {
        Self { profiles }
    }

    /// Set a user's role. Admins cannot demote themselves.
    pub fn change_role(
        &self,
        context: &RequestContext,
        request: RoleChangeRequest,
    ) -> Result<Profile, UserAdminError> {
        let admin = context.require_admin()?;

        let user_id = request.user_id.filter(|value| !value.is_empty());
        let role = request.role.filter(|value| !value.is_empty());
        let (Some(user_id), Some(role)) = (user_id, role) else {
            return Err(UserAdminError::MissingFields);
        };
        let role: Role = role.parse()?;

        let user_id = UserId(user_id);
        if &user_id == admin && role != Role::Admin {
            return Err(UserAdminError::SelfDemotion);
        }

        let profile = self.profiles.set_role(&user_id, role)?;
        info!(
            admin_id = %admin.0,
            user_id = %profile.id.0,
            role = ?profile.role,
            "user role changed"
        );
        Ok(profile)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UserAdminError {
    #[error(transparent)]
    Forbidden(#[from] Forbidden),
    #[error("Missing fields")]
    MissingFields,
    #[error(transparent)]
    InvalidRole(#[from] InvalidRole),
    #[error("Cannot remove your own admin role")]
    SelfDemotion,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
