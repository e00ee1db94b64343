use super::domain::{Campaign, CampaignId, ExclusivityGrant, ExclusivityRecord, Order, Profile};
use crate::context::{Role, UserId};

/// Storage abstraction for campaigns so the admin service can be exercised in isolation.
pub trait CampaignRepository: Send + Sync {
    fn insert(&self, campaign: Campaign) -> Result<Campaign, RepositoryError>;
    fn update(&self, campaign: Campaign) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &CampaignId) -> Result<Option<Campaign>, RepositoryError>;
    fn list(&self) -> Result<Vec<Campaign>, RepositoryError>;
    /// Reserve an id for a campaign about to be inserted.
    fn next_id(&self) -> Result<CampaignId, RepositoryError>;
}

pub trait ExclusivityRepository: Send + Sync {
    /// Store the grant under a freshly assigned id.
    fn insert(&self, grant: ExclusivityGrant) -> Result<ExclusivityRecord, RepositoryError>;
    fn list(&self) -> Result<Vec<ExclusivityRecord>, RepositoryError>;
}

/// Read side of the billing tables used by admin reports.
pub trait LedgerRepository: Send + Sync {
    fn orders(&self) -> Result<Vec<Order>, RepositoryError>;
    fn profiles(&self) -> Result<Vec<Profile>, RepositoryError>;
}

/// Profile lookups and role changes made from the admin user screen.
pub trait ProfileRepository: Send + Sync {
    fn fetch_profile(&self, id: &UserId) -> Result<Option<Profile>, RepositoryError>;
    fn set_role(&self, id: &UserId, role: Role) -> Result<Profile, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
