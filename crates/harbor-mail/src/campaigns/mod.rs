//! Campaign records, the status lifecycle, and the admin endpoints that move
//! campaigns through print and mail.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod status;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use domain::{
    AgreementType, Campaign, CampaignId, ExclusivityGrant, ExclusivityId, ExclusivityRecord,
    ExclusivityStatus, MailPieceType, Order, OrderId, OrderStatus, Profile, Territory,
    UnknownMailPieceType,
};
pub use repository::{
    CampaignRepository, ExclusivityRepository, LedgerRepository, ProfileRepository, RepositoryError,
};
pub use router::admin_router;
pub use service::{
    CampaignAdminService, CampaignServiceError, ExclusivityRequest, FulfillmentQueue,
    StatusUpdateRequest,
};
pub use status::{
    CampaignStatus, DocumentedLifecycle, PermissiveTransitions, StatusTransitionPolicy,
    TransitionPolicyKind, TransitionRejected, UnknownCampaignStatus,
};
pub use wizard::{CampaignDraft, DraftIncomplete, WizardStep};
