use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Lifecycle stage of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    PendingReview,
    Approved,
    InProduction,
    Mailed,
    Complete,
    Cancelled,
}

impl CampaignStatus {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Draft,
            Self::PendingReview,
            Self::Approved,
            Self::InProduction,
            Self::Mailed,
            Self::Complete,
            Self::Cancelled,
        ]
    }

    /// Stages shown on the admin fulfillment pipeline.
    pub const fn fulfillment_stages() -> [Self; 4] {
        [
            Self::Approved,
            Self::InProduction,
            Self::Mailed,
            Self::Complete,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingReview => "pending_review",
            Self::Approved => "approved",
            Self::InProduction => "in_production",
            Self::Mailed => "mailed",
            Self::Complete => "complete",
            Self::Cancelled => "cancelled",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::PendingReview => "Pending Review",
            Self::Approved => "Approved",
            Self::InProduction => "In Production",
            Self::Mailed => "Mailed",
            Self::Complete => "Complete",
            Self::Cancelled => "Cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Cancelled)
    }

    pub const fn is_fulfillment_stage(self) -> bool {
        matches!(
            self,
            Self::Approved | Self::InProduction | Self::Mailed | Self::Complete
        )
    }

    /// Next stage in the documented linear order, if any.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Draft => Some(Self::PendingReview),
            Self::PendingReview => Some(Self::Approved),
            Self::Approved => Some(Self::InProduction),
            Self::InProduction => Some(Self::Mailed),
            Self::Mailed => Some(Self::Complete),
            Self::Complete | Self::Cancelled => None,
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown campaign status '{0}'")]
pub struct UnknownCampaignStatus(pub String);

impl FromStr for CampaignStatus {
    type Err = UnknownCampaignStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ordered()
            .into_iter()
            .find(|status| status.as_str() == trimmed)
            .ok_or_else(|| UnknownCampaignStatus(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot move campaign from {from} to {to}")]
pub struct TransitionRejected {
    pub from: CampaignStatus,
    pub to: CampaignStatus,
}

/// Decides whether an admin may move a campaign between two statuses.
pub trait StatusTransitionPolicy: Send + Sync + fmt::Debug {
    fn check(&self, from: CampaignStatus, to: CampaignStatus) -> Result<(), TransitionRejected>;
}

/// Accepts every change; admins have full override power.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveTransitions;

impl StatusTransitionPolicy for PermissiveTransitions {
    fn check(&self, _from: CampaignStatus, _to: CampaignStatus) -> Result<(), TransitionRejected> {
        Ok(())
    }
}

/// Enforces the documented order: one step forward at a time, cancellation
/// from any non-terminal stage, and re-saving the current status.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentedLifecycle;

impl StatusTransitionPolicy for DocumentedLifecycle {
    fn check(&self, from: CampaignStatus, to: CampaignStatus) -> Result<(), TransitionRejected> {
        let allowed = from == to
            || from.next() == Some(to)
            || (to == CampaignStatus::Cancelled && !from.is_terminal());

        if allowed {
            Ok(())
        } else {
            Err(TransitionRejected { from, to })
        }
    }
}

/// Configurable choice of transition policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicyKind {
    #[default]
    Permissive,
    Lifecycle,
}

impl TransitionPolicyKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "permissive" => Some(Self::Permissive),
            "lifecycle" | "strict" => Some(Self::Lifecycle),
            _ => None,
        }
    }

    pub fn build(self) -> Arc<dyn StatusTransitionPolicy> {
        match self {
            Self::Permissive => Arc::new(PermissiveTransitions),
            Self::Lifecycle => Arc::new(DocumentedLifecycle),
        }
    }
}
