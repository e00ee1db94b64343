use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{
    AgreementType, Campaign, CampaignId, ExclusivityGrant, ExclusivityRecord, Territory,
};
use super::repository::{CampaignRepository, ExclusivityRepository, RepositoryError};
use super::status::{
    CampaignStatus, StatusTransitionPolicy, TransitionRejected, UnknownCampaignStatus,
};
use super::wizard::{CampaignDraft, DraftIncomplete};
use crate::audience::parse_list;
use crate::context::{Forbidden, RequestContext, UserId};

/// Admin status change as posted by the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Exclusivity grant as posted by the admin form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExclusivityRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub industry_category: Option<String>,
    #[serde(default)]
    pub territory_type: Option<String>,
    /// A single name, or a list (or comma-separated string) of ZIP codes.
    #[serde(default)]
    pub territory_value: Option<serde_json::Value>,
    #[serde(default)]
    pub agreement_type: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub premium_paid: Option<f64>,
}

/// Campaigns currently moving through print and mail, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct FulfillmentQueue {
    pub stage: String,
    pub campaigns: Vec<Campaign>,
    pub counts: BTreeMap<String, usize>,
}

/// Service behind the admin campaign endpoints.
pub struct CampaignAdminService<C, E> {
    campaigns: Arc<C>,
    exclusivity: Arc<E>,
    policy: Arc<dyn StatusTransitionPolicy>,
}

impl<C, E> CampaignAdminService<C, E>
where
    C: CampaignRepository + 'static,
    E: ExclusivityRepository + 'static,
{
    pub fn new(
        campaigns: Arc<C>,
        exclusivity: Arc<E>,
        policy: Arc<dyn StatusTransitionPolicy>,
    ) -> Self {
        Self {
            campaigns,
            exclusivity,
            policy,
        }
    }

    /// Submit a customer's finished wizard draft for admin review.
    pub fn submit_draft(
        &self,
        context: &RequestContext,
        draft: CampaignDraft,
    ) -> Result<Campaign, CampaignServiceError> {
        let owner = context.user_id.clone().ok_or(Forbidden)?;
        if let Some(step) = draft.first_incomplete() {
            warn!(user_id = %owner.0, step = ?step, "draft submitted before completion");
        }

        let id = self.campaigns.next_id()?;
        let campaign = draft.into_campaign(id, owner, Utc::now())?;
        let stored = self.campaigns.insert(campaign)?;
        info!(
            campaign_id = %stored.id.0,
            user_id = %stored.user_id.0,
            quantity = stored.quantity,
            "campaign submitted"
        );
        Ok(stored)
    }

    /// Move a campaign to a new status, optionally attaching admin notes.
    pub fn update_status(
        &self,
        context: &RequestContext,
        request: StatusUpdateRequest,
    ) -> Result<Campaign, CampaignServiceError> {
        let admin = context.require_admin()?.clone();

        let campaign_id = non_empty(request.campaign_id);
        let status = non_empty(request.status);
        let (Some(campaign_id), Some(status)) = (campaign_id, status) else {
            return Err(CampaignServiceError::MissingFields("Missing fields"));
        };
        let status: CampaignStatus = status.parse()?;
        let campaign_id = CampaignId(campaign_id);

        let mut campaign = self
            .campaigns
            .fetch(&campaign_id)?
            .ok_or(RepositoryError::NotFound)?;

        if let Err(rejected) = self.policy.check(campaign.status, status) {
            warn!(
                campaign_id = %campaign_id.0,
                admin = %admin.0,
                from = %rejected.from,
                to = %rejected.to,
                "campaign status change rejected"
            );
            return Err(rejected.into());
        }

        let previous = campaign.status;
        campaign.status = status;
        if let Some(notes) = non_empty(request.notes) {
            campaign.notes = Some(notes);
        }
        campaign.updated_at = Utc::now();

        self.campaigns.update(campaign.clone())?;
        info!(
            campaign_id = %campaign_id.0,
            admin = %admin.0,
            from = %previous,
            to = %status,
            "campaign status updated"
        );
        Ok(campaign)
    }

    /// Record an exclusivity agreement.
    pub fn create_exclusivity(
        &self,
        context: &RequestContext,
        request: ExclusivityRequest,
    ) -> Result<ExclusivityRecord, CampaignServiceError> {
        context.require_admin()?;

        let missing = || CampaignServiceError::MissingFields("Missing required fields");
        let user_id = non_empty(request.user_id).ok_or_else(missing)?;
        let industry_category = non_empty(request.industry_category).ok_or_else(missing)?;
        let territory_type = non_empty(request.territory_type).ok_or_else(missing)?;
        let territory_value = request
            .territory_value
            .filter(|value| !is_blank(value))
            .ok_or_else(missing)?;
        let agreement_type = non_empty(request.agreement_type).ok_or_else(missing)?;
        let start_date = non_empty(request.start_date).ok_or_else(missing)?;

        let territory = parse_territory(&territory_type, &territory_value)?;
        let agreement_type: AgreementType = agreement_type
            .parse()
            .map_err(CampaignServiceError::InvalidField)?;
        let start_date = parse_date("startDate", &start_date)?;
        let end_date = non_empty(request.end_date)
            .map(|raw| parse_date("endDate", &raw))
            .transpose()?;

        let grant = ExclusivityGrant {
            user_id: UserId(user_id),
            industry_category,
            territory,
            agreement_type,
            start_date,
            end_date,
            premium_paid: request.premium_paid,
        };

        let stored = self.exclusivity.insert(grant)?;
        info!(
            exclusivity_id = %stored.id.0,
            user_id = %stored.user_id.0,
            industry = %stored.industry_category,
            "exclusivity granted"
        );
        Ok(stored)
    }

    /// List campaigns in the fulfillment stages, or a single stage when it names one.
    pub fn fulfillment_queue(
        &self,
        context: &RequestContext,
        stage: Option<&str>,
    ) -> Result<FulfillmentQueue, CampaignServiceError> {
        context.require_admin()?;

        let selected = stage
            .and_then(|raw| raw.parse::<CampaignStatus>().ok())
            .filter(|status| status.is_fulfillment_stage());

        let mut campaigns: Vec<Campaign> = self
            .campaigns
            .list()?
            .into_iter()
            .filter(|campaign| match selected {
                Some(status) => campaign.status == status,
                None => campaign.status.is_fulfillment_stage(),
            })
            .collect();
        campaigns.sort_by(|left, right| right.updated_at.cmp(&left.updated_at));

        let mut counts = BTreeMap::new();
        for campaign in &campaigns {
            *counts
                .entry(campaign.status.as_str().to_string())
                .or_insert(0) += 1;
        }

        Ok(FulfillmentQueue {
            stage: selected
                .map(|status| status.as_str().to_string())
                .unwrap_or_else(|| "all".to_string()),
            campaigns,
            counts,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn is_blank(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(raw) => raw.trim().is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn parse_territory(
    territory_type: &str,
    value: &serde_json::Value,
) -> Result<Territory, CampaignServiceError> {
    let invalid = || {
        CampaignServiceError::InvalidField(format!(
            "invalid territory value for '{territory_type}'"
        ))
    };

    match territory_type {
        "zip_codes" => {
            let zips = match value {
                serde_json::Value::String(raw) => parse_list(raw),
                serde_json::Value::Array(items) => items
                    .iter()
                    .map(|item| item.as_str().map(|zip| zip.trim().to_string()))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(invalid)?,
                _ => return Err(invalid()),
            };
            Ok(Territory::ZipCodes(zips))
        }
        "city" | "county" => {
            let name = value
                .as_str()
                .map(|raw| raw.trim().to_string())
                .ok_or_else(invalid)?;
            if territory_type == "city" {
                Ok(Territory::City(name))
            } else {
                Ok(Territory::County(name))
            }
        }
        other => Err(CampaignServiceError::InvalidField(format!(
            "unknown territory type '{other}'"
        ))),
    }
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, CampaignServiceError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        CampaignServiceError::InvalidField(format!("{field} must be a YYYY-MM-DD date"))
    })
}

/// Error raised by the admin campaign service.
#[derive(Debug, thiserror::Error)]
pub enum CampaignServiceError {
    #[error(transparent)]
    Forbidden(#[from] Forbidden),
    #[error("{0}")]
    MissingFields(&'static str),
    #[error("{0}")]
    InvalidField(String),
    #[error(transparent)]
    UnknownStatus(#[from] UnknownCampaignStatus),
    #[error(transparent)]
    Rejected(#[from] TransitionRejected),
    #[error(transparent)]
    Incomplete(#[from] DraftIncomplete),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
