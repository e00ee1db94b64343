use std::sync::Arc;

use axum::http::StatusCode;
use serde::Deserialize;
use tracing::info;

use super::{
    Address, DesignFiles, FulfillmentError, FulfillmentJob, FulfillmentProvider, TrackingInfo,
};
use crate::campaigns::{CampaignId, CampaignRepository, RepositoryError};
use crate::context::{Forbidden, RequestContext};

/// Mail job request posted from the fulfillment dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailJobRequest {
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub mailing_list: Vec<Address>,
    #[serde(default)]
    pub design_files: Option<DesignFiles>,
}

/// Hands approved campaigns to the configured print-and-mail provider.
pub struct FulfillmentService<C> {
    campaigns: Arc<C>,
    provider: Arc<dyn FulfillmentProvider>,
}

impl<C> FulfillmentService<C>
where
    C: CampaignRepository + 'static,
{
    pub fn new(campaigns: Arc<C>, provider: Arc<dyn FulfillmentProvider>) -> Self {
        Self {
            campaigns,
            provider,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn create_job(
        &self,
        context: &RequestContext,
        request: MailJobRequest,
    ) -> Result<FulfillmentJob, FulfillmentServiceError> {
        let admin = context.require_admin()?;
        let campaign_id = request.campaign_id.filter(|value| !value.is_empty());
        let (Some(campaign_id), Some(design_files)) = (campaign_id, request.design_files) else {
            return Err(FulfillmentServiceError::MissingFields);
        };
        if request.mailing_list.is_empty() {
            return Err(FulfillmentServiceError::MissingFields);
        }

        let campaign = self
            .campaigns
            .fetch(&CampaignId(campaign_id))?
            .ok_or(RepositoryError::NotFound)?;
        let job = self
            .provider
            .create_mail_job(&campaign, &request.mailing_list, &design_files)?;
        info!(
            admin_id = %admin.0,
            campaign_id = %campaign.id.0,
            job_id = %job.id,
            provider = %job.provider,
            "mail job created"
        );
        Ok(job)
    }

    pub fn tracking(
        &self,
        context: &RequestContext,
        job_id: &str,
    ) -> Result<TrackingInfo, FulfillmentServiceError> {
        context.require_admin()?;
        Ok(self.provider.tracking_info(job_id)?)
    }

    pub fn cancel(
        &self,
        context: &RequestContext,
        job_id: &str,
    ) -> Result<(), FulfillmentServiceError> {
        let admin = context.require_admin()?;
        self.provider.cancel_job(job_id)?;
        info!(admin_id = %admin.0, job_id, "mail job cancelled");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FulfillmentServiceError {
    #[error(transparent)]
    Forbidden(#[from] Forbidden),
    #[error("Missing fields")]
    MissingFields,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Provider(#[from] FulfillmentError),
}

impl FulfillmentServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::MissingFields => StatusCode::BAD_REQUEST,
            Self::Repository(RepositoryError::NotFound)
            | Self::Provider(FulfillmentError::UnknownJob(_)) => StatusCode::NOT_FOUND,
            Self::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            Self::Repository(RepositoryError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
