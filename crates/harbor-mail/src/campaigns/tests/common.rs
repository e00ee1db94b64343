use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::audience::WaterwayType;
use crate::campaigns::domain::{
    Campaign, CampaignId, ExclusivityGrant, ExclusivityId, ExclusivityRecord, MailPieceType,
};
use crate::campaigns::repository::{CampaignRepository, ExclusivityRepository, RepositoryError};
use crate::campaigns::status::{CampaignStatus, StatusTransitionPolicy, TransitionPolicyKind};
use crate::campaigns::{admin_router, CampaignAdminService};
use crate::context::{RequestContext, UserId};
use crate::pricing::DesignOption;

pub(super) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn campaign(id: &str, status: CampaignStatus, hours_after_base: i64) -> Campaign {
    let updated_at = base_time() + Duration::hours(hours_after_base);
    Campaign {
        id: CampaignId(id.to_string()),
        user_id: UserId("customer-1".to_string()),
        name: format!("Campaign {id}"),
        mail_piece_type: MailPieceType::Postcard6x9,
        quantity: 3_100,
        status,
        county: "Palm Beach".to_string(),
        cities: vec!["Jupiter".to_string()],
        zips: Vec::new(),
        waterway: WaterwayType::All,
        design_option: DesignOption::Template,
        mail_date: None,
        notes: None,
        created_at: base_time(),
        updated_at,
    }
}

pub(super) fn admin() -> RequestContext {
    RequestContext::admin("admin-1")
}

pub(super) fn permissive() -> Arc<dyn StatusTransitionPolicy> {
    TransitionPolicyKind::Permissive.build()
}

pub(super) fn lifecycle() -> Arc<dyn StatusTransitionPolicy> {
    TransitionPolicyKind::Lifecycle.build()
}

pub(super) fn build_service(
    policy: Arc<dyn StatusTransitionPolicy>,
    seed: Vec<Campaign>,
) -> (
    CampaignAdminService<MemoryCampaigns, MemoryExclusivity>,
    Arc<MemoryCampaigns>,
    Arc<MemoryExclusivity>,
) {
    let campaigns = Arc::new(MemoryCampaigns::default());
    for record in seed {
        campaigns.insert(record).expect("seed campaign");
    }
    let exclusivity = Arc::new(MemoryExclusivity::default());
    let service = CampaignAdminService::new(campaigns.clone(), exclusivity.clone(), policy);
    (service, campaigns, exclusivity)
}

pub(super) fn admin_router_with_service(
    service: CampaignAdminService<MemoryCampaigns, MemoryExclusivity>,
) -> axum::Router {
    admin_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryCampaigns {
    pub(super) records: Arc<Mutex<HashMap<CampaignId, Campaign>>>,
}

impl CampaignRepository for MemoryCampaigns {
    fn insert(&self, campaign: Campaign) -> Result<Campaign, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&campaign.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(campaign.id.clone(), campaign.clone());
        Ok(campaign)
    }

    fn update(&self, campaign: Campaign) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(campaign.id.clone(), campaign);
        Ok(())
    }

    fn fetch(&self, id: &CampaignId) -> Result<Option<Campaign>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Campaign>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn next_id(&self) -> Result<CampaignId, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(CampaignId(format!("cmp-{:04}", guard.len() + 1)))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryExclusivity {
    records: Arc<Mutex<Vec<ExclusivityRecord>>>,
}

impl MemoryExclusivity {
    pub(super) fn records(&self) -> Vec<ExclusivityRecord> {
        self.records
            .lock()
            .expect("exclusivity mutex poisoned")
            .clone()
    }
}

impl ExclusivityRepository for MemoryExclusivity {
    fn insert(&self, grant: ExclusivityGrant) -> Result<ExclusivityRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("exclusivity mutex poisoned");
        let record = grant.into_record(ExclusivityId(format!("excl-{}", guard.len() + 1)));
        guard.push(record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<ExclusivityRecord>, RepositoryError> {
        Ok(self.records())
    }
}

pub(super) struct UnavailableCampaigns;

impl CampaignRepository for UnavailableCampaigns {
    fn insert(&self, _campaign: Campaign) -> Result<Campaign, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _campaign: Campaign) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &CampaignId) -> Result<Option<Campaign>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Campaign>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn next_id(&self) -> Result<CampaignId, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
