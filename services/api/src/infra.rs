use chrono::NaiveDate;
use harbor_mail::audience::{CoverageDataset, CoverageImportError};
use harbor_mail::campaigns::{
    Campaign, CampaignId, CampaignRepository, ExclusivityGrant, ExclusivityId, ExclusivityRecord,
    ExclusivityRepository, LedgerRepository, Order, Profile, ProfileRepository, RepositoryError,
};
use harbor_mail::context::{Role, UserId};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Coverage export shipped with the library crate, used by the CLI when no file is given.
pub(crate) const BUNDLED_COVERAGE: &str =
    include_str!("../../../crates/harbor-mail/coverage_counts.csv");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCampaignRepository {
    records: Arc<Mutex<HashMap<CampaignId, Campaign>>>,
    sequence: Arc<AtomicU64>,
}

impl CampaignRepository for InMemoryCampaignRepository {
    fn insert(&self, campaign: Campaign) -> Result<Campaign, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&campaign.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(campaign.id.clone(), campaign.clone());
        Ok(campaign)
    }

    fn update(&self, campaign: Campaign) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&campaign.id) {
            guard.insert(campaign.id.clone(), campaign);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &CampaignId) -> Result<Option<Campaign>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Campaign>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.values().cloned().collect())
    }

    fn next_id(&self) -> Result<CampaignId, RepositoryError> {
        let next = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(CampaignId(format!("cmp-{next:06}")))
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryExclusivityRepository {
    records: Arc<Mutex<Vec<ExclusivityRecord>>>,
}

impl ExclusivityRepository for InMemoryExclusivityRepository {
    fn insert(&self, grant: ExclusivityGrant) -> Result<ExclusivityRecord, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let id = ExclusivityId(format!("excl-{:06}", guard.len() + 1));
        let record = grant.into_record(id);
        guard.push(record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<ExclusivityRecord>, RepositoryError> {
        Ok(lock(&self.records)?.clone())
    }
}

/// Orders and profiles; populated by the demo, empty when serving.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLedger {
    orders: Arc<Mutex<Vec<Order>>>,
    profiles: Arc<Mutex<Vec<Profile>>>,
}

impl InMemoryLedger {
    pub(crate) fn record_order(&self, order: Order) -> Result<(), RepositoryError> {
        lock(&self.orders)?.push(order);
        Ok(())
    }

    pub(crate) fn upsert_profile(&self, profile: Profile) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.profiles)?;
        guard.retain(|existing| existing.id != profile.id);
        guard.push(profile);
        Ok(())
    }
}

impl LedgerRepository for InMemoryLedger {
    fn orders(&self) -> Result<Vec<Order>, RepositoryError> {
        Ok(lock(&self.orders)?.clone())
    }

    fn profiles(&self) -> Result<Vec<Profile>, RepositoryError> {
        Ok(lock(&self.profiles)?.clone())
    }
}

impl ProfileRepository for InMemoryLedger {
    fn fetch_profile(&self, id: &UserId) -> Result<Option<Profile>, RepositoryError> {
        let guard = lock(&self.profiles)?;
        Ok(guard.iter().find(|profile| &profile.id == id).cloned())
    }

    /// Users sign in through the identity provider, so a role change may be
    /// the first time this store hears of them.
    fn set_role(&self, id: &UserId, role: Role) -> Result<Profile, RepositoryError> {
        let mut guard = lock(&self.profiles)?;
        if let Some(profile) = guard.iter_mut().find(|profile| &profile.id == id) {
            profile.role = role;
            return Ok(profile.clone());
        }
        let profile = Profile {
            id: id.clone(),
            full_name: None,
            company_name: None,
            role,
        };
        guard.push(profile.clone());
        Ok(profile)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|err| format!("invalid date '{raw}' (expected YYYY-MM-DD): {err}"))
}

/// Load coverage from `path`, or fall back to `fallback` when no path is configured.
pub(crate) fn load_coverage(
    path: Option<&Path>,
    fallback: Option<&str>,
) -> Result<CoverageDataset, CoverageImportError> {
    match (path, fallback) {
        (Some(path), _) => CoverageDataset::from_path(path),
        (None, Some(csv)) => CoverageDataset::from_reader(csv.as_bytes()),
        (None, None) => Ok(CoverageDataset::default()),
    }
}
