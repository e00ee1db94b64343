use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use chrono::Utc;
use serde_json::json;
use tracing::info;

use super::{
    Address, DesignFiles, FulfillmentError, FulfillmentJob, FulfillmentProvider, JobStatus,
    TrackingInfo,
};
use crate::campaigns::Campaign;

/// Records jobs for an admin to hand to the print vendor by hand.
///
/// Status changes are made manually from the fulfillment dashboard, so
/// tracking carries no events.
#[derive(Debug, Default)]
pub struct ManualFulfillment {
    jobs: Mutex<HashMap<String, JobStatus>>,
}

impl ManualFulfillment {
    fn with_jobs<T>(
        &self,
        apply: impl FnOnce(&mut HashMap<String, JobStatus>) -> Result<T, FulfillmentError>,
    ) -> Result<T, FulfillmentError> {
        let mut jobs = self
            .jobs
            .lock()
            .map_err(|_| FulfillmentError::Unavailable("job ledger poisoned".to_string()))?;
        apply(&mut jobs)
    }
}

impl FulfillmentProvider for ManualFulfillment {
    fn name(&self) -> &'static str {
        "manual"
    }

    fn create_mail_job(
        &self,
        campaign: &Campaign,
        mailing_list: &[Address],
        design_files: &DesignFiles,
    ) -> Result<FulfillmentJob, FulfillmentError> {
        let now = Utc::now();
        let id = format!("manual-{}-{}", campaign.id.0, now.timestamp_millis());

        let mut metadata = BTreeMap::new();
        metadata.insert("addressCount".to_string(), json!(mailing_list.len()));
        metadata.insert("designFrontUrl".to_string(), json!(design_files.front_url));
        metadata.insert("designBackUrl".to_string(), json!(design_files.back_url));

        self.with_jobs(|jobs| {
            jobs.insert(id.clone(), JobStatus::Pending);
            Ok(())
        })?;

        info!(
            job_id = %id,
            campaign = %campaign.name,
            addresses = mailing_list.len(),
            design = %design_files.front_url,
            "created manual mail job"
        );

        Ok(FulfillmentJob {
            id,
            campaign_id: campaign.id.clone(),
            provider: self.name().to_string(),
            status: JobStatus::Pending,
            external_id: None,
            created_at: now,
            updated_at: now,
            metadata,
        })
    }

    fn job_status(&self, job_id: &str) -> Result<JobStatus, FulfillmentError> {
        self.with_jobs(|jobs| {
            jobs.get(job_id)
                .copied()
                .ok_or_else(|| FulfillmentError::UnknownJob(job_id.to_string()))
        })
    }

    fn cancel_job(&self, job_id: &str) -> Result<(), FulfillmentError> {
        self.with_jobs(|jobs| match jobs.get_mut(job_id) {
            Some(status) => {
                *status = JobStatus::Cancelled;
                Ok(())
            }
            None => Err(FulfillmentError::UnknownJob(job_id.to_string())),
        })?;
        info!(job_id, "cancelled manual mail job");
        Ok(())
    }

    fn tracking_info(&self, job_id: &str) -> Result<TrackingInfo, FulfillmentError> {
        let status = self.job_status(job_id)?;
        Ok(TrackingInfo {
            status,
            mail_date: None,
            estimated_delivery_date: None,
            delivered_count: None,
            returned_count: None,
            events: Vec::new(),
        })
    }
}
