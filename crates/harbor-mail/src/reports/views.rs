use serde::Serialize;

use crate::campaigns::CampaignStatus;
use crate::context::UserId;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenueEntry {
    /// Month key such as `Mar 2026`.
    pub month: String,
    pub revenue: f64,
    pub revenue_display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCountEntry {
    pub status: CampaignStatus,
    pub status_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRevenueEntry {
    pub user_id: UserId,
    pub name: String,
    pub total: f64,
    pub total_display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountyCoverageEntry {
    pub county: String,
    pub cities: usize,
    pub homeowners: u64,
}

/// Serialized admin dashboard report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminReportSummary {
    pub revenue_by_month: Vec<MonthlyRevenueEntry>,
    pub total_revenue: f64,
    pub total_revenue_display: String,
    pub campaigns_by_status: Vec<StatusCountEntry>,
    pub total_campaigns: usize,
    pub top_customers: Vec<CustomerRevenueEntry>,
    pub coverage_by_county: Vec<CountyCoverageEntry>,
    pub total_homeowners: u64,
}
