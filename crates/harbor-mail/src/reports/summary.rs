use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};

use super::views::{
    AdminReportSummary, CountyCoverageEntry, CustomerRevenueEntry, MonthlyRevenueEntry,
    StatusCountEntry,
};
use crate::audience::CoverageDataset;
use crate::campaigns::{Campaign, CampaignStatus, Order, OrderStatus, Profile};
use crate::context::UserId;
use crate::pricing::{format_usd, CurrencyPrecision};

/// Number of customers listed in the revenue leaderboard.
pub const TOP_CUSTOMER_LIMIT: usize = 10;

#[derive(Debug, Default, Clone)]
pub struct CountyTally {
    pub cities: BTreeSet<String>,
    pub homeowners: u64,
}

#[derive(Debug, Default)]
pub struct AdminReport {
    /// Paid revenue keyed by `(year, month)`.
    pub revenue_by_month: BTreeMap<(i32, u32), f64>,
    pub campaigns_by_status: HashMap<CampaignStatus, usize>,
    pub customer_revenue: HashMap<UserId, (String, f64)>,
    pub coverage_by_county: BTreeMap<String, CountyTally>,
}

impl AdminReport {
    pub fn build(
        orders: &[Order],
        profiles: &[Profile],
        campaigns: &[Campaign],
        coverage: &CoverageDataset,
    ) -> Self {
        let mut report = Self::default();
        let names: HashMap<&UserId, &str> = profiles
            .iter()
            .map(|profile| (&profile.id, profile.display_name()))
            .collect();

        for order in orders.iter().filter(|order| order.status == OrderStatus::Paid) {
            let entry = report
                .customer_revenue
                .entry(order.user_id.clone())
                .or_insert_with(|| {
                    let name = names.get(&order.user_id).copied().unwrap_or("Unknown");
                    (name.to_string(), 0.0)
                });
            entry.1 += order.amount;

            // Orders flagged paid without a timestamp count toward customers only.
            if let Some(paid_at) = order.paid_at {
                *report
                    .revenue_by_month
                    .entry((paid_at.year(), paid_at.month()))
                    .or_insert(0.0) += order.amount;
            }
        }

        for campaign in campaigns {
            *report.campaigns_by_status.entry(campaign.status).or_insert(0) += 1;
        }

        for record in coverage.records() {
            let tally = report
                .coverage_by_county
                .entry(record.county.clone())
                .or_default();
            tally.cities.insert(record.city.clone());
            tally.homeowners += record.homeowner_count;
        }

        report
    }

    pub fn summary(&self) -> AdminReportSummary {
        let revenue_by_month: Vec<MonthlyRevenueEntry> = self
            .revenue_by_month
            .iter()
            .map(|(&(year, month), &revenue)| MonthlyRevenueEntry {
                month: month_key(year, month),
                revenue,
                revenue_display: format_usd(revenue, CurrencyPrecision::Whole),
            })
            .collect();
        let total_revenue: f64 = self.revenue_by_month.values().sum();

        let campaigns_by_status: Vec<StatusCountEntry> = CampaignStatus::ordered()
            .into_iter()
            .filter_map(|status| {
                self.campaigns_by_status
                    .get(&status)
                    .map(|&count| StatusCountEntry {
                        status,
                        status_label: status.label(),
                        count,
                    })
            })
            .collect();
        let total_campaigns = campaigns_by_status.iter().map(|entry| entry.count).sum();

        let mut top_customers: Vec<CustomerRevenueEntry> = self
            .customer_revenue
            .iter()
            .map(|(user_id, (name, total))| CustomerRevenueEntry {
                user_id: user_id.clone(),
                name: name.clone(),
                total: *total,
                total_display: format_usd(*total, CurrencyPrecision::Whole),
            })
            .collect();
        top_customers.sort_by(|left, right| {
            right
                .total
                .total_cmp(&left.total)
                .then_with(|| left.name.cmp(&right.name))
        });
        top_customers.truncate(TOP_CUSTOMER_LIMIT);

        let mut coverage_by_county: Vec<CountyCoverageEntry> = self
            .coverage_by_county
            .iter()
            .map(|(county, tally)| CountyCoverageEntry {
                county: county.clone(),
                cities: tally.cities.len(),
                homeowners: tally.homeowners,
            })
            .collect();
        coverage_by_county.sort_by(|left, right| right.homeowners.cmp(&left.homeowners));
        let total_homeowners = coverage_by_county
            .iter()
            .map(|entry| entry.homeowners)
            .sum();

        AdminReportSummary {
            revenue_by_month,
            total_revenue,
            total_revenue_display: format_usd(total_revenue, CurrencyPrecision::Whole),
            campaigns_by_status,
            total_campaigns,
            top_customers,
            coverage_by_county,
            total_homeowners,
        }
    }
}

fn month_key(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|date| date.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{month:02}/{year}"))
}
