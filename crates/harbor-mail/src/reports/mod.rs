//! Admin dashboard reporting over paid orders, campaigns, and coverage.

pub mod router;
mod summary;
pub mod views;

pub use router::{reports_router, ReportError, ReportService};
pub use summary::{AdminReport, CountyTally, TOP_CUSTOMER_LIMIT};
pub use views::AdminReportSummary;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::StatusCode;
    use chrono::{TimeZone, Utc};

    use crate::audience::{CoverageDataset, CoverageState, WaterwayType};
    use crate::campaigns::{
        Campaign, CampaignId, CampaignRepository, CampaignStatus, LedgerRepository,
        MailPieceType, Order, OrderId, OrderStatus, Profile, RepositoryError,
    };
    use crate::context::{RequestContext, Role, UserId};
    use crate::pricing::DesignOption;

    fn coverage() -> CoverageDataset {
        let csv = "county,city,zip_code,homeowner_count\n\
Palm Beach,Jupiter,33458,1850\n\
Palm Beach,Jupiter,33477,1250\n\
Palm Beach,Boca Raton,33432,2100\n\
Broward,Fort Lauderdale,33308,3100\n";
        CoverageDataset::from_reader(csv.as_bytes()).expect("coverage parses")
    }

    fn order(id: &str, user: &str, amount: f64, month: Option<u32>, status: OrderStatus) -> Order {
        Order {
            id: OrderId(id.to_string()),
            user_id: UserId(user.to_string()),
            campaign_id: CampaignId(format!("c-{id}")),
            amount,
            status,
            paid_at: month
                .and_then(|month| Utc.with_ymd_and_hms(2026, month, 12, 9, 0, 0).single()),
        }
    }

    fn profile(id: &str, full_name: Option<&str>, company: Option<&str>) -> Profile {
        Profile {
            id: UserId(id.to_string()),
            full_name: full_name.map(str::to_string),
            company_name: company.map(str::to_string),
            role: Role::Customer,
        }
    }

    fn campaign(id: &str, status: CampaignStatus) -> Campaign {
        let now = Utc::now();
        Campaign {
            id: CampaignId(id.to_string()),
            user_id: UserId("u1".to_string()),
            name: id.to_string(),
            mail_piece_type: MailPieceType::Brochure,
            quantity: 2_000,
            status,
            county: "Broward".to_string(),
            cities: Vec::new(),
            zips: vec!["33308".to_string()],
            waterway: WaterwayType::All,
            design_option: DesignOption::Own,
            mail_date: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn revenue_groups_paid_orders_by_month_in_order() {
        let orders = vec![
            order("o1", "u1", 3_000.0, Some(3), OrderStatus::Paid),
            order("o2", "u2", 1_500.0, Some(1), OrderStatus::Paid),
            order("o3", "u1", 450.0, Some(3), OrderStatus::Paid),
            order("o4", "u2", 9_999.0, Some(2), OrderStatus::Pending),
            order("o5", "u3", 700.0, None, OrderStatus::Paid),
        ];
        let summary = AdminReport::build(&orders, &[], &[], &CoverageDataset::default()).summary();

        let months: Vec<(&str, f64)> = summary
            .revenue_by_month
            .iter()
            .map(|entry| (entry.month.as_str(), entry.revenue))
            .collect();
        assert_eq!(months, vec![("Jan 2026", 1_500.0), ("Mar 2026", 3_450.0)]);
        assert_eq!(summary.total_revenue_display, "$4,950");
    }

    #[test]
    fn top_customers_use_company_then_name_then_unknown() {
        let orders = vec![
            order("o1", "u1", 3_000.0, Some(3), OrderStatus::Paid),
            order("o2", "u2", 4_000.0, Some(3), OrderStatus::Paid),
            order("o3", "u3", 700.0, None, OrderStatus::Paid),
            order("o4", "u4", 100.0, Some(4), OrderStatus::Refunded),
        ];
        let profiles = vec![
            profile("u1", Some("Dana Reyes"), Some("Seawall Pros")),
            profile("u2", Some("Sam Ortiz"), None),
        ];
        let summary = AdminReport::build(&orders, &profiles, &[], &CoverageDataset::default())
            .summary();

        let names: Vec<(&str, f64)> = summary
            .top_customers
            .iter()
            .map(|entry| (entry.name.as_str(), entry.total))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Sam Ortiz", 4_000.0),
                ("Seawall Pros", 3_000.0),
                ("Unknown", 700.0)
            ]
        );
    }

    #[test]
    fn top_customers_are_capped() {
        let orders: Vec<Order> = (0..12u32)
            .map(|idx| {
                order(
                    &format!("o{idx}"),
                    &format!("u{idx}"),
                    100.0 * f64::from(idx + 1),
                    Some(5),
                    OrderStatus::Paid,
                )
            })
            .collect();
        let summary = AdminReport::build(&orders, &[], &[], &CoverageDataset::default()).summary();
        assert_eq!(summary.top_customers.len(), TOP_CUSTOMER_LIMIT);
        assert_eq!(summary.top_customers[0].total, 1_200.0);
    }

    #[test]
    fn campaigns_and_coverage_are_tallied() {
        let campaigns = vec![
            campaign("a", CampaignStatus::Mailed),
            campaign("b", CampaignStatus::Draft),
            campaign("c", CampaignStatus::Mailed),
        ];
        let summary = AdminReport::build(&[], &[], &campaigns, &coverage()).summary();

        let statuses: Vec<(CampaignStatus, usize)> = summary
            .campaigns_by_status
            .iter()
            .map(|entry| (entry.status, entry.count))
            .collect();
        assert_eq!(
            statuses,
            vec![(CampaignStatus::Draft, 1), (CampaignStatus::Mailed, 2)]
        );
        assert_eq!(summary.total_campaigns, 3);

        assert_eq!(summary.coverage_by_county[0].county, "Palm Beach");
        assert_eq!(summary.coverage_by_county[0].cities, 2);
        assert_eq!(summary.coverage_by_county[0].homeowners, 5_200);
        assert_eq!(summary.coverage_by_county[1].county, "Broward");
        assert_eq!(summary.total_homeowners, 8_300);
    }

    #[derive(Default)]
    struct FixedStore {
        campaigns: Mutex<Vec<Campaign>>,
        orders: Vec<Order>,
    }

    impl CampaignRepository for FixedStore {
        fn insert(&self, campaign: Campaign) -> Result<Campaign, RepositoryError> {
            self.campaigns
                .lock()
                .expect("store mutex poisoned")
                .push(campaign.clone());
            Ok(campaign)
        }

        fn update(&self, _campaign: Campaign) -> Result<(), RepositoryError> {
            Ok(())
        }

        fn fetch(&self, _id: &CampaignId) -> Result<Option<Campaign>, RepositoryError> {
            Ok(None)
        }

        fn list(&self) -> Result<Vec<Campaign>, RepositoryError> {
            Ok(self.campaigns.lock().expect("store mutex poisoned").clone())
        }

        fn next_id(&self) -> Result<CampaignId, RepositoryError> {
            let count = self.campaigns.lock().expect("store mutex poisoned").len();
            Ok(CampaignId(format!("cmp-{}", count + 1)))
        }
    }

    impl LedgerRepository for FixedStore {
        fn orders(&self) -> Result<Vec<Order>, RepositoryError> {
            Ok(self.orders.clone())
        }

        fn profiles(&self) -> Result<Vec<Profile>, RepositoryError> {
            Err(RepositoryError::Unavailable("profiles offline".to_string()))
        }
    }

    fn service() -> Arc<ReportService<FixedStore, FixedStore>> {
        let store = Arc::new(FixedStore::default());
        Arc::new(ReportService::new(
            store.clone(),
            store,
            Arc::new(CoverageState::new(coverage())),
        ))
    }

    #[tokio::test]
    async fn report_handler_requires_admin() {
        let response =
            router::report_handler(State(service()), RequestContext::customer("u1")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn report_handler_surfaces_storage_failures() {
        let response =
            router::report_handler(State(service()), RequestContext::admin("admin-1")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
