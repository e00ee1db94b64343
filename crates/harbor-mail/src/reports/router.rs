use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::summary::AdminReport;
use super::views::AdminReportSummary;
use crate::audience::CoverageState;
use crate::campaigns::{CampaignRepository, LedgerRepository, RepositoryError};
use crate::context::{Forbidden, RequestContext};

/// Gathers campaigns, billing, and coverage for the admin report.
pub struct ReportService<C, L> {
    campaigns: Arc<C>,
    ledger: Arc<L>,
    coverage: Arc<CoverageState>,
}

impl<C, L> ReportService<C, L>
where
    C: CampaignRepository + 'static,
    L: LedgerRepository + 'static,
{
    pub fn new(campaigns: Arc<C>, ledger: Arc<L>, coverage: Arc<CoverageState>) -> Self {
        Self {
            campaigns,
            ledger,
            coverage,
        }
    }

    pub fn admin_report(
        &self,
        context: &RequestContext,
    ) -> Result<AdminReportSummary, ReportError> {
        context.require_admin()?;

        let orders = self.ledger.orders()?;
        let profiles = self.ledger.profiles()?;
        let campaigns = self.campaigns.list()?;
        let report = AdminReport::build(&orders, &profiles, &campaigns, self.coverage.dataset());
        Ok(report.summary())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Forbidden(#[from] Forbidden),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Router builder exposing the admin report.
pub fn reports_router<C, L>(service: Arc<ReportService<C, L>>) -> Router
where
    C: CampaignRepository + 'static,
    L: LedgerRepository + 'static,
{
    Router::new()
        .route("/api/admin/reports", get(report_handler::<C, L>))
        .with_state(service)
}

pub(crate) async fn report_handler<C, L>(
    State(service): State<Arc<ReportService<C, L>>>,
    context: RequestContext,
) -> Response
where
    C: CampaignRepository + 'static,
    L: LedgerRepository + 'static,
{
    match service.admin_report(&context) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(ReportError::Forbidden(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
