use crate::cli::ServeArgs;
use crate::infra::{
    load_coverage, AppState, InMemoryCampaignRepository, InMemoryExclusivityRepository,
    InMemoryLedger,
};
use crate::routes::{with_service_routes, ServiceSet};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use harbor_mail::audience::CoverageState;
use harbor_mail::campaigns::CampaignAdminService;
use harbor_mail::config::AppConfig;
use harbor_mail::error::AppError;
use harbor_mail::fulfillment::FulfillmentService;
use harbor_mail::reports::ReportService;
use harbor_mail::telemetry;
use harbor_mail::users::UserAdminService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let dataset = load_coverage(config.campaigns.coverage_csv.as_deref(), None)?;
    if dataset.is_empty() {
        warn!("no coverage export configured; audience counts will be zero");
    } else {
        info!(
            rows = dataset.records().len(),
            homeowners = dataset.total_homeowners(),
            "coverage loaded"
        );
    }
    let coverage = Arc::new(CoverageState::new(dataset));

    let fulfillment = config.campaigns.fulfillment_provider.build();
    let policy = config.campaigns.transition_policy.build();
    info!(
        provider = fulfillment.name(),
        policy = ?config.campaigns.transition_policy,
        "campaign back office configured"
    );

    let campaigns = Arc::new(InMemoryCampaignRepository::default());
    let ledger = Arc::new(InMemoryLedger::default());
    let services = ServiceSet {
        admin: Arc::new(CampaignAdminService::new(
            campaigns.clone(),
            Arc::new(InMemoryExclusivityRepository::default()),
            policy,
        )),
        fulfillment: Arc::new(FulfillmentService::new(campaigns.clone(), fulfillment)),
        reports: Arc::new(ReportService::new(campaigns, ledger.clone(), coverage.clone())),
        users: Arc::new(UserAdminService::new(ledger)),
    };

    let app = with_service_routes(coverage, services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "harbor mail service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
