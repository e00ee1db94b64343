use crate::infra::{
    load_coverage, parse_date, InMemoryCampaignRepository, InMemoryExclusivityRepository,
    InMemoryLedger, BUNDLED_COVERAGE,
};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use harbor_mail::audience::{
    parse_list, AudienceAggregator, AudienceSelection, AudienceSummary, CoverageState,
    SelectionMode, WaterwayType,
};
use harbor_mail::campaigns::{
    Campaign, CampaignAdminService, CampaignDraft, CampaignId, CampaignRepository,
    ExclusivityRecord, ExclusivityRequest, FulfillmentQueue, MailPieceType, Order, OrderId,
    OrderStatus, Profile, StatusUpdateRequest, TransitionPolicyKind,
};
use harbor_mail::context::{RequestContext, Role, UserId};
use harbor_mail::error::AppError;
use harbor_mail::fulfillment::{Address, DesignFiles, DesignFormat, FulfillmentJob, ProviderKind};
use harbor_mail::pricing::{
    calculate_campaign_cost, format_count, format_usd, CampaignCost, CurrencyPrecision,
    DesignOption, MINIMUM_PIECES,
};
use harbor_mail::reports::{AdminReportSummary, ReportService};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

const DEMO_CUSTOMER: &str = "customer-demo";
const DEMO_ADMIN: &str = "admin-demo";

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Number of mail pieces; negative values quote as zero
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) quantity: i64,
    /// Design option: own, template, or custom
    #[arg(long, default_value = "own")]
    pub(crate) design: DesignOption,
}

#[derive(Args, Debug)]
pub(crate) struct AudienceArgs {
    /// County to target (exact name from the coverage export)
    #[arg(long)]
    pub(crate) county: String,
    /// Comma-separated cities; defaults to every city in the county
    #[arg(long, conflicts_with = "zips")]
    pub(crate) cities: Option<String>,
    /// Comma-separated ZIP codes; switches to ZIP targeting
    #[arg(long)]
    pub(crate) zips: Option<String>,
    /// Waterfront subset applied to city totals
    #[arg(long, default_value = "all")]
    pub(crate) waterway: WaterwayType,
    /// Coverage export to read instead of the bundled one
    #[arg(long)]
    pub(crate) coverage_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Coverage export to read instead of the bundled one
    #[arg(long)]
    pub(crate) coverage_csv: Option<PathBuf>,
    /// County for the demo campaign
    #[arg(long, default_value = "Palm Beach")]
    pub(crate) county: String,
    /// Comma-separated cities mailed by the demo campaign
    #[arg(long, default_value = "Jupiter,Palm Beach Gardens")]
    pub(crate) cities: String,
    /// Design option for the demo campaign
    #[arg(long, default_value = "template")]
    pub(crate) design: DesignOption,
    /// Requested mail date (YYYY-MM-DD). Mails ASAP when omitted.
    #[arg(long, value_parser = parse_date)]
    pub(crate) mail_date: Option<NaiveDate>,
    /// Enforce the documented status lifecycle on admin updates.
    #[arg(long)]
    pub(crate) lifecycle: bool,
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let cost = calculate_campaign_cost(args.quantity, args.design);
    let quantity = args.quantity.max(0) as u64;

    println!(
        "Quote for {} pieces ({})",
        format_count(quantity),
        args.design.label()
    );
    render_cost(&cost);
    if quantity < MINIMUM_PIECES {
        println!(
            "Below the {} piece minimum; this campaign cannot be ordered yet.",
            format_count(MINIMUM_PIECES)
        );
    }
    Ok(())
}

pub(crate) fn run_audience(args: AudienceArgs) -> Result<(), AppError> {
    let dataset = load_coverage(args.coverage_csv.as_deref(), Some(BUNDLED_COVERAGE))?;
    let response = dataset.response();
    let aggregator = AudienceAggregator::new(&response);
    let view = aggregator.county_view(&args.county);

    if view.is_empty() {
        println!("No coverage rows for county '{}'.", args.county);
        return Ok(());
    }

    let selection = match args.zips.as_deref() {
        Some(raw) => {
            let mut selection = AudienceSelection::new(&args.county, SelectionMode::Zip);
            selection.selected_zips.extend(parse_list(raw));
            selection
        }
        None => {
            let mut selection = AudienceSelection::new(&args.county, SelectionMode::City)
                .with_waterway(args.waterway);
            match args.cities.as_deref() {
                Some(raw) => selection.selected_cities.extend(parse_list(raw)),
                None => selection
                    .selected_cities
                    .extend(view.cities.iter().map(|city| city.name.clone())),
            }
            selection
        }
    };

    let summary = aggregator.summarize(&selection);
    println!("Audience for {} County", summary.county);
    match selection.mode {
        SelectionMode::City => {
            println!("Waterway: {}", selection.waterway.label());
            for city in view
                .cities
                .iter()
                .filter(|city| selection.selected_cities.contains(&city.name))
            {
                println!(
                    "  - {}: {} homeowners ({} ZIPs)",
                    city.name,
                    format_count(selection.waterway.apply(city.count)),
                    city.zip_codes.len()
                );
            }
        }
        SelectionMode::Zip => {
            for zip in view
                .zips
                .iter()
                .filter(|zip| selection.selected_zips.contains(&zip.zip_code))
            {
                println!(
                    "  - {} ({}): {} homeowners",
                    zip.zip_code,
                    zip.city,
                    format_count(zip.count)
                );
            }
        }
    }
    render_audience(&summary);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Harbor Mail campaign walkthrough");
    let outcome = walkthrough(args, Utc::now())?;

    println!("\n1. Audience");
    render_audience(&outcome.audience);

    println!("\n2. Quote");
    render_cost(&outcome.cost);

    println!("\n3. Campaign submitted");
    println!(
        "- {} '{}' for {} ({} pieces)",
        outcome.campaign.id.0,
        outcome.campaign.name,
        outcome.campaign.user_id.0,
        format_count(outcome.campaign.quantity)
    );
    match outcome.campaign.mail_date {
        Some(date) => println!("- mail date {date}"),
        None => println!("- mail ASAP"),
    }
    println!(
        "- exclusivity {} for {} ({})",
        outcome.exclusivity.id.0,
        outcome.exclusivity.industry_category,
        outcome.exclusivity.start_date
    );

    println!("\n4. Fulfillment");
    println!(
        "- {} job {} queued ({} addresses)",
        outcome.job.provider,
        outcome.job.id,
        outcome
            .job
            .metadata
            .get("addressCount")
            .and_then(|value| value.as_u64())
            .unwrap_or_default()
    );
    println!("Queue ({}):", outcome.queue.stage);
    for campaign in &outcome.queue.campaigns {
        println!(
            "  - {} [{}] {}",
            campaign.id.0,
            campaign.status.label(),
            campaign.notes.as_deref().unwrap_or("no notes")
        );
    }

    println!("\n5. Admin report");
    render_report(&outcome.report);
    Ok(())
}

/// Everything the walkthrough produced, kept for rendering and inspection.
#[derive(Debug)]
pub(crate) struct DemoOutcome {
    pub(crate) audience: AudienceSummary,
    pub(crate) cost: CampaignCost,
    pub(crate) campaign: Campaign,
    pub(crate) exclusivity: ExclusivityRecord,
    pub(crate) job: FulfillmentJob,
    pub(crate) queue: FulfillmentQueue,
    pub(crate) report: AdminReportSummary,
}

pub(crate) fn walkthrough(args: DemoArgs, now: DateTime<Utc>) -> Result<DemoOutcome, AppError> {
    let DemoArgs {
        coverage_csv,
        county,
        cities,
        design,
        mail_date,
        lifecycle,
    } = args;

    let dataset = load_coverage(coverage_csv.as_deref(), Some(BUNDLED_COVERAGE))?;
    let coverage = Arc::new(CoverageState::new(dataset));

    let mut selection = AudienceSelection::new(county, SelectionMode::City);
    selection.selected_cities.extend(parse_list(&cities));
    let audience = AudienceAggregator::new(coverage.response()).summarize(&selection);

    let mut draft = CampaignDraft {
        name: "Waterfront dock upgrade mailer".to_string(),
        mail_piece_type: Some(MailPieceType::Postcard6x9),
        campaign_goal: "lead_generation".to_string(),
        design_option: design,
        template_id: (design == DesignOption::Template).then(|| "coastal-classic".to_string()),
        mail_date,
        asap: mail_date.is_none(),
        terms_accepted: true,
        ..CampaignDraft::default()
    };
    draft.apply_audience(&selection, audience.total);
    let cost = draft.quote();

    let customer = UserId(DEMO_CUSTOMER.to_string());
    let submitted = draft.into_campaign(
        CampaignId("cmp-demo-0001".to_string()),
        customer.clone(),
        now,
    )?;

    let campaigns = Arc::new(InMemoryCampaignRepository::default());
    let campaign = campaigns.insert(submitted)?;

    let ledger = Arc::new(InMemoryLedger::default());
    ledger.upsert_profile(Profile {
        id: customer.clone(),
        full_name: Some("Dana Reyes".to_string()),
        company_name: Some("Jupiter Dock & Lift".to_string()),
        role: Role::Customer,
    })?;
    ledger.record_order(Order {
        id: OrderId("ord-demo-0001".to_string()),
        user_id: customer.clone(),
        campaign_id: campaign.id.clone(),
        amount: cost.total,
        status: OrderStatus::Paid,
        paid_at: Some(now),
    })?;

    let policy = if lifecycle {
        TransitionPolicyKind::Lifecycle
    } else {
        TransitionPolicyKind::Permissive
    };
    let admin_service = CampaignAdminService::new(
        campaigns.clone(),
        Arc::new(InMemoryExclusivityRepository::default()),
        policy.build(),
    );
    let admin = RequestContext::admin(DEMO_ADMIN);

    let exclusivity = admin_service.create_exclusivity(
        &admin,
        ExclusivityRequest {
            user_id: Some(customer.0.clone()),
            industry_category: Some("marine_construction".to_string()),
            territory_type: Some("city".to_string()),
            territory_value: Some(json!(campaign.cities.first().cloned().unwrap_or_default())),
            agreement_type: Some("annual_commitment".to_string()),
            start_date: Some(now.date_naive().format("%Y-%m-%d").to_string()),
            ..ExclusivityRequest::default()
        },
    )?;

    let approved = admin_service.update_status(
        &admin,
        StatusUpdateRequest {
            campaign_id: Some(campaign.id.0.clone()),
            status: Some("approved".to_string()),
            notes: Some("Proof approved by customer".to_string()),
        },
    )?;

    let provider = ProviderKind::Manual.build();
    let job = provider.create_mail_job(
        &approved,
        &sample_mailing_list(),
        &DesignFiles {
            front_url: format!("https://assets.harbor-mail.test/{}/front.pdf", approved.id.0),
            back_url: format!("https://assets.harbor-mail.test/{}/back.pdf", approved.id.0),
            format: DesignFormat::Pdf,
        },
    )?;

    let campaign = admin_service.update_status(
        &admin,
        StatusUpdateRequest {
            campaign_id: Some(approved.id.0.clone()),
            status: Some("in_production".to_string()),
            notes: Some(format!("Sent to print as {}", job.id)),
        },
    )?;

    let queue = admin_service.fulfillment_queue(&admin, None)?;
    let report = ReportService::new(campaigns, ledger, coverage).admin_report(&admin)?;

    Ok(DemoOutcome {
        audience,
        cost,
        campaign,
        exclusivity,
        job,
        queue,
        report,
    })
}

fn sample_mailing_list() -> Vec<Address> {
    [
        ("Marisol", "Vega", "118 Riverside Dr", "Jupiter", "33458"),
        ("Tom", "Okafor", "402 Lighthouse Cir", "Jupiter", "33477"),
        ("Priya", "Nair", "77 Anchorage Way", "Palm Beach Gardens", "33410"),
    ]
    .into_iter()
    .map(|(first, last, street, city, zip)| Address {
        first_name: first.to_string(),
        last_name: last.to_string(),
        address1: street.to_string(),
        address2: None,
        city: city.to_string(),
        state: "FL".to_string(),
        zip: zip.to_string(),
    })
    .collect()
}

fn render_cost(cost: &CampaignCost) {
    let display = cost.display();
    println!("- subtotal {}", display.subtotal);
    if cost.free_design {
        println!("- design fee waived");
    } else {
        println!("- design fee {}", display.design_fee);
    }
    println!("- total {} ({} per piece)", display.total, display.per_piece);
}

fn render_audience(summary: &AudienceSummary) {
    println!(
        "- {} selected | {} homeowners",
        summary.selected,
        format_count(summary.total)
    );
    if summary.meets_minimum {
        println!(
            "- meets the {} piece minimum",
            format_count(summary.minimum_pieces)
        );
    } else {
        println!(
            "- {} more homeowners needed to reach the {} piece minimum",
            format_count(summary.minimum_pieces.saturating_sub(summary.total)),
            format_count(summary.minimum_pieces)
        );
    }
}

fn render_report(report: &AdminReportSummary) {
    println!(
        "- revenue {} across {} campaigns",
        report.total_revenue_display, report.total_campaigns
    );
    for month in &report.revenue_by_month {
        println!("  - {}: {}", month.month, month.revenue_display);
    }
    for entry in &report.campaigns_by_status {
        println!("  - {}: {}", entry.status_label, entry.count);
    }
    if let Some(top) = report.top_customers.first() {
        println!("- top customer {} ({})", top.name, top.total_display);
    }
    for county in &report.coverage_by_county {
        println!(
            "  - {}: {} cities, {} homeowners",
            county.county,
            county.cities,
            format_count(county.homeowners)
        );
    }
    println!(
        "- {} homeowners in coverage ({} total revenue)",
        format_count(report.total_homeowners),
        format_usd(report.total_revenue, CurrencyPrecision::Cents)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use harbor_mail::campaigns::{CampaignStatus, DraftIncomplete};

    fn demo_args() -> DemoArgs {
        DemoArgs {
            coverage_csv: None,
            county: "Palm Beach".to_string(),
            cities: "Jupiter,Palm Beach Gardens".to_string(),
            design: DesignOption::Template,
            mail_date: None,
            lifecycle: true,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn walkthrough_moves_campaign_into_production() {
        let outcome = walkthrough(demo_args(), fixed_now()).expect("demo succeeds");

        assert_eq!(outcome.audience.total, 5_000);
        assert!(outcome.cost.free_design);
        assert_eq!(outcome.cost.total, 7_500.0);

        assert_eq!(outcome.campaign.status, CampaignStatus::InProduction);
        assert_eq!(outcome.campaign.mail_date, None);
        assert!(outcome
            .campaign
            .notes
            .as_deref()
            .is_some_and(|notes| notes.contains(&outcome.job.id)));
        assert_eq!(outcome.job.provider, "manual");

        assert_eq!(outcome.queue.stage, "all");
        assert_eq!(outcome.queue.campaigns.len(), 1);
        assert_eq!(outcome.queue.counts.get("in_production"), Some(&1));
        assert_eq!(outcome.exclusivity.industry_category, "marine_construction");
    }

    #[test]
    fn walkthrough_reports_paid_order() {
        let outcome = walkthrough(demo_args(), fixed_now()).expect("demo succeeds");

        assert_eq!(outcome.report.total_revenue, 7_500.0);
        assert_eq!(outcome.report.total_campaigns, 1);
        assert_eq!(outcome.report.revenue_by_month.len(), 1);
        assert_eq!(outcome.report.revenue_by_month[0].month, "Mar 2026");
        assert_eq!(outcome.report.top_customers[0].name, "Jupiter Dock & Lift");
        assert_eq!(outcome.report.total_homeowners, 29_610);
    }

    #[test]
    fn small_audience_stops_at_the_wizard() {
        let args = DemoArgs {
            cities: "Lake Worth Beach".to_string(),
            ..demo_args()
        };

        match walkthrough(args, fixed_now()) {
            Err(AppError::Draft(DraftIncomplete::BelowMinimum { count, minimum })) => {
                assert_eq!(count, 540);
                assert_eq!(minimum, MINIMUM_PIECES);
            }
            other => panic!("expected minimum rejection, got {other:?}"),
        }
    }

    #[test]
    fn scheduled_mail_date_is_kept() {
        let date = NaiveDate::from_ymd_opt(2026, 4, 15).expect("valid date");
        let args = DemoArgs {
            mail_date: Some(date),
            ..demo_args()
        };

        let outcome = walkthrough(args, fixed_now()).expect("demo succeeds");
        assert_eq!(outcome.campaign.mail_date, Some(date));
    }
}
