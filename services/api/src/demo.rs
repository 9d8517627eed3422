use crate::infra::build_services;
use chrono::Utc;
use claim_pipeline::config::parse_flow;
use claim_pipeline::error::AppError;
use claim_pipeline::workflows::appeals::{AppealDraft, AppealKind, ReconsiderationDraft};
use claim_pipeline::workflows::claims::{
    default_flow, ActionRequest, Application, ApplicationDraft,
};
use claim_pipeline::workflows::query::StatsOverview;
use clap::Args;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Claimant recorded on the demo application
    #[arg(long, default_value = "A")]
    pub(crate) claimant: String,
    /// Claimed area in hectares
    #[arg(long, default_value_t = 5.0)]
    pub(crate) area_ha: f64,
    /// Comma separated reviewing organizations (defaults to the four-stage flow)
    #[arg(long)]
    pub(crate) flow: Option<String>,
    /// Organization the appeal is addressed to
    #[arg(long, default_value = "DLC")]
    pub(crate) appeal_to: String,
    /// Print the final application as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let flow = match args.flow.as_deref() {
        Some(raw) => parse_flow(raw)?,
        None => default_flow(),
    };
    let (claims, appeals) = build_services(flow.clone());

    println!("Claim pipeline demo");
    println!("Flow: {}", flow.join(" -> "));

    let application = claims.submit(ApplicationDraft::new(args.claimant.clone(), args.area_ha))?;
    print_state("Submitted", &application);

    let first = &flow[0];
    let updated = claims.act(application.id(), decision("approve", first, None))?;
    print_state(&format!("Approved by {first}"), &updated);

    let Some(second) = flow.get(1) else {
        println!("Single-stage flow; skipping the appeal walkthrough");
        return Ok(());
    };
    let updated = claims.act(
        application.id(),
        decision("reject", second, Some("Boundary survey incomplete")),
    )?;
    print_state(&format!("Rejected by {second}"), &updated);

    let appeal = appeals.create(AppealDraft {
        app_id: Some(application.id().clone()),
        raised_by: args.claimant.clone(),
        raised_org: None,
        target_org: Some(args.appeal_to.clone()),
        kind: Some(AppealKind::Appeal),
        message: "Survey records attached; please reconsider".to_string(),
        purpose: None,
    })?;
    println!(
        "\nAppeal {} raised to {} ({} replies)",
        appeal.id,
        args.appeal_to,
        appeal.replies.len()
    );

    let appeal = appeals.reconsider(
        &appeal.id,
        ReconsiderationDraft {
            by: format!("{} officer", args.appeal_to),
            org: Some(args.appeal_to.clone()),
            message: None,
        },
    )?;
    if let Some(reply) = appeal.replies.last() {
        println!("  Reply from {}: {}", reply.by, reply.message);
    }

    let reopened = claims.get(application.id())?;
    print_state("Reopened", &reopened);

    let mut latest = reopened;
    for org in &flow[latest.current_stage_index()..] {
        latest = claims.act(application.id(), decision("approve", org, None))?;
    }
    print_state("Fully approved", &latest);

    let overview = StatsOverview::from_applications(&claims.list()?, Utc::now());
    println!(
        "\nTotals: {} claims, {} approved, {} pending, {} rejected, {:.2} ha",
        overview.total_claims,
        overview.approved_claims,
        overview.pending_claims,
        overview.rejected_claims,
        overview.total_area_ha
    );

    if args.json {
        match serde_json::to_string_pretty(&latest.view()) {
            Ok(json) => println!("\n{json}"),
            Err(err) => println!("\nApplication payload unavailable: {err}"),
        }
    }

    Ok(())
}

fn decision(action: &str, organization: &str, reason: Option<&str>) -> ActionRequest {
    ActionRequest {
        action: action.to_string(),
        organization: Some(organization.to_string()),
        signer: Some(format!("{organization} officer")),
        reason: reason.map(str::to_string),
    }
}

fn print_state(label: &str, application: &Application) {
    println!(
        "\n{label}: {} [{}] stage {}/{} canceled={}",
        application.id(),
        application.state().label(),
        application.current_stage_index(),
        application.stages().len(),
        application.is_canceled()
    );
    for stage in application.stages() {
        match &stage.reason {
            Some(reason) => println!(
                "  {:<12} {:<8} {}",
                stage.organization,
                stage.status.label(),
                reason
            ),
            None => println!("  {:<12} {}", stage.organization, stage.status.label()),
        }
    }
}
