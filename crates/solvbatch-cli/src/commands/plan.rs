use crate::cli::PlanArgs;
use crate::config::builder::build_plan_config;
use crate::error::Result;
use solvbatch::engine::planner::BatchPlan;
use solvbatch::workflows::solvate::{self, PipelineInputs};
use tracing::info;

pub async fn run(args: PlanArgs) -> Result<()> {
    let config = build_plan_config(&args.inputs)?;
    let inputs = PipelineInputs::load(&config.inputs, &config.identifier_prefix)?;

    info!("Validating requests against the solvent table and adjacency lists...");
    let plan = solvate::prepare(&inputs)?;

    println!(
        "{} request(s) → {} estimator batch(es):",
        inputs.requests.len(),
        plan.len()
    );
    for line in describe_plan(&plan) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per batch, sorted by solvent name.
fn describe_plan(plan: &BatchPlan) -> Vec<String> {
    let mut groups: Vec<_> = plan.groups().collect();
    groups.sort_by(|a, b| a.solvent.as_str().cmp(b.solvent.as_str()));
    groups
        .into_iter()
        .map(|group| format!("  {:<30} {:>5} solute(s)", group.solvent.as_str(), group.solutes.len()))
        .collect()
}
