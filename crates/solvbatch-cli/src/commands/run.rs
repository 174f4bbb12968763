use crate::cli::RunArgs;
use crate::config::builder::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use solvbatch::{
    core::io::report::write_report_to_path,
    engine::{invoker::ProcessEstimator, progress::ProgressReporter},
    workflows::solvate::{self, PipelineInputs, RunReport},
};
use tracing::{info, warn};

pub async fn run(args: RunArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args)?;

    let inputs = PipelineInputs::load(&app.inputs, &app.core_config.identifier_prefix)?;
    let estimator = ProcessEstimator::new(app.core_config.estimator.clone());

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Estimating {} solvent/solute pair(s)...",
        inputs.requests.len()
    );
    info!("Invoking the solvation workflow...");

    let report = tokio::task::block_in_place(|| {
        solvate::run(&inputs, &app.core_config, &estimator, &reporter)
    })?;

    info!("Writing report to {:?}", &app.report_path);
    write_report_to_path(&report.rows, &app.report_path).map_err(|source| CliError::Report {
        path: app.report_path.clone(),
        source,
    })?;

    println!(
        "✓ {} row(s) written to: {}",
        report.rows.len(),
        app.report_path.display()
    );
    if !report.errors.is_empty() || !report.faults.is_empty() {
        warn!(
            "Run finished with {} batch error(s) and {} missing result(s).",
            report.errors.len(),
            report.faults.len()
        );
        for line in summary_lines(&report) {
            eprintln!("{}", line);
        }
    }
    if let Some(dir) = &report.staging_dir {
        println!("  Staging files kept in: {}", dir.display());
    }

    Ok(())
}

fn summary_lines(report: &RunReport) -> Vec<String> {
    let mut lines = Vec::new();
    if !report.errors.is_empty() {
        lines.push(format!(
            "{} of {} batch(es) failed; {} request(s) have no result:",
            report.stats.failed_batches, report.stats.batches, report.unresolved
        ));
        lines.extend(report.errors.iter().map(|e| e.to_string()));
    }
    if !report.faults.is_empty() {
        lines.push(format!(
            "{} request(s) from successful batches are missing from the estimator output:",
            report.faults.len()
        ));
        lines.extend(report.faults.iter().map(|f| format!("  {}", f)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use solvbatch::core::models::ids::{SoluteId, SolventName};
    use solvbatch::engine::assembler::ConsistencyFault;
    use solvbatch::engine::results::{BatchErrorKind, ErrorLog};
    use solvbatch::workflows::solvate::RunStats;

    fn report(errors: ErrorLog, faults: Vec<ConsistencyFault>) -> RunReport {
        RunReport {
            rows: Vec::new(),
            errors,
            faults,
            unresolved: 2,
            stats: RunStats {
                requests: 3,
                batches: 2,
                failed_batches: 1,
                resolved_values: 1,
            },
            staging_dir: None,
        }
    }

    #[test]
    fn clean_run_has_no_summary() {
        assert!(summary_lines(&report(ErrorLog::new(), Vec::new())).is_empty());
    }

    #[test]
    fn summary_names_failed_solvents_and_missing_rows() {
        let mut errors = ErrorLog::new();
        errors.push(
            &SolventName::from("ethanol"),
            BatchErrorKind::Diagnostics("java.lang.NullPointerException".to_string()),
        );
        let faults = vec![ConsistencyFault {
            row: 3,
            solvent: SolventName::from("water"),
            solute: SoluteId::from("InChI=B"),
        }];

        let lines = summary_lines(&report(errors, faults));

        assert_eq!(lines[0], "1 of 2 batch(es) failed; 2 request(s) have no result:");
        assert!(lines[1].starts_with("Error for something(s) dissolved in ethanol:"));
        assert!(lines[1].contains("NullPointerException"));
        assert!(lines[3].contains("row 3"));
        assert!(lines[3].contains("InChI=B"));
    }
}
