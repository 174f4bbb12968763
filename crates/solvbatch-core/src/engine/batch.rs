use super::error::EngineError;
use super::extractor::ResultExtractor;
use super::invoker::Estimator;
use super::planner::BatchGroup;
use super::results::{BatchErrorKind, ErrorLog, ResultTable};
use crate::core::io::adjacency::AdjacencyStore;
use crate::core::io::estimator::EstimatorInput;
use crate::core::models::solvent::SolventRecord;
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcome of one batch, for progress reporting and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BatchOutcome {
    pub resolved: usize,
    pub failed: bool,
}

pub(crate) struct BatchContext<'a> {
    pub estimator: &'a dyn Estimator,
    pub extractor: &'a ResultExtractor,
    pub adjacency: &'a AdjacencyStore,
    pub output_file: &'a str,
}

/// Runs one solvent's batch: stage, invoke, extract.
///
/// Failures are appended to `errors` and never returned; values that could be
/// recovered are still recorded, including when diagnostics were written.
pub(crate) fn run_batch(
    ctx: &BatchContext<'_>,
    solvent: &SolventRecord,
    group: &BatchGroup,
    workdir: &Path,
    results: &mut ResultTable,
    errors: &mut ErrorLog,
) -> Result<BatchOutcome, EngineError> {
    let records = group
        .solutes
        .iter()
        .map(|id| {
            ctx.adjacency.get(id.as_str()).ok_or_else(|| {
                EngineError::Internal(format!(
                    "solute '{}' passed validation but has no adjacency record",
                    id
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let input = EstimatorInput::new(solvent, records);

    info!(
        solvent = %group.solvent,
        solutes = group.solutes.len(),
        "Running estimator"
    );
    let errors_before = errors.len();

    let output = match ctx.estimator.invoke(&input, workdir) {
        Ok(output) => output,
        Err(e) => {
            warn!(solvent = %group.solvent, error = %e, "Estimator invocation failed");
            errors.push(&group.solvent, e);
            return Ok(BatchOutcome {
                resolved: 0,
                failed: true,
            });
        }
    };

    if !output.stdout.trim().is_empty() {
        debug!(
            solvent = %group.solvent,
            stdout = %output.stdout.trim_end(),
            "Estimator console output"
        );
    }

    if output.has_diagnostics() {
        warn!(solvent = %group.solvent, "Estimator wrote to its diagnostic stream");
        errors.push(
            &group.solvent,
            BatchErrorKind::Diagnostics(output.diagnostics.clone()),
        );
    }

    let resolved = match &output.output {
        Some(text) => match ctx.extractor.extract(text, group.solvent.as_str()) {
            Ok(values) => {
                debug!(solvent = %group.solvent, count = values.len(), "Extracted results");
                results.record_batch(&group.solvent, values)
            }
            Err(e) => {
                warn!(solvent = %group.solvent, error = %e, "Could not extract results");
                errors.push(&group.solvent, e);
                0
            }
        },
        None => {
            errors.push(
                &group.solvent,
                BatchErrorKind::MissingOutput(ctx.output_file.to_string()),
            );
            0
        }
    };

    Ok(BatchOutcome {
        resolved,
        failed: errors.len() > errors_before,
    })
}
