use super::config::MissingResultPolicy;
use super::error::EngineError;
use super::results::{ErrorLog, ResultTable};
use crate::core::io::report::ReportRow;
use crate::core::models::ids::{SoluteId, SolventName};
use crate::core::models::request::PairRequest;
use std::fmt;
use tracing::{debug, error};

/// A request whose batch reported no error, yet no value was recovered for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsistencyFault {
    pub row: usize,
    pub solvent: SolventName,
    pub solute: SoluteId,
}

impl fmt::Display for ConsistencyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}: no result for '{}' in '{}'",
            self.row, self.solute, self.solvent
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    pub rows: Vec<ReportRow>,
    pub faults: Vec<ConsistencyFault>,
    pub unresolved: usize, // Requests dropped because their batch failed
}

/// Walks the requests in their original order and looks up each result.
///
/// Requests belonging to a failed batch are left out silently; their failure is
/// already in the error log. Anything else that is missing is a consistency fault,
/// handled according to `policy`.
pub fn assemble(
    requests: &[PairRequest],
    results: &ResultTable,
    errors: &ErrorLog,
    policy: MissingResultPolicy,
) -> Result<Assembly, EngineError> {
    let mut assembly = Assembly::default();

    for request in requests {
        if let Some(value) = results.get(request.solvent.as_str(), request.solute.as_str()) {
            assembly.rows.push(ReportRow {
                solvent: request.solvent.clone(),
                solute: request.solute.clone(),
                log_k: value.to_string(),
            });
            continue;
        }

        if errors.has_failed(request.solvent.as_str()) {
            debug!(row = request.row, solvent = %request.solvent, "Skipping request of failed batch");
            assembly.unresolved += 1;
            continue;
        }

        let fault = ConsistencyFault {
            row: request.row,
            solvent: request.solvent.clone(),
            solute: request.solute.clone(),
        };
        error!("Consistency fault: {}", fault);
        match policy {
            MissingResultPolicy::Abort => return Err(EngineError::MissingResult(fault)),
            MissingResultPolicy::Report => assembly.faults.push(fault),
        }
    }

    Ok(assembly)
}
