use super::extractor::ExtractionError;
use super::invoker::InvocationError;
use crate::core::models::ids::{SoluteId, SolventName};
use std::collections::HashMap;
use thiserror::Error;

/// Solvent to solute to value store, filled batch by batch.
///
/// Values stay as the estimator printed them. The table only grows during a run.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    values: HashMap<SolventName, HashMap<SoluteId, String>>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one batch's values; returns how many were recorded.
    pub fn record_batch(
        &mut self,
        solvent: &SolventName,
        values: HashMap<SoluteId, String>,
    ) -> usize {
        let count = values.len();
        self.values
            .entry(solvent.clone())
            .or_default()
            .extend(values);
        count
    }

    pub fn get(&self, solvent: &str, solute: &str) -> Option<&str> {
        self.values
            .get(solvent)
            .and_then(|by_solute| by_solute.get(solute))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Error)]
pub enum BatchErrorKind {
    #[error("{0}")]
    Diagnostics(String),
    #[error(transparent)]
    Invocation(#[from] InvocationError),
    #[error("estimator wrote no output file '{0}'")]
    MissingOutput(String),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// A recovered failure of one solvent's batch.
#[derive(Debug, Error)]
#[error("Error for something(s) dissolved in {solvent}:\n{kind}")]
pub struct BatchError {
    pub solvent: SolventName,
    pub kind: BatchErrorKind,
}

/// Append-only record of batch failures, reported once at the end of a run.
#[derive(Debug, Default)]
pub struct ErrorLog {
    entries: Vec<BatchError>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, solvent: &SolventName, kind: impl Into<BatchErrorKind>) {
        self.entries.push(BatchError {
            solvent: solvent.clone(),
            kind: kind.into(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &BatchError> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_failed(&self, solvent: &str) -> bool {
        self.entries.iter().any(|e| e.solvent.as_str() == solvent)
    }
}
