use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use super::assembler::ConsistencyFault;
use super::config::ConfigError;
use crate::core::io::adjacency::AdjacencyError;
use crate::core::io::table::TableError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Solvent,
    Solute,
}

/// A name used by the pair list that the solvent table or adjacency store lacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownReference {
    pub kind: ReferenceKind,
    pub name: String,
    pub first_row: usize,
    pub occurrences: usize,
}

impl fmt::Display for UnknownReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ReferenceKind::Solvent => "solvent",
            ReferenceKind::Solute => "solute",
        };
        write!(
            f,
            "unknown {} '{}' (first on row {}, {} request(s))",
            kind, self.name, self.first_row, self.occurrences
        )
    }
}

fn join_references(unknown: &[UnknownReference]) -> String {
    unknown
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that end a run. Per-batch failures are not errors at this level; they
/// are collected in [`ErrorLog`](super::results::ErrorLog).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to read adjacency lists from '{}': {source}", path.display())]
    AdjacencyLoad {
        path: PathBuf,
        #[source]
        source: AdjacencyError,
    },

    #[error("Failed to read {kind} from '{}': {source}", path.display())]
    TableLoad {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: TableError,
    },

    #[error("{} request reference(s) cannot be resolved: {}", unknown.len(), join_references(unknown))]
    UnresolvedReferences { unknown: Vec<UnknownReference> },

    #[error("Failed to prepare staging area '{}': {source}", path.display())]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Result missing for a batch that reported no error: {0}")]
    MissingResult(ConsistencyFault),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal logic error: {0}")]
    Internal(String),
}
