use csv::StringRecord;
use std::io::{self, Read};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Header is missing required column(s): {}", missing.join(", "))]
    SchemaViolation { missing: Vec<String> },
    #[error("Duplicate key '{key}' on data row {row}")]
    DuplicateKey { key: String, row: usize },
    #[error("Invalid value '{value}' in column '{column}' on data row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}

pub(crate) fn reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source)
}

/// Case-insensitive lookup of column positions in a header row.
pub(crate) struct HeaderIndex {
    original: Vec<String>,
    folded: Vec<String>,
}

impl HeaderIndex {
    pub fn new(headers: &StringRecord) -> Self {
        let original: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
        let folded = original.iter().map(|h| h.to_lowercase()).collect();
        Self { original, folded }
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        let folded = column.to_lowercase();
        self.folded.iter().position(|h| *h == folded)
    }

    /// Position of the first header contained in `aliases` (which must be lowercase).
    pub fn position_of_any(&self, aliases: &phf::Set<&'static str>) -> Option<usize> {
        self.folded.iter().position(|h| aliases.contains(h.as_str()))
    }

    pub fn name(&self, idx: usize) -> &str {
        &self.original[idx]
    }

    pub fn len(&self) -> usize {
        self.original.len()
    }
}

/// Resolves every required column, failing with all of the missing ones at once.
pub(crate) fn require_columns<const N: usize>(
    index: &HeaderIndex,
    required: [&str; N],
) -> Result<[usize; N], TableError> {
    let mut positions = [0usize; N];
    let mut missing = Vec::new();
    for (slot, column) in positions.iter_mut().zip(required) {
        match index.position(column) {
            Some(pos) => *slot = pos,
            None => missing.push(column.to_string()),
        }
    }
    if missing.is_empty() {
        Ok(positions)
    } else {
        Err(TableError::SchemaViolation { missing })
    }
}

pub(crate) fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}
