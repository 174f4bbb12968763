use crate::core::models::ids::{SoluteId, SolventName};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

pub const REPORT_HEADER: [&str; 3] = ["solvent", "solute", "logK"];

/// One resolved request in the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub solvent: SolventName,
    pub solute: SoluteId,
    #[serde(rename = "logK")]
    pub log_k: String,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),
}

/// Writes the report as CSV. The header is always written, even with no rows.
pub fn write_report(rows: &[ReportRow], writer: impl Write) -> Result<(), ReportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(REPORT_HEADER)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_report_to_path<P: AsRef<Path>>(rows: &[ReportRow], path: P) -> Result<(), ReportError> {
    let file = File::create(path)?;
    write_report(rows, BufWriter::new(file))
}
