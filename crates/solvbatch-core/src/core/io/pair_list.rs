use crate::core::io::table::{self, HeaderIndex, TableError};
use crate::core::io::traits::InputFile;
use crate::core::models::request::PairRequest;
use std::io::BufRead;

/// Reader for the ordered solvent/solute request list (CSV with a header row).
///
/// Rows are returned in file order with duplicates preserved; this order is the
/// ordering contract of the final report.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairListFile;

impl InputFile for PairListFile {
    type Output = Vec<PairRequest>;
    type Error = TableError;

    fn read_from(&self, reader: &mut impl BufRead) -> Result<Vec<PairRequest>, TableError> {
        let mut csv_reader = table::reader(reader);
        let index = HeaderIndex::new(csv_reader.headers()?);
        let [solvent_pos, solute_pos] = table::require_columns(&index, ["Solvent", "Solute"])?;

        let mut requests = Vec::new();
        for (i, result) in csv_reader.records().enumerate() {
            let row = i + 1;
            let record = result?;
            let solvent = table::cell(&record, solvent_pos);
            let solute = table::cell(&record, solute_pos);
            for (pos, value) in [(solvent_pos, solvent), (solute_pos, solute)] {
                if value.is_empty() {
                    return Err(TableError::InvalidValue {
                        row,
                        column: index.name(pos).to_string(),
                        value: String::new(),
                    });
                }
            }
            requests.push(PairRequest::new(solvent, solute, row));
        }
        Ok(requests)
    }
}
