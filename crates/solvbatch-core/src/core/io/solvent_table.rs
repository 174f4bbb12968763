use crate::core::io::table::{self, HeaderIndex, TableError};
use crate::core::io::traits::InputFile;
use crate::core::models::ids::SolventName;
use crate::core::models::solvent::{AbrahamCoefficients, COEFFICIENT_COLUMNS, Coefficient, SolventRecord};
use phf::{Set, phf_set};
use std::collections::{BTreeMap, HashMap};
use std::io::BufRead;

/// Accepted spellings of the solvent name column, lowercase.
static NAME_COLUMN_ALIASES: Set<&'static str> = phf_set! {
    "solvents", "solvent", "name", "solvent name",
};

/// Solvent name to parameter record mapping.
#[derive(Debug, Clone, Default)]
pub struct SolventTable {
    records: HashMap<SolventName, SolventRecord>,
}

impl SolventTable {
    pub fn get(&self, name: &str) -> Option<&SolventRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SolventRecord> {
        self.records.values()
    }
}

/// Reader for the solvent parameter database (CSV with a header row).
#[derive(Debug, Clone, Copy, Default)]
pub struct SolventTableFile;

impl InputFile for SolventTableFile {
    type Output = SolventTable;
    type Error = TableError;

    fn read_from(&self, reader: &mut impl BufRead) -> Result<SolventTable, TableError> {
        let mut csv_reader = table::reader(reader);
        let index = HeaderIndex::new(csv_reader.headers()?);

        let name_pos = index.position_of_any(&NAME_COLUMN_ALIASES);
        let coeff_pos = table::require_columns(&index, COEFFICIENT_COLUMNS);
        let (name_pos, coeff_pos) = match (name_pos, coeff_pos) {
            (Some(n), Ok(c)) => (n, c),
            (n, c) => {
                let mut missing = Vec::new();
                if n.is_none() {
                    missing.push("Solvents".to_string());
                }
                if let Err(TableError::SchemaViolation { missing: m }) = c {
                    missing.extend(m);
                }
                return Err(TableError::SchemaViolation { missing });
            }
        };

        let mut records = HashMap::new();
        for (i, result) in csv_reader.records().enumerate() {
            let row = i + 1;
            let record = result?;

            let name = table::cell(&record, name_pos);
            if name.is_empty() {
                return Err(TableError::InvalidValue {
                    row,
                    column: index.name(name_pos).to_string(),
                    value: String::new(),
                });
            }

            let coefficient = |pos: usize| -> Result<Coefficient, TableError> {
                let raw = table::cell(&record, pos);
                Coefficient::parse(raw).ok_or_else(|| TableError::InvalidValue {
                    row,
                    column: index.name(pos).to_string(),
                    value: raw.to_string(),
                })
            };
            let [c_pos, e_pos, s_pos, a_pos, b_pos, l_pos] = coeff_pos;
            let coefficients = AbrahamCoefficients {
                c: coefficient(c_pos)?,
                e: coefficient(e_pos)?,
                s: coefficient(s_pos)?,
                a: coefficient(a_pos)?,
                b: coefficient(b_pos)?,
                l: coefficient(l_pos)?,
            };

            let extra: BTreeMap<String, String> = (0..index.len())
                .filter(|pos| *pos != name_pos && !coeff_pos.contains(pos))
                .map(|pos| (index.name(pos).to_string(), table::cell(&record, pos).to_string()))
                .collect();

            let name = SolventName::new(name);
            if records.contains_key(&name) {
                return Err(TableError::DuplicateKey {
                    key: name.to_string(),
                    row,
                });
            }
            records.insert(
                name.clone(),
                SolventRecord {
                    name,
                    coefficients,
                    extra,
                },
            );
        }

        Ok(SolventTable { records })
    }
}
