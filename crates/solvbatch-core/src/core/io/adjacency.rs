use crate::core::io::traits::InputFile;
use crate::core::models::adjacency::AdjacencyRecord;
use crate::core::models::ids::SoluteId;
use std::collections::HashMap;
use std::io::{self, BufRead, Read};
use thiserror::Error;

/// Prefix marking the first line of every adjacency record.
pub const DEFAULT_IDENTIFIER_PREFIX: &str = "InChI=";

#[derive(Debug, Error)]
pub enum AdjacencyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed adjacency record on line {line}: {kind}")]
    MalformedRecord {
        line: usize,
        kind: MalformedRecordKind,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedRecordKind {
    #[error("blank line before any identifier line")]
    BlankBeforeIdentifier,
    #[error("content outside of a record (expected a line starting with '{prefix}')")]
    ContentOutsideRecord { prefix: String },
    #[error("identifier '{0}' appears more than once")]
    DuplicateIdentifier(String),
    #[error("record '{0}' is not terminated by a blank line before the next identifier")]
    UnterminatedRecord(String),
}

/// Solute identifier to adjacency record mapping.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyStore {
    records: HashMap<SoluteId, AdjacencyRecord>,
}

impl AdjacencyStore {
    pub fn get(&self, id: &str) -> Option<&AdjacencyRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AdjacencyRecord> {
        self.records.values()
    }
}

/// Reader for the multi-record adjacency list file.
///
/// Each record begins with a line starting with the identifier prefix and ends at
/// the first blank line. All line-ending styles are normalized to `\n` and trailing
/// whitespace is stripped from every line before matching.
#[derive(Debug, Clone)]
pub struct AdjacencyFile {
    prefix: String,
}

impl Default for AdjacencyFile {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_IDENTIFIER_PREFIX)
    }
}

impl AdjacencyFile {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

struct OpenRecord {
    id: SoluteId,
    blob: String,
}

fn malformed(line: usize, kind: MalformedRecordKind) -> AdjacencyError {
    AdjacencyError::MalformedRecord { line, kind }
}

impl InputFile for AdjacencyFile {
    type Output = AdjacencyStore;
    type Error = AdjacencyError;

    fn read_from(&self, reader: &mut impl BufRead) -> Result<AdjacencyStore, AdjacencyError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

        let mut records: HashMap<SoluteId, AdjacencyRecord> = HashMap::new();
        let mut current: Option<OpenRecord> = None;
        let mut seen_identifier = false;

        for (idx, raw_line) in normalized.lines().enumerate() {
            let line_num = idx + 1;
            let line = raw_line.trim_end();

            if line.is_empty() {
                match current.take() {
                    Some(mut open) => {
                        open.blob.push('\n');
                        records.insert(open.id.clone(), AdjacencyRecord::new(open.id, open.blob));
                    }
                    None if !seen_identifier => {
                        return Err(malformed(
                            line_num,
                            MalformedRecordKind::BlankBeforeIdentifier,
                        ));
                    }
                    None => {}
                }
                continue;
            }

            if line.starts_with(&self.prefix) {
                if let Some(open) = &current {
                    return Err(malformed(
                        line_num,
                        MalformedRecordKind::UnterminatedRecord(open.id.to_string()),
                    ));
                }
                let id = SoluteId::new(line.trim());
                if records.contains_key(&id) {
                    return Err(malformed(
                        line_num,
                        MalformedRecordKind::DuplicateIdentifier(id.to_string()),
                    ));
                }
                seen_identifier = true;
                current = Some(OpenRecord {
                    id,
                    blob: format!("{line}\n"),
                });
                continue;
            }

            match current.as_mut() {
                Some(open) => {
                    open.blob.push_str(line);
                    open.blob.push('\n');
                }
                None => {
                    return Err(malformed(
                        line_num,
                        MalformedRecordKind::ContentOutsideRecord {
                            prefix: self.prefix.clone(),
                        },
                    ));
                }
            }
        }

        // End of input closes the last record as if a blank line followed it.
        if let Some(mut open) = current {
            open.blob.push('\n');
            records.insert(open.id.clone(), AdjacencyRecord::new(open.id, open.blob));
        }

        Ok(AdjacencyStore { records })
    }
}
