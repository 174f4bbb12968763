use crate::core::models::ids::SoluteId;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::warn;

static SOLVENT_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Solvent:\s+(?P<solvent>.*)").expect("solvent header regex is valid"));

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("output does not start with a 'Solvent: <name>' line")]
    MissingSolventHeader,
    #[error("output is for solvent '{declared}', expected '{expected}'")]
    SolventMismatch { declared: String, expected: String },
}

/// Scrapes `<identifier> <value>` pairs out of the estimator's output file.
///
/// The format is not a strict grammar: after the solvent header, every
/// occurrence of an identifier token followed by a value token is taken.
#[derive(Debug, Clone)]
pub struct ResultExtractor {
    entry: Regex,
}

impl ResultExtractor {
    pub fn new(identifier_prefix: &str) -> Self {
        let pattern = format!(
            r"(?P<solute>{}\S+)\s+(?P<value>\S+)",
            regex::escape(identifier_prefix)
        );
        Self {
            entry: Regex::new(&pattern).expect("escaped prefix forms a valid pattern"),
        }
    }

    pub fn extract(
        &self,
        output: &str,
        expected_solvent: &str,
    ) -> Result<HashMap<SoluteId, String>, ExtractionError> {
        let normalized = output.replace("\r\n", "\n").replace('\r', "\n");
        let mut lines = normalized.split_inclusive('\n');

        let header = lines
            .by_ref()
            .find(|line| !line.trim().is_empty())
            .ok_or(ExtractionError::MissingSolventHeader)?;
        let declared = SOLVENT_HEADER
            .captures(header)
            .and_then(|caps| caps.name("solvent"))
            .map(|m| m.as_str().trim())
            .ok_or(ExtractionError::MissingSolventHeader)?;
        check_solvent(declared, expected_solvent)?;

        let rest: String = lines.collect();
        let values = self
            .entry
            .captures_iter(&rest)
            .map(|caps| (SoluteId::new(&caps["solute"]), caps["value"].to_string()))
            .collect();
        Ok(values)
    }
}

/// The estimator truncates long solvent names (e.g. "dibutyl ether" comes back as
/// "dibutyl"), so the declared name only has to be a prefix of the expected one.
fn check_solvent(declared: &str, expected: &str) -> Result<(), ExtractionError> {
    let expected = expected.trim();
    if declared.is_empty() {
        warn!(expected, "Estimator output names no solvent; accepting it");
        Ok(())
    } else if expected.starts_with(declared) {
        Ok(())
    } else {
        Err(ExtractionError::SolventMismatch {
            declared: declared.to_string(),
            expected: expected.to_string(),
        })
    }
}
