use super::ids::SolventName;
use std::collections::BTreeMap;
use std::fmt;

/// Abraham solvent coefficient columns, in the order the estimator expects them.
pub const COEFFICIENT_COLUMNS: [&str; 6] = ["c", "e", "s", "a", "b", "l"];

/// A single solvent coefficient.
///
/// The original text is kept so the estimator receives exactly what the
/// database contained; the parsed value is only used for validation and display.
#[derive(Debug, Clone, PartialEq)]
pub struct Coefficient {
    raw: String,
    value: f64,
}

impl Coefficient {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let value: f64 = trimmed.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        Some(Self {
            raw: trimmed.to_string(),
            value,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// The six linear free-energy coefficients `c e s a b l` of one solvent.
#[derive(Debug, Clone, PartialEq)]
pub struct AbrahamCoefficients {
    pub c: Coefficient,
    pub e: Coefficient,
    pub s: Coefficient,
    pub a: Coefficient,
    pub b: Coefficient,
    pub l: Coefficient,
}

impl AbrahamCoefficients {
    /// Coefficients in `COEFFICIENT_COLUMNS` order.
    pub fn ordered(&self) -> [&Coefficient; 6] {
        [&self.c, &self.e, &self.s, &self.a, &self.b, &self.l]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolventRecord {
    pub name: SolventName,
    pub coefficients: AbrahamCoefficients,
    pub extra: BTreeMap<String, String>, // Remaining columns of the row, keyed by header
}

impl SolventRecord {
    /// Header line of the estimator's staging input for this solvent.
    ///
    /// The three spaces before the name are part of the format.
    pub fn parameter_line(&self) -> String {
        let coefficients: Vec<&str> = self
            .coefficients
            .ordered()
            .iter()
            .map(|c| c.raw())
            .collect();
        format!(
            "SolventParameters: {}   {}",
            coefficients.join(" "),
            self.name
        )
    }
}
