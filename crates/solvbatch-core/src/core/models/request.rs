use super::ids::{SoluteId, SolventName};

/// One requested (solvent, solute) estimate.
///
/// Duplicates are meaningful: every request yields its own report row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairRequest {
    pub solvent: SolventName,
    pub solute: SoluteId,
    pub row: usize, // 1-based data row in the pair list
}

impl PairRequest {
    pub fn new(solvent: impl Into<SolventName>, solute: impl Into<SoluteId>, row: usize) -> Self {
        Self {
            solvent: solvent.into(),
            solute: solute.into(),
            row,
        }
    }
}
