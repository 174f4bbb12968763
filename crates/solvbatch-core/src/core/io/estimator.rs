use crate::core::models::adjacency::AdjacencyRecord;
use crate::core::models::ids::{SoluteId, SolventName};
use crate::core::models::solvent::SolventRecord;
use std::io::{self, Write};

/// The staging input handed to one estimator invocation.
///
/// Layout: the solvent parameter line, a blank line, then every requested
/// solute's adjacency blob concatenated in batch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimatorInput {
    solvent: SolventName,
    solutes: Vec<SoluteId>,
    text: String,
}

impl EstimatorInput {
    pub fn new<'a>(
        solvent: &SolventRecord,
        solutes: impl IntoIterator<Item = &'a AdjacencyRecord>,
    ) -> Self {
        let mut text = solvent.parameter_line();
        text.push_str("\n\n");
        let mut ids = Vec::new();
        for record in solutes {
            text.push_str(record.blob());
            ids.push(record.id().clone());
        }
        Self {
            solvent: solvent.name.clone(),
            solutes: ids,
            text,
        }
    }

    pub fn solvent(&self) -> &SolventName {
        &self.solvent
    }

    pub fn solutes(&self) -> &[SoluteId] {
        &self.solutes
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_all(self.text.as_bytes())?;
        writer.flush()
    }
}
