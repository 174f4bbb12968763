use super::ids::SoluteId;

/// A solute's adjacency list exactly as it will be handed to the estimator.
///
/// The blob starts with the identifier line and ends with the blank line that
/// closed the record; every line is terminated by `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyRecord {
    id: SoluteId,
    blob: String,
}

impl AdjacencyRecord {
    pub(crate) fn new(id: SoluteId, blob: String) -> Self {
        Self { id, blob }
    }

    pub fn id(&self) -> &SoluteId {
        &self.id
    }

    pub fn blob(&self) -> &str {
        &self.blob
    }

    /// Number of lines in the blob, including the identifier and terminator lines.
    pub fn line_count(&self) -> usize {
        self.blob.lines().count()
    }
}
