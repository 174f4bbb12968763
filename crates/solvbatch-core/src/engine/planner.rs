use crate::core::models::ids::{SoluteId, SolventName};
use crate::core::models::request::PairRequest;
use std::collections::{HashMap, HashSet};

/// The distinct solutes one estimator invocation has to cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchGroup {
    pub solvent: SolventName,
    pub solutes: Vec<SoluteId>, // first-seen order, no repeats
}

/// Requests grouped by solvent.
///
/// Iteration order over the groups is unspecified; only the final assembly walk
/// over the original request list fixes the output order.
#[derive(Debug, Clone, Default)]
pub struct BatchPlan {
    groups: HashMap<SolventName, BatchGroup>,
}

impl BatchPlan {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, solvent: &str) -> Option<&BatchGroup> {
        self.groups.get(solvent)
    }

    pub fn groups(&self) -> impl Iterator<Item = &BatchGroup> {
        self.groups.values()
    }

    /// Number of solute slots across all batches, i.e. estimator workload.
    pub fn total_solutes(&self) -> usize {
        self.groups.values().map(|g| g.solutes.len()).sum()
    }
}

pub fn plan(requests: &[PairRequest]) -> BatchPlan {
    let mut groups: HashMap<SolventName, BatchGroup> = HashMap::new();
    let mut seen: HashMap<SolventName, HashSet<SoluteId>> = HashMap::new();

    for request in requests {
        let group = groups
            .entry(request.solvent.clone())
            .or_insert_with(|| BatchGroup {
                solvent: request.solvent.clone(),
                solutes: Vec::new(),
            });
        if seen
            .entry(request.solvent.clone())
            .or_default()
            .insert(request.solute.clone())
        {
            group.solutes.push(request.solute.clone());
        }
    }

    BatchPlan { groups }
}
