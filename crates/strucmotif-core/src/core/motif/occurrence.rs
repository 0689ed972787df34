use crate::core::models::ids::IndexSelection;
use serde::{Deserialize, Serialize};

/// A concrete pair of residue positions realizing a descriptor inside one structure.
///
/// Occurrences are stored in the canonical residue-type order of their descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResiduePairOccurrence {
    pub first: IndexSelection,
    pub second: IndexSelection,
}

impl ResiduePairOccurrence {
    pub fn new(first: IndexSelection, second: IndexSelection) -> Self {
        Self { first, second }
    }

    pub fn swapped(&self) -> Self {
        Self {
            first: self.second,
            second: self.first,
        }
    }
}
