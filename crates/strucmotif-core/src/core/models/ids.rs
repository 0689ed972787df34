use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a structure in the corpus (e.g., a PDB entry such as `1abc`).
///
/// Identifiers are normalized to lowercase so that lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StructureId(String);

impl StructureId {
    pub fn new(id: &str) -> Self {
        Self(id.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StructureId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Positional reference to a residue inside a structure.
///
/// `assembly_id` names the chain instance (the assembly operator that placed the chain) and
/// `index` is the residue index, unique within one chain instance set of a structure.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct IndexSelection {
    pub assembly_id: u32,
    pub index: usize,
}

impl IndexSelection {
    pub fn new(assembly_id: u32, index: usize) -> Self {
        Self { assembly_id, index }
    }
}

impl fmt::Display for IndexSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.assembly_id, self.index)
    }
}
