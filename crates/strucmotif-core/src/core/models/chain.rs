use super::residue::Residue;
use nalgebra::Matrix4;

/// One chain instance of a structure.
///
/// A chain carries the assembly operator that placed it; residue coordinates are stored already
/// transformed by that operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub id: String,              // Chain identifier (e.g., "A", "B")
    pub assembly_id: u32,        // Identifier of the assembly operator instance
    pub transform: Matrix4<f64>, // Assembly operator applied to the residues
    residues: Vec<Residue>,      // Residues in sequence order
}

impl Chain {
    pub fn new(id: &str, assembly_id: u32, residues: Vec<Residue>, transform: Matrix4<f64>) -> Self {
        let residues = if transform == Matrix4::identity() {
            residues
        } else {
            residues.iter().map(|r| r.transformed(&transform)).collect()
        };
        Self {
            id: id.to_string(),
            assembly_id,
            transform,
            residues,
        }
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    /// Same chain instance holding a different (already transformed) residue subset.
    pub(crate) fn with_residues(&self, residues: Vec<Residue>) -> Self {
        Self {
            id: self.id.clone(),
            assembly_id: self.assembly_id,
            transform: self.transform,
            residues,
        }
    }
}
