use crate::core::utils::identifiers::is_backbone_atom;
use nalgebra::{Matrix4, Point3};
use std::str::FromStr;

/// Classification of an atom within its residue.
///
/// The role decides which atoms take part in an alignment under the
/// [`AtomPairingScheme`](crate::core::align::AtomPairingScheme) in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AtomRole {
    /// Backbone atom (e.g., N, CA, C, O for amino acids; the sugar-phosphate atoms for nucleotides).
    Backbone,
    /// Any atom that is not part of the backbone.
    SideChain,
}

/// An atom with its name and Cartesian coordinates in Angstroms.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The atom name as found in the source structure (e.g., "CA", "NE2", "C4'").
    pub name: String,
    /// The 3D coordinates of the atom.
    pub position: Point3<f64>,
}

impl Atom {
    pub fn new(name: &str, position: Point3<f64>) -> Self {
        Self {
            name: name.trim().to_string(),
            position,
        }
    }

    pub fn role(&self) -> AtomRole {
        if is_backbone_atom(&self.name) {
            AtomRole::Backbone
        } else {
            AtomRole::SideChain
        }
    }

    /// Returns a copy of this atom moved by a homogeneous 4x4 transformation.
    pub fn transformed(&self, transform: &Matrix4<f64>) -> Self {
        Self {
            name: self.name.clone(),
            position: Point3::from_homogeneous(transform * self.position.to_homogeneous())
                .unwrap_or(self.position),
        }
    }
}

impl FromStr for AtomRole {
    type Err = ();

    /// Parses a string into an `AtomRole`.
    ///
    /// Matching is case-insensitive and accepts the usual spellings of "side chain".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "backbone" => Ok(AtomRole::Backbone),
            "sidechain" | "side-chain" | "side_chain" => Ok(AtomRole::SideChain),
            _ => Err(()),
        }
    }
}
