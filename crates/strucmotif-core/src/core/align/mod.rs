//! Optimal rigid superposition of two residue lists.
//!
//! [`align`] pairs the atoms of corresponding residues according to an
//! [`AtomPairingScheme`], moves the reference onto the candidate with the quaternion method,
//! and reports the resulting [`Transformation`] together with the RMSD.

pub mod transformation;
mod superposition;

use crate::core::models::atom::AtomRole;
use crate::core::models::residue::Residue;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use transformation::Transformation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AtomPairingScheme {
    All,
    Backbone,
    #[default]
    SideChain,
}

impl FromStr for AtomPairingScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "all" => Ok(Self::All),
            "backbone" => Ok(Self::Backbone),
            "side_chain" | "sidechain" => Ok(Self::SideChain),
            _ => Err(format!("Invalid atom pairing scheme: '{}'", s)),
        }
    }
}

impl fmt::Display for AtomPairingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "ALL"),
            Self::Backbone => write!(f, "BACKBONE"),
            Self::SideChain => write!(f, "SIDE_CHAIN"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AlignmentError {
    #[error("Cannot align {reference} reference residues with {candidate} candidate residues")]
    LengthMismatch { reference: usize, candidate: usize },

    #[error("No paired atoms available for superposition")]
    InsufficientAtoms,

    #[error("Superposition did not yield a finite rotation")]
    NumericFailure,
}

/// Outcome of superposing a reference residue list onto a candidate.
#[derive(Debug, Clone)]
pub struct AlignmentResult {
    pub original_reference: Vec<Residue>,
    pub original_candidate: Vec<Residue>,
    /// Moves the reference onto the candidate.
    pub transformation: Transformation,
    pub rmsd: f64,
}

impl AlignmentResult {
    /// The reference residues expressed in the candidate's frame.
    pub fn aligned_reference(&self) -> Vec<Residue> {
        self.original_reference
            .iter()
            .map(|r| self.transformation.transform_residue(r))
            .collect()
    }
}

/// Collects the paired point clouds of two residues under `scheme`.
///
/// Atoms are matched by name and anything present on only one side is dropped. The side-chain
/// scheme pairs the single representative point of each residue regardless of residue type, so
/// that exchanged residue types can still be superposed.
fn paired_points(
    reference: &Residue,
    candidate: &Residue,
    scheme: AtomPairingScheme,
    reference_points: &mut Vec<Point3<f64>>,
    candidate_points: &mut Vec<Point3<f64>>,
) {
    match scheme {
        AtomPairingScheme::SideChain => {
            if let (Ok(r), Ok(c)) = (reference.side_chain_point(), candidate.side_chain_point()) {
                reference_points.push(r);
                candidate_points.push(c);
            }
        }
        AtomPairingScheme::All | AtomPairingScheme::Backbone => {
            for atom in reference.atoms() {
                if scheme == AtomPairingScheme::Backbone && atom.role() != AtomRole::Backbone {
                    continue;
                }
                if let Some(other) = candidate.atom(&atom.name) {
                    reference_points.push(atom.position);
                    candidate_points.push(other.position);
                }
            }
        }
    }
}

/// Superposes `reference` onto `candidate`, residue by residue.
pub fn align(
    reference: &[Residue],
    candidate: &[Residue],
    scheme: AtomPairingScheme,
) -> Result<AlignmentResult, AlignmentError> {
    if reference.len() != candidate.len() {
        return Err(AlignmentError::LengthMismatch {
            reference: reference.len(),
            candidate: candidate.len(),
        });
    }

    let mut reference_points = Vec::new();
    let mut candidate_points = Vec::new();
    for (r, c) in reference.iter().zip(candidate) {
        paired_points(r, c, scheme, &mut reference_points, &mut candidate_points);
    }
    if reference_points.is_empty() {
        return Err(AlignmentError::InsufficientAtoms);
    }

    let fit = superposition::superpose(&reference_points, &candidate_points)
        .ok_or(AlignmentError::NumericFailure)?;

    Ok(AlignmentResult {
        original_reference: reference.to_vec(),
        original_candidate: candidate.to_vec(),
        transformation: fit.transformation,
        rmsd: fit.rmsd,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::residue::{ResidueIdentifier, ResidueType};
    use nalgebra::{Rotation3, Vector3};

    fn residue(residue_type: ResidueType, index: usize, atoms: &[(&str, [f64; 3])]) -> Residue {
        Residue::new(
            ResidueIdentifier {
                residue_type,
                seq_id: index as i32 + 1,
                index,
            },
            atoms
                .iter()
                .map(|(n, p)| Atom::new(n, Point3::new(p[0], p[1], p[2])))
                .collect(),
        )
    }

    fn motif() -> Vec<Residue> {
        vec![
            residue(
                ResidueType::Serine,
                0,
                &[
                    ("N", [0.0, 0.0, 0.0]),
                    ("CA", [1.4, 0.3, 0.0]),
                    ("C", [2.1, -0.9, 0.5]),
                    ("OG", [1.9, 1.6, -0.7]),
                ],
            ),
            residue(
                ResidueType::Histidine,
                1,
                &[
                    ("N", [5.0, 2.0, 1.0]),
                    ("CA", [6.1, 2.8, 1.4]),
                    ("C", [7.3, 2.1, 2.0]),
                    ("NE2", [5.2, 5.9, 0.2]),
                ],
            ),
            residue(
                ResidueType::AsparticAcid,
                2,
                &[
                    ("N", [3.0, 6.5, 4.0]),
                    ("CA", [2.2, 7.4, 4.9]),
                    ("C", [1.0, 6.8, 5.5]),
                    ("CG", [3.1, 8.9, 5.6]),
                ],
            ),
        ]
    }

    fn moved(residues: &[Residue], t: &Transformation) -> Vec<Residue> {
        residues.iter().map(|r| t.transform_residue(r)).collect()
    }

    fn rigid_motion() -> Transformation {
        let rotation = Rotation3::from_euler_angles(1.2, 0.3, -0.8).into_inner();
        Transformation::from_parts(rotation, Vector3::new(-4.0, 10.0, 2.5))
    }

    #[test]
    fn identical_inputs_give_zero_rmsd_for_every_scheme() {
        for scheme in [
            AtomPairingScheme::All,
            AtomPairingScheme::Backbone,
            AtomPairingScheme::SideChain,
        ] {
            let result = align(&motif(), &motif(), scheme).unwrap();
            assert!(result.rmsd >= 0.0);
            assert!(result.rmsd < 1e-9, "{scheme}: {}", result.rmsd);
        }
    }

    #[test]
    fn transformed_copy_is_superposed_exactly() {
        let t = rigid_motion();
        let candidate = moved(&motif(), &t);
        let result = align(&motif(), &candidate, AtomPairingScheme::All).unwrap();
        assert!(result.rmsd < 1e-9);

        let aligned = result.aligned_reference();
        for (a, c) in aligned.iter().zip(&candidate) {
            for atom in a.atoms() {
                let other = c.atom(&atom.name).unwrap();
                assert!((atom.position - other.position).norm() < 1e-9);
            }
        }
    }

    #[test]
    fn applying_the_transformation_reproduces_the_rmsd() {
        let mut candidate = moved(&motif(), &rigid_motion());
        let shifted = residue(
            ResidueType::Histidine,
            1,
            &candidate[1]
                .atoms()
                .iter()
                .map(|a| (a.name.as_str(), [a.position.x + 0.4, a.position.y, a.position.z - 0.3]))
                .collect::<Vec<_>>(),
        );
        candidate[1] = shifted;
        let result = align(&motif(), &candidate, AtomPairingScheme::All).unwrap();
        assert!(result.rmsd > 0.0);

        let aligned = result.aligned_reference();
        let mut sum = 0.0;
        let mut n = 0;
        for (a, c) in aligned.iter().zip(&candidate) {
            for atom in a.atoms() {
                sum += (atom.position - c.atom(&atom.name).unwrap().position).norm_squared();
                n += 1;
            }
        }
        assert!(((sum / n as f64).sqrt() - result.rmsd).abs() < 1e-9);
    }

    #[test]
    fn swapping_arguments_inverts_the_transformation() {
        let candidate: Vec<_> = moved(&motif(), &rigid_motion())
            .iter()
            .map(|r| {
                let t = Transformation::from_translation(Vector3::new(0.1, -0.2, 0.05));
                if r.identifier.index == 2 { t.transform_residue(r) } else { r.clone() }
            })
            .collect();

        let forward = align(&motif(), &candidate, AtomPairingScheme::All).unwrap();
        let backward = align(&candidate, &motif(), AtomPairingScheme::All).unwrap();
        assert!((forward.rmsd - backward.rmsd).abs() < 1e-9);
        assert!(
            (forward.transformation.inverse().matrix() - backward.transformation.matrix()).norm()
                < 1e-6
        );
    }

    #[test]
    fn backbone_scheme_ignores_side_chain_atoms() {
        let mut candidate = motif();
        candidate[0] = residue(
            ResidueType::Serine,
            0,
            &[
                ("N", [0.0, 0.0, 0.0]),
                ("CA", [1.4, 0.3, 0.0]),
                ("C", [2.1, -0.9, 0.5]),
                ("OG", [9.0, 9.0, 9.0]),
            ],
        );
        let backbone = align(&motif(), &candidate, AtomPairingScheme::Backbone).unwrap();
        let all = align(&motif(), &candidate, AtomPairingScheme::All).unwrap();
        assert!(backbone.rmsd < 1e-9);
        assert!(all.rmsd > 0.5);
    }

    #[test]
    fn side_chain_scheme_pairs_exchanged_residue_types() {
        let mut candidate = motif();
        candidate[0] = residue(
            ResidueType::Threonine,
            0,
            &[("CA", [1.4, 0.3, 0.0]), ("OG1", [1.9, 1.6, -0.7])],
        );
        let result = align(&motif(), &candidate, AtomPairingScheme::SideChain).unwrap();
        assert!(result.rmsd < 1e-9);
    }

    #[test]
    fn single_shared_atom_gives_pure_translation() {
        let a = vec![residue(ResidueType::Alanine, 0, &[("CA", [1.0, 1.0, 1.0])])];
        let b = vec![residue(ResidueType::Alanine, 0, &[("CA", [2.0, 3.0, 4.0])])];
        let result = align(&a, &b, AtomPairingScheme::Backbone).unwrap();
        assert_eq!(result.rmsd, 0.0);
        assert_eq!(
            result.transformation.rotation(),
            nalgebra::Matrix3::identity()
        );
        assert_eq!(
            result.transformation.translation(),
            Vector3::new(1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn no_shared_atoms_is_insufficient() {
        let a = vec![residue(ResidueType::Alanine, 0, &[("CB", [1.0, 1.0, 1.0])])];
        let b = vec![residue(ResidueType::Alanine, 0, &[("CA", [2.0, 3.0, 4.0])])];
        assert_eq!(
            align(&a, &b, AtomPairingScheme::All).unwrap_err(),
            AlignmentError::InsufficientAtoms
        );
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = align(&motif(), &motif()[..2], AtomPairingScheme::All).unwrap_err();
        assert!(matches!(err, AlignmentError::LengthMismatch { reference: 3, candidate: 2 }));
    }

    #[test]
    fn pairing_scheme_parses_common_spellings() {
        assert_eq!("ALL".parse::<AtomPairingScheme>(), Ok(AtomPairingScheme::All));
        assert_eq!("side-chain".parse::<AtomPairingScheme>(), Ok(AtomPairingScheme::SideChain));
        assert_eq!("SIDE_CHAIN".parse::<AtomPairingScheme>(), Ok(AtomPairingScheme::SideChain));
        assert!("everything".parse::<AtomPairingScheme>().is_err());
    }
}
