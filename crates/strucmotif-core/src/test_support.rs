//! Small synthetic structures shared by unit tests.

use crate::core::align::Transformation;
use crate::core::models::atom::Atom;
use crate::core::models::chain::Chain;
use crate::core::models::ids::StructureId;
use crate::core::models::residue::{Residue, ResidueIdentifier, ResidueType};
use crate::core::models::structure::Structure;
use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

pub fn residue(
    residue_type: ResidueType,
    seq_id: i32,
    index: usize,
    atoms: &[(&str, [f64; 3])],
) -> Residue {
    Residue::new(
        ResidueIdentifier {
            residue_type,
            seq_id,
            index,
        },
        atoms
            .iter()
            .map(|(name, p)| Atom::new(name, Point3::new(p[0], p[1], p[2])))
            .collect(),
    )
}

/// HIS57, ASP102 and SER195 of a serine protease-like active site, indices 0..3.
pub fn catalytic_triad() -> Vec<Residue> {
    vec![
        residue(
            ResidueType::Histidine,
            57,
            0,
            &[
                ("N", [0.0, 0.0, 0.0]),
                ("CA", [1.46, 0.0, 0.0]),
                ("C", [2.0, 1.42, 0.0]),
                ("NE2", [3.5, -2.5, 3.0]),
            ],
        ),
        residue(
            ResidueType::AsparticAcid,
            102,
            1,
            &[
                ("N", [6.0, -4.0, 1.0]),
                ("CA", [7.2, -3.3, 1.5]),
                ("C", [8.3, -4.2, 2.0]),
                ("CG", [5.6, -5.0, 4.2]),
            ],
        ),
        residue(
            ResidueType::Serine,
            195,
            2,
            &[
                ("N", [-2.0, -5.0, 5.0]),
                ("CA", [-0.8, -4.4, 5.6]),
                ("C", [0.2, -5.5, 6.0]),
                ("OG", [1.0, -3.2, 4.4]),
            ],
        ),
    ]
}

/// An alanine well away from the triad, used to pad target structures.
pub fn distant_alanine(seq_id: i32, index: usize) -> Residue {
    let x = 40.0 + 4.0 * index as f64;
    residue(
        ResidueType::Alanine,
        seq_id,
        index,
        &[
            ("N", [x, 30.0, 0.0]),
            ("CA", [x + 1.46, 30.0, 0.0]),
            ("C", [x + 2.0, 31.42, 0.0]),
            ("CB", [x + 1.9, 29.2, 1.2]),
        ],
    )
}

/// Moves residues rigidly and shifts their positional indices.
pub fn relocated(residues: &[Residue], transformation: &Transformation, index_offset: usize) -> Vec<Residue> {
    residues
        .iter()
        .map(|r| {
            let moved = transformation.transform_residue(r);
            let mut identifier = moved.identifier;
            identifier.index += index_offset;
            Residue::new(identifier, moved.atoms().to_vec())
        })
        .collect()
}

pub fn rigid_motion() -> Transformation {
    let rotation = Rotation3::from_euler_angles(0.6, -0.4, 1.9).into_inner();
    Transformation::from_parts(rotation, Vector3::new(12.0, -7.5, 3.25))
}

/// Single-chain structure in assembly 1.
pub fn structure_with(id: &str, residues: Vec<Residue>) -> Structure {
    Structure::new(
        StructureId::new(id),
        vec![Chain::new("A", 1, residues, Matrix4::identity())],
    )
}
