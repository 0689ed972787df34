use crate::core::models::residue::{MissingAtomError, Residue, ResidueType};
use crate::core::utils::geometry::angle_between_degrees;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

pub const DISTANCE_BIN_WIDTH: f64 = 1.0;
pub const ANGLE_BIN_WIDTH: f64 = 10.0;
pub const ANGLE_BIN_COUNT: u8 = 18;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DescriptorError {
    #[error(transparent)]
    MissingAtom(#[from] MissingAtomError),

    #[error("Backbone distance {distance:.2} Å exceeds the distance cutoff of {cutoff} Å")]
    BeyondCutoff { distance: f64, cutoff: f64 },

    #[error("Residue {residue} has no usable side-chain orientation")]
    DegenerateGeometry { residue: String },
}

/// Fixed-width discretization of distances and angles.
///
/// Distances are bucketed in [`DISTANCE_BIN_WIDTH`] steps over `[0, distance_cutoff]`, angles in
/// [`ANGLE_BIN_WIDTH`] steps over `[0°, 180°]`. Every valid value lands in exactly one bin; values
/// past the last bin are clamped into it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binning {
    distance_cutoff: f64,
}

impl Binning {
    pub fn new(distance_cutoff: f64) -> Self {
        Self { distance_cutoff }
    }

    pub fn distance_cutoff(&self) -> f64 {
        self.distance_cutoff
    }

    pub fn distance_bin_count(&self) -> u8 {
        let count = (self.distance_cutoff / DISTANCE_BIN_WIDTH).ceil();
        count.clamp(1.0, u8::MAX as f64) as u8
    }

    pub fn angle_bin_count(&self) -> u8 {
        ANGLE_BIN_COUNT
    }

    pub fn distance_bin(&self, distance: f64) -> u8 {
        Self::bucket(distance, DISTANCE_BIN_WIDTH, self.distance_bin_count())
    }

    pub fn angle_bin(&self, angle_degrees: f64) -> u8 {
        Self::bucket(angle_degrees, ANGLE_BIN_WIDTH, ANGLE_BIN_COUNT)
    }

    fn bucket(value: f64, width: f64, count: u8) -> u8 {
        let bin = (value.max(0.0) / width).floor();
        bin.min((count - 1) as f64) as u8
    }
}

/// Canonical, discretized description of two residues' relative geometry.
///
/// The residue types are ordered by the total order of [`ResidueType`]. When the input pair had
/// to be swapped to reach that order, `flipped` is set and consumers must swap the two positions
/// of every occurrence returned for this descriptor back into their original order.
/// Equality, ordering and hashing only consider the five canonical fields.
#[derive(Debug, Clone, Copy)]
pub struct ResiduePairDescriptor {
    pub residue_type_1: ResidueType,
    pub residue_type_2: ResidueType,
    pub backbone_distance: u8,
    pub side_chain_distance: u8,
    pub angle: u8,
    pub flipped: bool,
}

type DescriptorKey = (ResidueType, ResidueType, u8, u8, u8);

impl ResiduePairDescriptor {
    /// Builds the canonical descriptor for a pair given in query order `(type_a, type_b)`.
    pub fn canonical(
        type_a: ResidueType,
        type_b: ResidueType,
        backbone_distance: u8,
        side_chain_distance: u8,
        angle: u8,
    ) -> Self {
        let flipped = type_a > type_b;
        let (residue_type_1, residue_type_2) = if flipped {
            (type_b, type_a)
        } else {
            (type_a, type_b)
        };
        Self {
            residue_type_1,
            residue_type_2,
            backbone_distance,
            side_chain_distance,
            angle,
            flipped,
        }
    }

    /// Both residue types are equal, so every occurrence can be read in either orientation.
    pub fn is_symmetric(&self) -> bool {
        self.residue_type_1 == self.residue_type_2
    }

    fn key(&self) -> DescriptorKey {
        (
            self.residue_type_1,
            self.residue_type_2,
            self.backbone_distance,
            self.side_chain_distance,
            self.angle,
        )
    }
}

impl PartialEq for ResiduePairDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
impl Eq for ResiduePairDescriptor {}

impl Hash for ResiduePairDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for ResiduePairDescriptor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ResiduePairDescriptor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for ResiduePairDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}-{}",
            self.residue_type_1,
            self.residue_type_2,
            self.backbone_distance,
            self.side_chain_distance,
            self.angle
        )
    }
}

/// Computes the descriptor of a residue pair.
///
/// Fails when a representative atom is missing, when the orientation of either residue is
/// degenerate, or when the backbone distance exceeds the distance cutoff. All of these mean the
/// pair cannot be indexed or queried; none of them is fatal to callers.
pub fn descriptor_of(
    residue_a: &Residue,
    residue_b: &Residue,
    binning: &Binning,
) -> Result<ResiduePairDescriptor, DescriptorError> {
    let backbone_a = residue_a.backbone_point()?;
    let backbone_b = residue_b.backbone_point()?;

    let backbone_distance = (backbone_a - backbone_b).norm();
    if backbone_distance > binning.distance_cutoff() {
        return Err(DescriptorError::BeyondCutoff {
            distance: backbone_distance,
            cutoff: binning.distance_cutoff(),
        });
    }

    let side_chain_a = residue_a.side_chain_point()?;
    let side_chain_b = residue_b.side_chain_point()?;
    let side_chain_distance = (side_chain_a - side_chain_b).norm();

    let orientation_a = side_chain_a - backbone_a;
    let orientation_b = side_chain_b - backbone_b;
    let angle = angle_between_degrees(&orientation_a, &orientation_b)
        .filter(|a| a.is_finite())
        .ok_or_else(|| {
            let residue = if orientation_a.norm() <= f64::EPSILON {
                residue_a
            } else {
                residue_b
            };
            DescriptorError::DegenerateGeometry {
                residue: residue.identifier.to_string(),
            }
        })?;

    Ok(ResiduePairDescriptor::canonical(
        residue_a.residue_type(),
        residue_b.residue_type(),
        binning.distance_bin(backbone_distance),
        binning.distance_bin(side_chain_distance),
        binning.angle_bin(angle),
    ))
}
