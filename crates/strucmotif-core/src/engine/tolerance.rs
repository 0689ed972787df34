use super::config::QueryParameters;
use crate::core::models::ids::IndexSelection;
use crate::core::models::residue::ResidueType;
use crate::core::motif::descriptor::{Binning, ResiduePairDescriptor};
use crate::core::motif::occurrence::ResiduePairOccurrence;
use itertools::iproduct;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Bin radii applied around a query descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tolerances {
    pub backbone_distance: u8,
    pub side_chain_distance: u8,
    pub angle: u8,
}

impl From<&QueryParameters> for Tolerances {
    fn from(params: &QueryParameters) -> Self {
        Self {
            backbone_distance: params.backbone_distance_tolerance,
            side_chain_distance: params.side_chain_distance_tolerance,
            angle: params.angle_tolerance,
        }
    }
}

/// Which ways round an indexed occurrence maps onto a query edge `(first, second)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Orientations {
    /// The occurrence's first residue plays the edge's first residue.
    pub forward: bool,
    /// The occurrence's second residue plays the edge's first residue.
    pub reverse: bool,
}

impl Orientations {
    /// Yields the occurrence's residue pairs in edge order.
    pub fn apply(
        &self,
        occurrence: &ResiduePairOccurrence,
    ) -> impl Iterator<Item = (IndexSelection, IndexSelection)> + use<> {
        let forward = self.forward.then_some((occurrence.first, occurrence.second));
        let reverse = self.reverse.then_some((occurrence.second, occurrence.first));
        forward.into_iter().chain(reverse)
    }
}

/// One distinct index lookup issued for a query edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    pub descriptor: ResiduePairDescriptor,
    pub orientations: Orientations,
}

fn window(bin: u8, radius: u8, bin_count: u8) -> RangeInclusive<u8> {
    let last = bin_count.saturating_sub(1);
    bin.saturating_sub(radius).min(last)..=bin.saturating_add(radius).min(last)
}

/// Enumerates every canonical descriptor within `tolerances` of `seed`.
///
/// `first_types` and `second_types` are the residue types admissible at the edge's two positions
/// (their own type plus any exchanges). The bins of `seed` are orientation independent, so only
/// its three discretized fields are read. The result is deduplicated and sorted; a descriptor
/// reachable in both residue orders carries both orientations.
pub fn expand(
    first_types: &[ResidueType],
    second_types: &[ResidueType],
    seed: &ResiduePairDescriptor,
    tolerances: &Tolerances,
    binning: &Binning,
) -> Vec<Lookup> {
    let distance_bins = binning.distance_bin_count();
    let backbone = window(seed.backbone_distance, tolerances.backbone_distance, distance_bins);
    let side_chain = window(
        seed.side_chain_distance,
        tolerances.side_chain_distance,
        distance_bins,
    );
    let angle = window(seed.angle, tolerances.angle, binning.angle_bin_count());

    let mut lookups: BTreeMap<ResiduePairDescriptor, Orientations> = BTreeMap::new();
    for (&type_a, &type_b, bb, sc, an) in iproduct!(
        first_types,
        second_types,
        backbone,
        side_chain,
        angle
    ) {
        let descriptor = ResiduePairDescriptor::canonical(type_a, type_b, bb, sc, an);
        let orientations = lookups.entry(descriptor).or_default();
        if descriptor.is_symmetric() {
            orientations.forward = true;
            orientations.reverse = true;
        } else if descriptor.flipped {
            orientations.reverse = true;
        } else {
            orientations.forward = true;
        }
    }

    lookups
        .into_iter()
        .map(|(descriptor, orientations)| Lookup {
            descriptor: ResiduePairDescriptor {
                flipped: false,
                ..descriptor
            },
            orientations,
        })
        .collect()
}
