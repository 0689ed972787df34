use super::query::{QueryEdge, QueryStructure};
use crate::core::models::ids::{IndexSelection, StructureId};
use crate::core::persistence::{InvertedIndex, StorageError};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Target residue positions assigned to the query residues, in query order.
pub type Correspondence = Vec<IndexSelection>;

/// Candidate residue pairs for one edge, oriented as the edge `(first, second)`.
type EdgePairs = Vec<(IndexSelection, IndexSelection)>;

type Partial = Vec<Option<IndexSelection>>;

/// A structure that has at least one candidate pair for every query edge.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetStructure {
    pub structure_id: StructureId,
    edge_pairs: Vec<EdgePairs>,
}

impl TargetStructure {
    pub fn new(structure_id: StructureId, edge_pairs: Vec<EdgePairs>) -> Self {
        Self {
            structure_id,
            edge_pairs,
        }
    }

    pub fn edge_pairs(&self, edge: usize) -> &[(IndexSelection, IndexSelection)] {
        self.edge_pairs
            .get(edge)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Joins the per-edge candidate pairs into complete correspondences.
    ///
    /// Starts from the edge with the fewest pairs, then repeatedly extends through an edge that
    /// touches exactly one assigned query residue. Edges between two assigned residues act as
    /// filters. A target residue is never assigned to two query residues. Returns as soon as
    /// the partial set runs empty.
    pub fn paths(&self, query: &QueryStructure) -> Vec<Correspondence> {
        let edges = &query.edges;
        if edges.is_empty() || self.edge_pairs.len() != edges.len() {
            return Vec::new();
        }

        let Some(seed) = (0..edges.len()).min_by_key(|&k| self.edge_pairs[k].len()) else {
            return Vec::new();
        };

        let mut applied = vec![false; edges.len()];
        let mut assigned = vec![false; query.size];
        let mut partials: Vec<Partial> = self.edge_pairs[seed]
            .iter()
            .map(|&(a, b)| {
                let mut partial = vec![None; query.size];
                partial[edges[seed].first] = Some(a);
                partial[edges[seed].second] = Some(b);
                partial
            })
            .collect();
        mark(&edges[seed], seed, &mut applied, &mut assigned);

        while let Some(k) = next_edge(edges, &self.edge_pairs, &applied, &assigned) {
            if partials.is_empty() {
                return Vec::new();
            }
            let edge = &edges[k];
            let pairs = &self.edge_pairs[k];
            partials = match (assigned[edge.first], assigned[edge.second]) {
                (true, true) => filter(partials, edge, pairs),
                (true, false) => extend(partials, edge.first, edge.second, pairs.iter().copied()),
                (false, true) => extend(
                    partials,
                    edge.second,
                    edge.first,
                    pairs.iter().map(|&(a, b)| (b, a)),
                ),
                (false, false) => return Vec::new(),
            };
            mark(edge, k, &mut applied, &mut assigned);
        }

        if !applied.iter().all(|&a| a) {
            return Vec::new();
        }
        partials
            .into_iter()
            .filter_map(|p| p.into_iter().collect::<Option<Correspondence>>())
            .collect()
    }
}

fn mark(edge: &QueryEdge, k: usize, applied: &mut [bool], assigned: &mut [bool]) {
    applied[k] = true;
    assigned[edge.first] = true;
    assigned[edge.second] = true;
}

/// Prefers the smallest edge sharing exactly one assigned node, then any filtering edge.
fn next_edge(
    edges: &[QueryEdge],
    edge_pairs: &[EdgePairs],
    applied: &[bool],
    assigned: &[bool],
) -> Option<usize> {
    let pending = || (0..edges.len()).filter(move |&k| !applied[k]);
    let extending = pending()
        .filter(|&k| assigned[edges[k].first] != assigned[edges[k].second])
        .min_by_key(|&k| edge_pairs[k].len());
    extending.or_else(|| pending().find(|&k| assigned[edges[k].first] && assigned[edges[k].second]))
}

fn filter(partials: Vec<Partial>, edge: &QueryEdge, pairs: &[(IndexSelection, IndexSelection)]) -> Vec<Partial> {
    let allowed: HashSet<_> = pairs.iter().copied().collect();
    partials
        .into_iter()
        .filter(|p| match (p[edge.first], p[edge.second]) {
            (Some(a), Some(b)) => allowed.contains(&(a, b)),
            _ => false,
        })
        .collect()
}

fn extend(
    partials: Vec<Partial>,
    known: usize,
    unknown: usize,
    pairs: impl Iterator<Item = (IndexSelection, IndexSelection)>,
) -> Vec<Partial> {
    let mut by_known: HashMap<IndexSelection, Vec<IndexSelection>> = HashMap::new();
    for (k, u) in pairs {
        by_known.entry(k).or_default().push(u);
    }

    let mut extended = Vec::new();
    for partial in partials {
        let Some(candidates) = partial[known].and_then(|k| by_known.get(&k)) else {
            continue;
        };
        for &candidate in candidates {
            if partial.contains(&Some(candidate)) {
                continue;
            }
            let mut next = partial.clone();
            next[unknown] = Some(candidate);
            extended.push(next);
        }
    }
    extended
}

/// Runs every lookup of `edge` and orients the occurrences to the edge.
///
/// Pairs are sorted and deduplicated per structure.
pub(crate) fn collect_edge(
    edge: &QueryEdge,
    index: &dyn InvertedIndex,
) -> Result<BTreeMap<StructureId, EdgePairs>, StorageError> {
    let mut by_structure: BTreeMap<StructureId, EdgePairs> = BTreeMap::new();
    for lookup in &edge.lookups {
        for (structure_id, occurrences) in index.select(&lookup.descriptor)? {
            let pairs = by_structure.entry(structure_id).or_default();
            for occurrence in &occurrences {
                pairs.extend(lookup.orientations.apply(occurrence));
            }
        }
    }
    for pairs in by_structure.values_mut() {
        pairs.sort_unstable();
        pairs.dedup();
    }
    Ok(by_structure)
}

/// Keeps structures present for every edge, ordered by identifier.
pub(crate) fn group_by_structure(
    mut per_edge: Vec<BTreeMap<StructureId, EdgePairs>>,
) -> Vec<TargetStructure> {
    let Some((first, rest)) = per_edge.split_first() else {
        return Vec::new();
    };
    let shared: Vec<StructureId> = first
        .keys()
        .filter(|id| rest.iter().all(|m| m.contains_key(*id)))
        .cloned()
        .collect();

    shared
        .into_iter()
        .filter_map(|id| {
            let edge_pairs = per_edge
                .iter_mut()
                .map(|m| m.remove(&id))
                .collect::<Option<Vec<_>>>()?;
            Some(TargetStructure::new(id, edge_pairs))
        })
        .collect()
}
