use super::chain::Chain;
use super::ids::{IndexSelection, StructureId};
use super::residue::Residue;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// An immutable structure: an identifier and its chain instances.
///
/// Structures handed out by a [`StructureRepository`](crate::core::persistence::StructureRepository)
/// may be partial, holding only the residues that were requested.
#[derive(Debug, Clone)]
pub struct Structure {
    pub id: StructureId,
    chains: Vec<Chain>,
    /// Lookup from a residue position to its (chain, residue) slot.
    residue_index_map: HashMap<IndexSelection, (usize, usize)>,
}

impl Structure {
    pub fn new(id: StructureId, chains: Vec<Chain>) -> Self {
        let mut residue_index_map = HashMap::new();
        for (chain_idx, chain) in chains.iter().enumerate() {
            for (residue_idx, residue) in chain.residues().iter().enumerate() {
                let selection = IndexSelection::new(chain.assembly_id, residue.identifier.index);
                match residue_index_map.entry(selection) {
                    Entry::Vacant(slot) => {
                        slot.insert((chain_idx, residue_idx));
                    }
                    // The first claimant keeps the position; `residues_iter` skips the shadowed one.
                    Entry::Occupied(_) => debug_assert!(
                        false,
                        "residue position {} is used twice in structure {}",
                        selection, id
                    ),
                }
            }
        }
        Self {
            id,
            chains,
            residue_index_map,
        }
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn residue_count(&self) -> usize {
        self.residue_index_map.len()
    }

    pub fn residue(&self, selection: &IndexSelection) -> Option<&Residue> {
        self.residue_index_map
            .get(selection)
            .map(|&(c, r)| &self.chains[c].residues()[r])
    }

    pub fn chain_of(&self, selection: &IndexSelection) -> Option<&Chain> {
        self.residue_index_map
            .get(selection)
            .map(|&(c, _)| &self.chains[c])
    }

    /// Human-readable label of a residue position, e.g. `A:HIS57`.
    pub fn label(&self, selection: &IndexSelection) -> Option<String> {
        let chain = self.chain_of(selection)?;
        let residue = self.residue(selection)?;
        Some(format!("{}:{}", chain.id, residue.identifier))
    }

    /// Iterates over every addressable residue with its positional reference, chain by chain.
    ///
    /// Each yielded selection resolves back to the yielded residue through [`Structure::residue`].
    pub fn residues_iter(&self) -> impl Iterator<Item = (IndexSelection, &Residue)> {
        self.chains
            .iter()
            .enumerate()
            .flat_map(move |(chain_idx, chain)| {
                chain
                    .residues()
                    .iter()
                    .enumerate()
                    .filter_map(move |(residue_idx, residue)| {
                        let selection =
                            IndexSelection::new(chain.assembly_id, residue.identifier.index);
                        (self.residue_index_map.get(&selection) == Some(&(chain_idx, residue_idx)))
                            .then_some((selection, residue))
                    })
            })
    }

    /// Builds a partial copy that keeps only the requested residues.
    ///
    /// Selections that do not resolve are skipped; chains left empty are dropped.
    pub fn select(&self, selections: &[IndexSelection]) -> Structure {
        let mut wanted: HashMap<usize, Vec<usize>> = HashMap::new();
        for selection in selections {
            if let Some(&(c, r)) = self.residue_index_map.get(selection) {
                wanted.entry(c).or_default().push(r);
            }
        }

        let chains = self
            .chains
            .iter()
            .enumerate()
            .filter_map(|(chain_idx, chain)| {
                let mut residue_idxs = wanted.remove(&chain_idx)?;
                residue_idxs.sort_unstable();
                residue_idxs.dedup();
                let residues = residue_idxs
                    .into_iter()
                    .map(|r| chain.residues()[r].clone())
                    .collect();
                Some(chain.with_residues(residues))
            })
            .collect();

        Structure::new(self.id.clone(), chains)
    }
}
