use super::{InvertedIndex, OccurrenceStream, StorageError, StructureRepository};
use crate::core::models::ids::{IndexSelection, StructureId};
use crate::core::models::structure::Structure;
use crate::core::motif::descriptor::{Binning, ResiduePairDescriptor, descriptor_of};
use crate::core::motif::occurrence::ResiduePairOccurrence;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

/// Inverted index held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryInvertedIndex {
    binning: Binning,
    entries: HashMap<ResiduePairDescriptor, BTreeMap<StructureId, Vec<ResiduePairOccurrence>>>,
}

impl MemoryInvertedIndex {
    pub fn new(binning: Binning) -> Self {
        Self {
            binning,
            entries: HashMap::new(),
        }
    }

    pub fn binning(&self) -> &Binning {
        &self.binning
    }

    /// Indexes every residue pair of `structure` whose descriptor can be computed.
    ///
    /// Re-inserting a structure replaces its previous entries. Returns the number of indexed
    /// pairs.
    pub fn insert_structure(&mut self, structure: &Structure) -> usize {
        self.remove_structure(&structure.id);

        let residues: Vec<_> = structure.residues_iter().collect();
        let mut indexed = 0;
        for (i, (selection_a, residue_a)) in residues.iter().enumerate() {
            for (selection_b, residue_b) in &residues[i + 1..] {
                let descriptor = match descriptor_of(residue_a, residue_b, &self.binning) {
                    Ok(d) => d,
                    Err(e) => {
                        trace!(structure = %structure.id, %selection_a, %selection_b, reason = %e, "Pair not indexed");
                        continue;
                    }
                };
                let occurrence = ResiduePairOccurrence::new(*selection_a, *selection_b);
                let occurrence = if descriptor.flipped {
                    occurrence.swapped()
                } else {
                    occurrence
                };
                let key = ResiduePairDescriptor {
                    flipped: false,
                    ..descriptor
                };
                self.entries
                    .entry(key)
                    .or_default()
                    .entry(structure.id.clone())
                    .or_default()
                    .push(occurrence);
                indexed += 1;
            }
        }

        debug!(structure = %structure.id, residues = residues.len(), pairs = indexed, "Indexed structure");
        indexed
    }

    pub fn remove_structure(&mut self, structure_id: &StructureId) {
        self.entries.retain(|_, by_structure| {
            by_structure.remove(structure_id);
            !by_structure.is_empty()
        });
    }

    /// Number of distinct populated descriptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn structure_count(&self) -> usize {
        let mut ids: Vec<&StructureId> = self
            .entries
            .values()
            .flat_map(|by_structure| by_structure.keys())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

impl InvertedIndex for MemoryInvertedIndex {
    fn select(&self, descriptor: &ResiduePairDescriptor) -> Result<OccurrenceStream<'_>, StorageError> {
        match self.entries.get(descriptor) {
            Some(by_structure) => Ok(Box::new(
                by_structure
                    .iter()
                    .map(|(id, occurrences)| (id.clone(), occurrences.clone())),
            )),
            None => Ok(Box::new(std::iter::empty())),
        }
    }
}

/// Structure store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStructureRepository {
    structures: HashMap<StructureId, Structure>,
}

impl MemoryStructureRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, structure: Structure) {
        self.structures.insert(structure.id.clone(), structure);
    }

    pub fn remove(&mut self, structure_id: &StructureId) -> Option<Structure> {
        self.structures.remove(structure_id)
    }

    pub fn get(&self, structure_id: &StructureId) -> Option<&Structure> {
        self.structures.get(structure_id)
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

impl StructureRepository for MemoryStructureRepository {
    fn select(
        &self,
        structure_id: &StructureId,
        selections: &[IndexSelection],
    ) -> Result<Structure, StorageError> {
        let structure = self
            .structures
            .get(structure_id)
            .ok_or_else(|| StorageError::StructureUnavailable(structure_id.clone()))?;

        if let Some(missing) = selections.iter().find(|s| structure.residue(s).is_none()) {
            return Err(StorageError::ResidueUnavailable {
                structure_id: structure_id.clone(),
                selection: *missing,
            });
        }

        Ok(structure.select(selections))
    }
}
