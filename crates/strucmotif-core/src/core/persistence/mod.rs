//! Contracts for the two collaborators a search reads from, plus in-memory adapters.
//!
//! Both contracts are read-only during a query and must tolerate concurrent readers.

pub mod memory;

use crate::core::models::ids::{IndexSelection, StructureId};
use crate::core::models::structure::Structure;
use crate::core::motif::descriptor::ResiduePairDescriptor;
use crate::core::motif::occurrence::ResiduePairOccurrence;
use thiserror::Error;

pub use memory::{MemoryInvertedIndex, MemoryStructureRepository};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StorageError {
    #[error("No structure data available for '{0}'")]
    StructureUnavailable(StructureId),

    #[error("Structure '{structure_id}' has no residue at {selection}")]
    ResidueUnavailable {
        structure_id: StructureId,
        selection: IndexSelection,
    },

    #[error("Inverted index unavailable: {0}")]
    IndexUnavailable(String),
}

/// Occurrences of one descriptor, grouped by structure.
pub type OccurrenceStream<'a> =
    Box<dyn Iterator<Item = (StructureId, Vec<ResiduePairOccurrence>)> + Send + 'a>;

/// Maps canonical descriptors to the residue pairs realizing them.
pub trait InvertedIndex: Send + Sync {
    /// Looks up a descriptor. Occurrences are returned in canonical residue-type order; an
    /// unpopulated descriptor yields an empty stream.
    fn select(&self, descriptor: &ResiduePairDescriptor) -> Result<OccurrenceStream<'_>, StorageError>;
}

/// Serves (partial) structures by identifier.
pub trait StructureRepository: Send + Sync {
    /// Returns a structure holding exactly the requested residues.
    fn select(
        &self,
        structure_id: &StructureId,
        selections: &[IndexSelection],
    ) -> Result<Structure, StorageError>;
}
