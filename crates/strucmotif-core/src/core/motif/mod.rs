//! Geometric descriptors of residue pairs and the occurrences that realize them.
//!
//! A [`descriptor::ResiduePairDescriptor`] discretizes the relative geometry of two residues
//! into a hashable, orientation-canonical key. The inverted index maps such keys to
//! [`occurrence::ResiduePairOccurrence`]s grouped by structure.

pub mod descriptor;
pub mod occurrence;
