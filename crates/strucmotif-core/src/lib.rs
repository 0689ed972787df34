//! # Structural Motif Search
//!
//! Finds every occurrence of a small 3-D arrangement of residues (a motif) across a collection
//! of macromolecular structures, and reports each occurrence with the rigid transformation and
//! RMSD that superpose the motif onto it.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Immutable data models (`Structure`, `Residue`), residue pair
//!   descriptors, quaternion superposition, the collaborator contracts (`InvertedIndex`,
//!   `StructureRepository`) with in-memory adapters, and archive I/O.
//!
//! - **[`engine`]: The Logic Core.** Query validation, tolerance expansion, the target assembler
//!   that joins index occurrences into correspondences, and the parallel hit scorer.
//!
//! - **[`workflows`]: The Public API.** [`workflows::search::run`] drives a query through
//!   validation, assembly and scoring and returns the accepted hits with timing metadata.

pub mod core;
pub mod engine;
pub mod workflows;

#[cfg(test)]
pub(crate) mod test_support;
