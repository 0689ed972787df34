//! # Core Module
//!
//! Stateless building blocks of motif search.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Structures, chains, residues, atoms and the
//!   positional identifiers that address them
//! - **Geometric Descriptors** ([`motif`]) - Discretized, canonical descriptions of residue pairs
//! - **Superposition** ([`align`]) - Quaternion-based least-squares alignment and rigid
//!   transformations
//! - **Collaborator Contracts** ([`persistence`]) - Inverted index and structure repository
//!   traits, with in-memory implementations
//! - **File I/O** ([`io`]) - The atom-table archive format
//! - **Utilities** ([`utils`]) - Atom-name tables and geometry helpers

pub mod align;
pub mod io;
pub mod models;
pub mod motif;
pub mod persistence;
pub mod utils;
