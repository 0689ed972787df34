//! # Core Models Module
//!
//! This module contains the immutable data structures used to represent the structures that
//! are indexed and searched.
//!
//! ## Overview
//!
//! A [`structure::Structure`] is an identifier plus an ordered collection of chain instances.
//! Each [`chain::Chain`] carries its assembly operator and an ordered list of residues, and each
//! [`residue::Residue`] holds its identity and named atoms. Residues are addressed positionally
//! through an [`ids::IndexSelection`] so that index postings and correspondences never need to
//! hold residue content.
//!
//! ## Key Components
//!
//! - [`atom`] - Atom names, coordinates and backbone/side-chain roles
//! - [`residue`] - Residue types, identifiers and representative points
//! - [`chain`] - Chain instances with their assembly operator
//! - [`structure`] - Complete (or partially loaded) structures
//! - [`ids`] - Structure identifiers and positional residue references
//!
//! ## Usage
//!
//! ```ignore
//! use strucmotif::core::models::{chain::Chain, ids::StructureId, structure::Structure};
//!
//! let chain = Chain::new("A", 1, residues, Matrix4::identity());
//! let structure = Structure::new(StructureId::new("1abc"), vec![chain]);
//! let his = structure.residue(&IndexSelection::new(1, 56));
//! ```

pub mod atom;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod structure;
