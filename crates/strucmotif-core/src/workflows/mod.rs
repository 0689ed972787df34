//! # Workflows Module
//!
//! Top-level entry points. A workflow validates its input, drives the engine through each phase,
//! reports progress and returns a complete result or a single error.
//!
//! - **Motif Search** ([`search`]) - Finds every occurrence of a residue motif in the indexed
//!   structures and superposes the motif onto each of them.

pub mod search;
