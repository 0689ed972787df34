//! # Engine Module
//!
//! Turns a validated query into hits. The engine owns everything that happens between receiving
//! a motif and returning superposed matches.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Service-wide settings and per-query parameters
//! - **Query Preparation** ([`query`], [`tolerance`]) - Descriptor graph of the motif and its
//!   tolerance-expanded index lookups
//! - **Target Assembly** ([`assembler`]) - Joins per-edge occurrences into complete correspondences
//! - **Scoring** ([`scorer`]) - Resolves correspondences, superposes and filters by RMSD
//! - **State Tracking** ([`state`]) - Search phases, timings and results
//! - **Progress Monitoring** ([`progress`]) - Callbacks for front ends
//! - **Error Handling** ([`error`]) - The per-query failure type

pub mod assembler;
pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod query;
pub mod scorer;
pub mod state;
pub(crate) mod tasks;
pub mod tolerance;
