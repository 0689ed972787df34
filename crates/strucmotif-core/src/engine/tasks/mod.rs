//! Units of work executed on the search worker pool.
//!
//! Each task reports its own progress and propagates the first fatal error it meets.

pub mod assembly;
pub mod scoring;
