//! Reading and writing the atom-table archive that feeds the in-memory index and repository.

pub mod archive;
pub mod traits;
