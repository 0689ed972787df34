use crate::utils::parser::{Exchange, ResidueSelector};
use std::path::PathBuf;
use strucmotif::engine::config::{MotifSearchConfig, QueryParameters};

/// Fully merged settings of one `search` invocation.
pub struct AppConfig {
    pub archive_path: PathBuf,
    pub query_archive_path: PathBuf,
    pub query_structure: Option<String>,
    pub residues: Vec<ResidueSelector>,
    pub exchanges: Vec<Exchange>,
    pub output_path: Option<PathBuf>,
    pub service: MotifSearchConfig,
    pub parameters: QueryParameters,
}
