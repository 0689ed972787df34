use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use strucmotif::core::align::AtomPairingScheme;
use tracing::debug;

/// `[service]` table: settings shared by every query against one index.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileServiceConfig {
    pub distance_cutoff: Option<f64>,
    pub max_results: Option<usize>,
    pub max_motif_size: Option<usize>,
    pub number_threads: Option<usize>,
    pub decimal_places_rmsd: Option<u32>,
    pub decimal_places_matrix: Option<u32>,
}

/// `[query]` table: per-query acceptance and lookup settings.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileQueryConfig {
    pub rmsd_cutoff: Option<f64>,
    pub backbone_distance_tolerance: Option<u8>,
    pub side_chain_distance_tolerance: Option<u8>,
    pub angle_tolerance: Option<u8>,
    pub atom_pairing_scheme: Option<AtomPairingScheme>,
    pub limit: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub service: Option<FileServiceConfig>,
    pub query: Option<FileQueryConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
