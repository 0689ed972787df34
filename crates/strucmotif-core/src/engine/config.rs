use crate::core::align::AtomPairingScheme;
use crate::core::motif::descriptor::Binning;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

fn invalid(parameter: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        parameter,
        reason: reason.into(),
    }
}

pub const DEFAULT_DISTANCE_CUTOFF: f64 = 20.0;
pub const DEFAULT_MAX_RESULTS: usize = 10_000;
pub const DEFAULT_MAX_MOTIF_SIZE: usize = 10;
pub const DEFAULT_DECIMAL_PLACES_RMSD: u32 = 2;
pub const DEFAULT_DECIMAL_PLACES_MATRIX: u32 = 3;
/// Finest rounding that still changes an `f64` in the Å range.
pub const MAX_DECIMAL_PLACES: u32 = 15;

pub const DEFAULT_RMSD_CUTOFF: f64 = 2.0;
pub const DEFAULT_BIN_TOLERANCE: u8 = 1;

fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Service-wide settings shared by every query against one index.
#[derive(Debug, Clone, PartialEq)]
pub struct MotifSearchConfig {
    /// Largest backbone distance (Å) of an indexed or queried residue pair.
    pub distance_cutoff: f64,
    pub max_results: usize,
    pub max_motif_size: usize,
    pub number_threads: usize,
    pub decimal_places_rmsd: u32,
    pub decimal_places_matrix: u32,
}

impl MotifSearchConfig {
    pub fn builder() -> MotifSearchConfigBuilder {
        MotifSearchConfigBuilder::new()
    }

    pub fn binning(&self) -> Binning {
        Binning::new(self.distance_cutoff)
    }
}

impl Default for MotifSearchConfig {
    fn default() -> Self {
        Self {
            distance_cutoff: DEFAULT_DISTANCE_CUTOFF,
            max_results: DEFAULT_MAX_RESULTS,
            max_motif_size: DEFAULT_MAX_MOTIF_SIZE,
            number_threads: available_threads(),
            decimal_places_rmsd: DEFAULT_DECIMAL_PLACES_RMSD,
            decimal_places_matrix: DEFAULT_DECIMAL_PLACES_MATRIX,
        }
    }
}

#[derive(Default)]
pub struct MotifSearchConfigBuilder {
    distance_cutoff: Option<f64>,
    max_results: Option<usize>,
    max_motif_size: Option<usize>,
    number_threads: Option<usize>,
    decimal_places_rmsd: Option<u32>,
    decimal_places_matrix: Option<u32>,
}

impl MotifSearchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distance_cutoff(mut self, cutoff: f64) -> Self {
        self.distance_cutoff = Some(cutoff);
        self
    }
    pub fn max_results(mut self, n: usize) -> Self {
        self.max_results = Some(n);
        self
    }
    pub fn max_motif_size(mut self, n: usize) -> Self {
        self.max_motif_size = Some(n);
        self
    }
    pub fn number_threads(mut self, n: usize) -> Self {
        self.number_threads = Some(n);
        self
    }
    pub fn decimal_places_rmsd(mut self, places: u32) -> Self {
        self.decimal_places_rmsd = Some(places);
        self
    }
    pub fn decimal_places_matrix(mut self, places: u32) -> Self {
        self.decimal_places_matrix = Some(places);
        self
    }

    /// Fills unset values with defaults and validates the result.
    pub fn build(self) -> Result<MotifSearchConfig, ConfigError> {
        let defaults = MotifSearchConfig::default();
        let config = MotifSearchConfig {
            distance_cutoff: self.distance_cutoff.unwrap_or(defaults.distance_cutoff),
            max_results: self.max_results.unwrap_or(defaults.max_results),
            max_motif_size: self.max_motif_size.unwrap_or(defaults.max_motif_size),
            number_threads: self.number_threads.unwrap_or(defaults.number_threads),
            decimal_places_rmsd: self
                .decimal_places_rmsd
                .unwrap_or(defaults.decimal_places_rmsd),
            decimal_places_matrix: self
                .decimal_places_matrix
                .unwrap_or(defaults.decimal_places_matrix),
        };

        if !config.distance_cutoff.is_finite() || config.distance_cutoff <= 0.0 {
            return Err(invalid(
                "distance_cutoff",
                format!("must be a positive distance, got {}", config.distance_cutoff),
            ));
        }
        if config.distance_cutoff > u8::MAX as f64 {
            return Err(invalid(
                "distance_cutoff",
                format!("must not exceed {} Å", u8::MAX),
            ));
        }
        if config.max_results == 0 {
            return Err(invalid("max_results", "must be at least 1"));
        }
        if config.max_motif_size < 2 {
            return Err(invalid("max_motif_size", "a motif needs at least 2 residues"));
        }
        if config.number_threads == 0 {
            return Err(invalid("number_threads", "must be at least 1"));
        }
        for (parameter, places) in [
            ("decimal_places_rmsd", config.decimal_places_rmsd),
            ("decimal_places_matrix", config.decimal_places_matrix),
        ] {
            if places > MAX_DECIMAL_PLACES {
                return Err(invalid(
                    parameter,
                    format!("must not exceed {}, got {}", MAX_DECIMAL_PLACES, places),
                ));
            }
        }
        Ok(config)
    }
}

/// Per-query acceptance and lookup settings.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameters {
    pub rmsd_cutoff: f64,
    pub backbone_distance_tolerance: u8,
    pub side_chain_distance_tolerance: u8,
    pub angle_tolerance: u8,
    pub atom_pairing_scheme: AtomPairingScheme,
    /// Upper bound on returned hits, further capped by [`MotifSearchConfig::max_results`].
    pub limit: Option<usize>,
}

impl QueryParameters {
    pub fn builder() -> QueryParametersBuilder {
        QueryParametersBuilder::new()
    }

    pub fn effective_limit(&self, config: &MotifSearchConfig) -> usize {
        self.limit
            .map_or(config.max_results, |limit| limit.min(config.max_results))
    }
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            rmsd_cutoff: DEFAULT_RMSD_CUTOFF,
            backbone_distance_tolerance: DEFAULT_BIN_TOLERANCE,
            side_chain_distance_tolerance: DEFAULT_BIN_TOLERANCE,
            angle_tolerance: DEFAULT_BIN_TOLERANCE,
            atom_pairing_scheme: AtomPairingScheme::default(),
            limit: None,
        }
    }
}

#[derive(Default)]
pub struct QueryParametersBuilder {
    rmsd_cutoff: Option<f64>,
    backbone_distance_tolerance: Option<u8>,
    side_chain_distance_tolerance: Option<u8>,
    angle_tolerance: Option<u8>,
    atom_pairing_scheme: Option<AtomPairingScheme>,
    limit: Option<usize>,
}

impl QueryParametersBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rmsd_cutoff(mut self, cutoff: f64) -> Self {
        self.rmsd_cutoff = Some(cutoff);
        self
    }
    pub fn backbone_distance_tolerance(mut self, bins: u8) -> Self {
        self.backbone_distance_tolerance = Some(bins);
        self
    }
    pub fn side_chain_distance_tolerance(mut self, bins: u8) -> Self {
        self.side_chain_distance_tolerance = Some(bins);
        self
    }
    pub fn angle_tolerance(mut self, bins: u8) -> Self {
        self.angle_tolerance = Some(bins);
        self
    }
    /// Sets all three bin tolerances at once.
    pub fn tolerance(self, bins: u8) -> Self {
        self.backbone_distance_tolerance(bins)
            .side_chain_distance_tolerance(bins)
            .angle_tolerance(bins)
    }
    pub fn atom_pairing_scheme(mut self, scheme: AtomPairingScheme) -> Self {
        self.atom_pairing_scheme = Some(scheme);
        self
    }
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(self) -> Result<QueryParameters, ConfigError> {
        let defaults = QueryParameters::default();
        let rmsd_cutoff = self.rmsd_cutoff.unwrap_or(defaults.rmsd_cutoff);
        if !rmsd_cutoff.is_finite() || rmsd_cutoff < 0.0 {
            return Err(invalid(
                "rmsd_cutoff",
                format!("must be a non-negative distance, got {}", rmsd_cutoff),
            ));
        }
        Ok(QueryParameters {
            rmsd_cutoff,
            backbone_distance_tolerance: self
                .backbone_distance_tolerance
                .unwrap_or(defaults.backbone_distance_tolerance),
            side_chain_distance_tolerance: self
                .side_chain_distance_tolerance
                .unwrap_or(defaults.side_chain_distance_tolerance),
            angle_tolerance: self.angle_tolerance.unwrap_or(defaults.angle_tolerance),
            atom_pairing_scheme: self
                .atom_pairing_scheme
                .unwrap_or(defaults.atom_pairing_scheme),
            limit: self.limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_in_defaults() {
        let config = MotifSearchConfig::builder().build().unwrap();
        assert_eq!(config.distance_cutoff, 20.0);
        assert_eq!(config.max_results, 10_000);
        assert_eq!(config.decimal_places_rmsd, 2);
        assert_eq!(config.decimal_places_matrix, 3);
        assert!(config.number_threads >= 1);
        assert_eq!(config.binning().distance_bin_count(), 20);
    }

    #[test]
    fn builder_rejects_invalid_values() {
        let err = MotifSearchConfig::builder()
            .distance_cutoff(f64::NAN)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { parameter: "distance_cutoff", .. }));

        let err = MotifSearchConfig::builder().number_threads(0).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { parameter: "number_threads", .. }));

        let err = MotifSearchConfig::builder().max_motif_size(1).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { parameter: "max_motif_size", .. }));
    }

    #[test]
    fn builder_bounds_decimal_places() {
        let config = MotifSearchConfig::builder()
            .decimal_places_rmsd(MAX_DECIMAL_PLACES)
            .build()
            .unwrap();
        assert_eq!(config.decimal_places_rmsd, MAX_DECIMAL_PLACES);

        let err = MotifSearchConfig::builder()
            .decimal_places_rmsd(400)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { parameter: "decimal_places_rmsd", .. }));

        let err = MotifSearchConfig::builder()
            .decimal_places_matrix(MAX_DECIMAL_PLACES + 1)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { parameter: "decimal_places_matrix", .. }));
    }

    #[test]
    fn query_parameters_default_and_validate() {
        let params = QueryParameters::builder().tolerance(2).build().unwrap();
        assert_eq!(params.rmsd_cutoff, 2.0);
        assert_eq!(params.backbone_distance_tolerance, 2);
        assert_eq!(params.angle_tolerance, 2);
        assert_eq!(params.atom_pairing_scheme, AtomPairingScheme::SideChain);

        let err = QueryParameters::builder().rmsd_cutoff(-0.5).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { parameter: "rmsd_cutoff", .. }));
    }

    #[test]
    fn effective_limit_is_capped_by_max_results() {
        let config = MotifSearchConfig::builder().max_results(5).build().unwrap();
        let unbounded = QueryParameters::default();
        assert_eq!(unbounded.effective_limit(&config), 5);
        let small = QueryParameters::builder().limit(3).build().unwrap();
        assert_eq!(small.effective_limit(&config), 3);
        let large = QueryParameters::builder().limit(50).build().unwrap();
        assert_eq!(large.effective_limit(&config), 5);
    }
}
