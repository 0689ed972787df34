use super::file::{FileConfig, FileQueryConfig, FileServiceConfig};
use super::models::AppConfig;
use crate::cli::SearchArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use std::str::FromStr;
use strucmotif::core::align::AtomPairingScheme;
use strucmotif::engine::config::{MotifSearchConfig, QueryParameters};

/// Merges command-line arguments, the optional config file and `--set` overrides.
///
/// Precedence per value: explicit flag, then `--set`, then file, then library default.
pub fn build_config(args: &SearchArgs, threads: Option<usize>) -> Result<AppConfig> {
    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let service_file = file_config.service.take().unwrap_or_default();
    let service = merge_service(args, threads, service_file)?;

    let query_file = file_config.query.take().unwrap_or_default();
    let parameters = merge_query(args, query_file)?;

    let residues = args
        .motif
        .residues
        .iter()
        .map(|r| parser::parse_residue_selector(r))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| CliError::Argument(e.to_string()))?;

    let exchanges = args
        .exchanges
        .iter()
        .map(|x| parser::parse_exchange(x))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| CliError::Argument(e.to_string()))?;

    Ok(AppConfig {
        archive_path: args.archive.clone(),
        query_archive_path: args.motif.query_archive.clone(),
        query_structure: args.motif.query_structure.clone(),
        residues,
        exchanges,
        output_path: args.output.clone(),
        service,
        parameters,
    })
}

fn merge_service(
    args: &SearchArgs,
    threads: Option<usize>,
    file: FileServiceConfig,
) -> Result<MotifSearchConfig> {
    let mut builder = MotifSearchConfig::builder();
    if let Some(cutoff) = args.distance_cutoff.or(file.distance_cutoff) {
        builder = builder.distance_cutoff(cutoff);
    }
    if let Some(n) = args.max_results.or(file.max_results) {
        builder = builder.max_results(n);
    }
    if let Some(n) = file.max_motif_size {
        builder = builder.max_motif_size(n);
    }
    if let Some(n) = threads.or(file.number_threads) {
        builder = builder.number_threads(n);
    }
    if let Some(places) = file.decimal_places_rmsd {
        builder = builder.decimal_places_rmsd(places);
    }
    if let Some(places) = file.decimal_places_matrix {
        builder = builder.decimal_places_matrix(places);
    }
    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

fn merge_query(args: &SearchArgs, file: FileQueryConfig) -> Result<QueryParameters> {
    let mut builder = QueryParameters::builder();
    if let Some(cutoff) = args.rmsd_cutoff.or(file.rmsd_cutoff) {
        builder = builder.rmsd_cutoff(cutoff);
    }
    if let Some(bins) = args.tolerance.or(file.backbone_distance_tolerance) {
        builder = builder.backbone_distance_tolerance(bins);
    }
    if let Some(bins) = args.tolerance.or(file.side_chain_distance_tolerance) {
        builder = builder.side_chain_distance_tolerance(bins);
    }
    if let Some(bins) = args.tolerance.or(file.angle_tolerance) {
        builder = builder.angle_tolerance(bins);
    }

    let scheme = match &args.pairing {
        Some(s) => Some(AtomPairingScheme::from_str(s).map_err(CliError::Argument)?),
        None => file.atom_pairing_scheme,
    };
    if let Some(scheme) = scheme {
        builder = builder.atom_pairing_scheme(scheme);
    }
    if let Some(limit) = args.limit.or(file.limit) {
        builder = builder.limit(limit);
    }
    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "service.distance-cutoff" => {
                config.service.get_or_insert_with(Default::default).distance_cutoff =
                    Some(parse_value(key, value_str, "float")?);
            }
            "service.max-results" => {
                config.service.get_or_insert_with(Default::default).max_results =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "service.max-motif-size" => {
                config.service.get_or_insert_with(Default::default).max_motif_size =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "service.number-threads" => {
                config.service.get_or_insert_with(Default::default).number_threads =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "service.decimal-places-rmsd" => {
                config.service.get_or_insert_with(Default::default).decimal_places_rmsd =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "service.decimal-places-matrix" => {
                config.service.get_or_insert_with(Default::default).decimal_places_matrix =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "query.rmsd-cutoff" => {
                config.query.get_or_insert_with(Default::default).rmsd_cutoff =
                    Some(parse_value(key, value_str, "float")?);
            }
            "query.backbone-distance-tolerance" => {
                config.query.get_or_insert_with(Default::default).backbone_distance_tolerance =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "query.side-chain-distance-tolerance" => {
                config.query.get_or_insert_with(Default::default).side_chain_distance_tolerance =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "query.angle-tolerance" => {
                config.query.get_or_insert_with(Default::default).angle_tolerance =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "query.atom-pairing-scheme" => {
                config.query.get_or_insert_with(Default::default).atom_pairing_scheme =
                    Some(AtomPairingScheme::from_str(value_str).map_err(CliError::Config)?);
            }
            "query.limit" => {
                config.query.get_or_insert_with(Default::default).limit =
                    Some(parse_value(key, value_str, "integer")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::MotifArgs;
    use std::fs;
    use std::path::PathBuf;
    use strucmotif::core::models::residue::ResidueType;
    use tempfile::tempdir;

    fn base_search_args() -> SearchArgs {
        SearchArgs {
            motif: MotifArgs {
                query_archive: PathBuf::from("query.csv"),
                query_structure: None,
                residues: vec!["A:57".to_string(), "A:102".to_string()],
            },
            archive: PathBuf::from("targets.csv"),
            output: None,
            config: None,
            exchanges: vec![],
            distance_cutoff: None,
            max_results: None,
            rmsd_cutoff: None,
            tolerance: None,
            pairing: None,
            limit: None,
            set_values: vec![],
        }
    }

    #[test]
    fn build_config_uses_library_defaults() {
        let app = build_config(&base_search_args(), None).unwrap();
        assert_eq!(app.service.distance_cutoff, 20.0);
        assert_eq!(app.parameters, QueryParameters::default());
        assert_eq!(app.residues.len(), 2);
        assert_eq!(app.residues[1].seq_id, 102);
        assert!(app.exchanges.is_empty());
    }

    #[test]
    fn build_config_reads_file_and_merges() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("config.toml");
        fs::write(
            &cfg_path,
            r#"
            [service]
            distance-cutoff = 12.0
            max-results = 50

            [query]
            rmsd-cutoff = 0.8
            backbone-distance-tolerance = 2
            angle-tolerance = 3
            atom-pairing-scheme = "all"
            "#,
        )
        .unwrap();

        let mut args = base_search_args();
        args.config = Some(cfg_path);
        args.rmsd_cutoff = Some(1.5);
        let app = build_config(&args, Some(3)).unwrap();

        assert_eq!(app.service.distance_cutoff, 12.0);
        assert_eq!(app.service.max_results, 50);
        assert_eq!(app.service.number_threads, 3);
        assert_eq!(app.parameters.rmsd_cutoff, 1.5);
        assert_eq!(app.parameters.backbone_distance_tolerance, 2);
        assert_eq!(app.parameters.side_chain_distance_tolerance, 1);
        assert_eq!(app.parameters.angle_tolerance, 3);
        assert_eq!(app.parameters.atom_pairing_scheme, AtomPairingScheme::All);
    }

    #[test]
    fn tolerance_flag_overrides_every_bin_tolerance() {
        let mut args = base_search_args();
        args.tolerance = Some(0);
        args.set_values = vec!["query.angle-tolerance=4".to_string()];
        let app = build_config(&args, None).unwrap();
        assert_eq!(app.parameters.backbone_distance_tolerance, 0);
        assert_eq!(app.parameters.side_chain_distance_tolerance, 0);
        assert_eq!(app.parameters.angle_tolerance, 0);
    }

    #[test]
    fn set_values_override_file_values() {
        let mut args = base_search_args();
        args.set_values = vec![
            "service.max-motif-size=4".to_string(),
            "query.atom-pairing-scheme=backbone".to_string(),
            "query.limit=7".to_string(),
        ];
        let app = build_config(&args, None).unwrap();
        assert_eq!(app.service.max_motif_size, 4);
        assert_eq!(
            app.parameters.atom_pairing_scheme,
            AtomPairingScheme::Backbone
        );
        assert_eq!(app.parameters.limit, Some(7));
    }

    #[test]
    fn invalid_set_values_are_config_errors() {
        for bad in ["query.rmsd-cutoff", "query.limit=many", "query.unknown=1"] {
            let mut args = base_search_args();
            args.set_values = vec![bad.to_string()];
            assert!(
                matches!(build_config(&args, None), Err(CliError::Config(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn invalid_library_values_surface_as_config_errors() {
        let mut args = base_search_args();
        args.distance_cutoff = Some(-1.0);
        assert!(matches!(
            build_config(&args, None),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn malformed_residues_and_exchanges_are_argument_errors() {
        let mut args = base_search_args();
        args.motif.residues = vec!["A57".to_string()];
        assert!(matches!(
            build_config(&args, None),
            Err(CliError::Argument(_))
        ));

        let mut args = base_search_args();
        args.exchanges = vec!["A:102=GLU".to_string()];
        let app = build_config(&args, None).unwrap();
        assert_eq!(app.exchanges[0].types, vec![ResidueType::GlutamicAcid]);

        args.pairing = Some("heavy".to_string());
        assert!(matches!(
            build_config(&args, None),
            Err(CliError::Argument(_))
        ));
    }
}
