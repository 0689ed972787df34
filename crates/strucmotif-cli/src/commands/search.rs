use crate::cli::SearchArgs;
use crate::config::builder::build_config;
use crate::config::models::AppConfig;
use crate::error::{CliError, Result};
use crate::output;
use crate::utils::progress::CliProgressHandler;
use std::fs::File;
use std::io::BufWriter;
use strucmotif::core::persistence::{MemoryInvertedIndex, MemoryStructureRepository};
use strucmotif::engine::context::SearchContext;
use strucmotif::engine::progress::ProgressReporter;
use strucmotif::engine::query::MotifSearchQuery;
use strucmotif::engine::state::SearchResult;
use strucmotif::workflows;
use tracing::{debug, info};

pub fn run(args: SearchArgs, threads: Option<usize>, show_progress: bool) -> Result<()> {
    info!("Starting motif search.");
    let config = build_config(&args, threads)?;
    debug!(
        service = ?config.service,
        parameters = ?config.parameters,
        "Configuration merged."
    );

    let result = search(&config, show_progress.then(CliProgressHandler::new))?;

    let summaries = result.summaries(&config.service);
    match &config.output_path {
        Some(path) => {
            let file = File::create(path)?;
            output::write_hits(&summaries, &result.timings, BufWriter::new(file))?;
            info!(path = %path.display(), "Hits written.");
        }
        None => output::write_hits(&summaries, &result.timings, std::io::stdout().lock())?,
    }

    info!(
        hits = result.hits.len(),
        lookups = result.lookups,
        candidate_structures = result.candidate_structures,
        candidate_paths = result.candidate_paths,
        assembly_ms = result.timings.assembly_ms(),
        scoring_ms = result.timings.scoring_ms(),
        total_ms = result.timings.total_ms(),
        "Motif search finished."
    );
    Ok(())
}

/// Indexes the target archive, builds the query and runs the search workflow.
fn search(config: &AppConfig, progress: Option<CliProgressHandler>) -> Result<SearchResult> {
    let query_structures = super::read_archive(&config.query_archive_path)?;
    let motif_structure = super::pick_structure(&query_structures, config.query_structure.as_deref())?;
    let residues = super::motif_residues(motif_structure, &config.residues)?;

    let mut builder = MotifSearchQuery::builder()
        .structure_id(motif_structure.id.clone())
        .residues(residues)
        .parameters(config.parameters.clone());
    for exchange in &config.exchanges {
        let position = config
            .residues
            .iter()
            .position(|r| *r == exchange.selector)
            .ok_or_else(|| {
                CliError::Argument(format!(
                    "Exchange refers to {} which is not a motif residue",
                    exchange.selector
                ))
            })?;
        builder = builder.exchange(position, exchange.types.iter().copied());
    }
    let query = builder.build().map_err(|e| CliError::Config(e.to_string()))?;

    let targets = super::read_archive(&config.archive_path)?;
    let mut index = MemoryInvertedIndex::new(config.service.binning());
    let mut repository = MemoryStructureRepository::new();
    for structure in targets {
        index.insert_structure(&structure);
        repository.insert(structure);
    }
    info!(
        structures = repository.len(),
        descriptors = index.len(),
        "Target archive indexed."
    );

    let context = SearchContext::new(config.service.clone(), &index, &repository)?;
    let reporter = match &progress {
        Some(handler) => ProgressReporter::with_callback(handler.get_callback()),
        None => ProgressReporter::new(),
    };
    Ok(workflows::search::run(&query, &context, &reporter)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::parser::{parse_exchange, parse_residue_selector};
    use std::fs;
    use std::path::Path;
    use strucmotif::engine::config::{MotifSearchConfig, QueryParameters};
    use strucmotif::engine::error::EngineError;
    use tempfile::tempdir;

    // HIS57, ASP102, SER195 of a catalytic triad.
    const TRIAD_ROWS: &[(&str, i32, &str, &str, [f64; 3])] = &[
        ("HIS", 57, "N", "0", [0.0, 0.0, 0.0]),
        ("HIS", 57, "CA", "0", [1.46, 0.0, 0.0]),
        ("HIS", 57, "C", "0", [2.0, 1.42, 0.0]),
        ("HIS", 57, "NE2", "0", [3.1, -2.4, 1.9]),
        ("ASP", 102, "N", "1", [5.0, 4.0, 1.0]),
        ("ASP", 102, "CA", "1", [6.4, 4.2, 1.2]),
        ("ASP", 102, "C", "1", [7.0, 5.6, 1.0]),
        ("ASP", 102, "CG", "1", [6.2, 2.6, 3.5]),
        ("SER", 195, "N", "2", [-2.0, 5.0, 2.0]),
        ("SER", 195, "CA", "2", [-1.2, 6.1, 2.6]),
        ("SER", 195, "C", "2", [-1.9, 7.4, 2.3]),
        ("SER", 195, "OG", "2", [0.4, 4.3, 3.9]),
    ];

    fn write_archive(path: &Path, ids_and_offsets: &[(&str, [f64; 3])]) {
        let mut text = String::from("structure,assembly,chain,index,seq_id,residue,atom,x,y,z\n");
        for (id, offset) in ids_and_offsets {
            for (residue, seq_id, atom, index, [x, y, z]) in TRIAD_ROWS {
                text.push_str(&format!(
                    "{id},1,A,{index},{seq_id},{residue},{atom},{},{},{}\n",
                    x + offset[0],
                    y + offset[1],
                    z + offset[2]
                ));
            }
        }
        fs::write(path, text).unwrap();
    }

    fn app_config(dir: &Path) -> AppConfig {
        let query_path = dir.join("query.csv");
        let archive_path = dir.join("targets.csv");
        write_archive(&query_path, &[("4cha", [0.0; 3])]);
        write_archive(
            &archive_path,
            &[("2xyz", [10.0, -3.0, 7.5]), ("1abc", [0.0; 3])],
        );
        AppConfig {
            archive_path,
            query_archive_path: query_path,
            query_structure: None,
            residues: ["A:57", "A:102", "A:195"]
                .iter()
                .map(|r| parse_residue_selector(r).unwrap())
                .collect(),
            exchanges: vec![],
            output_path: None,
            service: MotifSearchConfig::builder().number_threads(2).build().unwrap(),
            parameters: QueryParameters::default(),
        }
    }

    #[test]
    fn finds_translated_copies_in_archive_order_by_id() {
        let dir = tempdir().unwrap();
        let config = app_config(dir.path());

        let result = search(&config, None).unwrap();

        let ids: Vec<_> = result
            .hits
            .iter()
            .map(|h| h.structure_id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["1abc", "2xyz"]);
        assert!(result.hits.iter().all(|h| h.rmsd() < 1e-6));

        let summaries = result.summaries(&config.service);
        assert_eq!(
            summaries[0].residues,
            vec!["A:HIS57", "A:ASP102", "A:SER195"]
        );
        assert_eq!(summaries[1].transformation[3], 10.0);
    }

    #[test]
    fn exchange_must_name_a_motif_residue() {
        let dir = tempdir().unwrap();
        let mut config = app_config(dir.path());
        config.exchanges = vec![parse_exchange("A:99=THR").unwrap()];

        assert!(matches!(
            search(&config, None),
            Err(CliError::Argument(_))
        ));
    }

    #[test]
    fn motif_larger_than_service_limit_is_rejected_by_the_engine() {
        let dir = tempdir().unwrap();
        let mut config = app_config(dir.path());
        config.service.max_motif_size = 2;

        assert!(matches!(
            search(&config, None),
            Err(CliError::Search(EngineError::InvalidQuery(_)))
        ));
    }
}
