use crate::cli::DescriptorsArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use serde::Serialize;
use std::io::Write;
use strucmotif::engine::config::MotifSearchConfig;
use strucmotif::engine::query::MotifSearchQuery;
use tracing::info;

#[derive(Debug, Serialize)]
struct DescriptorRecord {
    first: String,
    second: String,
    descriptor: String,
    flipped: bool,
}

pub fn run(args: DescriptorsArgs) -> Result<()> {
    let records = describe(&args)?;
    info!(pairs = records.len(), "Motif described.");

    let mut writer = csv::Writer::from_writer(std::io::stdout().lock());
    write_records(&records, &mut writer)
}

fn describe(args: &DescriptorsArgs) -> Result<Vec<DescriptorRecord>> {
    let mut builder = MotifSearchConfig::builder();
    if let Some(cutoff) = args.distance_cutoff {
        builder = builder.distance_cutoff(cutoff);
    }
    let config = builder.build().map_err(|e| CliError::Config(e.to_string()))?;

    let selectors = args
        .motif
        .residues
        .iter()
        .map(|r| parser::parse_residue_selector(r))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| CliError::Argument(e.to_string()))?;

    let structures = super::read_archive(&args.motif.query_archive)?;
    let structure = super::pick_structure(&structures, args.motif.query_structure.as_deref())?;
    let residues = super::motif_residues(structure, &selectors)?;

    let query = MotifSearchQuery::builder()
        .structure_id(structure.id.clone())
        .residues(residues)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(query
        .descriptors(&config.binning())
        .into_iter()
        .map(|(first, second, descriptor)| DescriptorRecord {
            first: selectors[first].to_string(),
            second: selectors[second].to_string(),
            descriptor: descriptor.to_string(),
            flipped: descriptor.flipped,
        })
        .collect())
}

fn write_records<W: Write>(records: &[DescriptorRecord], writer: &mut csv::Writer<W>) -> Result<()> {
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
