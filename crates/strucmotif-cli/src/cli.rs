use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Structural Motif Search Contributors",
    version,
    about = "strucmotif - find occurrences of small 3-D residue motifs across collections of macromolecular structures.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of worker threads used by a search.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search an archive of structures for a residue motif.
    Search(SearchArgs),
    /// Print the residue pair descriptors of a motif.
    Descriptors(DescriptorsArgs),
}

/// Where the motif comes from.
#[derive(Args, Debug, Clone)]
pub struct MotifArgs {
    /// Atom-table archive (CSV) holding the structure the motif is taken from.
    #[arg(short = 'Q', long = "query", required = true, value_name = "PATH")]
    pub query_archive: PathBuf,

    /// Identifier of the motif's structure inside the query archive.
    /// Defaults to the first structure in the archive.
    #[arg(long, value_name = "ID")]
    pub query_structure: Option<String>,

    /// Motif residues as CHAIN:SEQ_ID, comma separated (e.g. 'A:57,A:102,A:195').
    #[arg(
        short,
        long,
        required = true,
        value_delimiter = ',',
        value_name = "CHAIN:SEQ_ID"
    )]
    pub residues: Vec<String>,
}

/// Arguments for the `search` subcommand.
#[derive(Args, Debug)]
pub struct SearchArgs {
    // --- Core Arguments ---
    #[command(flatten)]
    pub motif: MotifArgs,

    /// Atom-table archive (CSV) of the structures to search.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub archive: PathBuf,

    /// Write hits to this CSV file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Accept alternative residue types at a motif position, e.g. 'A:195=THR,CYS'.
    /// Can be used multiple times.
    #[arg(short = 'x', long = "exchange", value_name = "CHAIN:SEQ_ID=TYPES")]
    pub exchanges: Vec<String>,

    // --- Service Overrides ---
    /// Override the maximum backbone distance (Å) of a residue pair.
    #[arg(long, value_name = "FLOAT")]
    pub distance_cutoff: Option<f64>,

    /// Override the maximum number of hits any query may return.
    #[arg(long, value_name = "INT")]
    pub max_results: Option<usize>,

    // --- Query Overrides ---
    /// Override the RMSD (Å) above which a candidate is rejected.
    #[arg(long, value_name = "FLOAT")]
    pub rmsd_cutoff: Option<f64>,

    /// Override all three bin tolerances at once.
    #[arg(short, long, value_name = "BINS")]
    pub tolerance: Option<u8>,

    /// Override the atoms used for superposition: all, backbone or side-chain.
    #[arg(short, long, value_name = "SCHEME")]
    pub pairing: Option<String>,

    /// Return at most this many hits.
    #[arg(short, long, value_name = "INT")]
    pub limit: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S query.rmsd-cutoff=1.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `descriptors` subcommand.
#[derive(Args, Debug)]
pub struct DescriptorsArgs {
    #[command(flatten)]
    pub motif: MotifArgs,

    /// Maximum backbone distance (Å) of a described residue pair.
    #[arg(long, value_name = "FLOAT")]
    pub distance_cutoff: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_with_overrides() {
        let cli = Cli::try_parse_from([
            "strucmotif",
            "-vv",
            "-j",
            "4",
            "search",
            "--query",
            "q.csv",
            "-r",
            "A:57,A:102,A:195",
            "-a",
            "targets.csv",
            "-x",
            "A:195=THR,CYS",
            "--rmsd-cutoff",
            "1.5",
            "-S",
            "query.limit=3",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, Some(4));
        let Commands::Search(args) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.motif.residues, vec!["A:57", "A:102", "A:195"]);
        assert_eq!(args.exchanges, vec!["A:195=THR,CYS"]);
        assert_eq!(args.rmsd_cutoff, Some(1.5));
        assert_eq!(args.set_values, vec!["query.limit=3"]);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from([
            "strucmotif",
            "-q",
            "-v",
            "descriptors",
            "--query",
            "q.csv",
            "-r",
            "A:1,A:2",
        ]);
        assert!(result.is_err());
    }
}
