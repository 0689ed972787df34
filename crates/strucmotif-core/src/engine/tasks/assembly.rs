use crate::engine::assembler::{TargetStructure, collect_edge, group_by_structure};
use crate::engine::context::SearchContext;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::query::QueryStructure;
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Issues every lookup of every query edge and keeps the structures that satisfy all edges.
#[instrument(skip_all, name = "assembly_task")]
pub fn run(
    query: &QueryStructure,
    context: &SearchContext,
    reporter: &ProgressReporter,
) -> Result<Vec<TargetStructure>, EngineError> {
    info!(
        edges = query.edges.len(),
        lookups = query.lookup_count(),
        "Collecting residue pair occurrences."
    );
    reporter.report(Progress::TaskStart {
        total_steps: query.edges.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = query.edges.iter();

    #[cfg(feature = "parallel")]
    let iterator = query.edges.par_iter();

    let per_edge = iterator
        .map(|edge| {
            let pairs = collect_edge(edge, context.index);
            reporter.report(Progress::TaskIncrement);
            pairs
        })
        .collect::<Result<Vec<_>, _>>()?;

    reporter.report(Progress::TaskFinish);

    let targets = group_by_structure(per_edge);
    info!(candidates = targets.len(), "Target assembly finished.");
    Ok(targets)
}
