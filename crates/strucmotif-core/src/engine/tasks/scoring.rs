use crate::engine::assembler::TargetStructure;
use crate::engine::context::SearchContext;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::query::{MotifSearchQuery, QueryStructure};
use crate::engine::scorer::{Hit, HitScorer};
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Default)]
pub struct ScoringOutcome {
    pub hits: Vec<Hit>,
    pub candidate_paths: usize,
}

/// Enumerates the correspondences of each target structure and scores them.
///
/// Structures are independent units of work. Hits keep the order of `targets`, and within a
/// structure the order of its correspondences.
#[instrument(skip_all, name = "scoring_task")]
pub fn run(
    targets: &[TargetStructure],
    structure: &QueryStructure,
    query: &MotifSearchQuery,
    context: &SearchContext,
    reporter: &ProgressReporter,
) -> Result<ScoringOutcome, EngineError> {
    info!(
        structures = targets.len(),
        rmsd_cutoff = query.parameters.rmsd_cutoff,
        scheme = %query.parameters.atom_pairing_scheme,
        "Scoring candidate structures."
    );
    reporter.report(Progress::TaskStart {
        total_steps: targets.len() as u64,
    });

    let scorer = HitScorer::new(query, context.repository);

    #[cfg(not(feature = "parallel"))]
    let iterator = targets.iter();

    #[cfg(feature = "parallel")]
    let iterator = targets.par_iter();

    let per_target = iterator
        .map(|target| {
            let paths = target.paths(structure);
            let hits = scorer.score_target(target, &paths);
            reporter.report(Progress::TaskIncrement);
            hits.map(|hits| (paths.len(), hits))
        })
        .collect::<Result<Vec<_>, _>>()?;

    reporter.report(Progress::TaskFinish);

    let mut outcome = ScoringOutcome::default();
    for (paths, hits) in per_target {
        outcome.candidate_paths += paths;
        outcome.hits.extend(hits);
    }
    info!(
        candidates = outcome.candidate_paths,
        accepted = outcome.hits.len(),
        "Scoring finished."
    );
    Ok(outcome)
}
