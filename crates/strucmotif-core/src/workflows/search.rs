use crate::engine::context::SearchContext;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::query::{MotifSearchQuery, QueryStructure};
use crate::engine::state::{SearchResult, SearchState, SearchTimings};
use crate::engine::tasks;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Searches the context's index for occurrences of the query motif.
///
/// Validation happens before any index access. Hits are collected for every candidate
/// correspondence and only then truncated to the effective limit; they are ordered by structure
/// identifier, then by correspondence.
#[instrument(skip_all, name = "motif_search_workflow")]
pub fn run(
    query: &MotifSearchQuery,
    context: &SearchContext,
    reporter: &ProgressReporter,
) -> Result<SearchResult, EngineError> {
    let mut state = SearchState::new();
    let result = execute(query, context, reporter, &mut state);
    if let Err(e) = &result {
        let phase = state.fail();
        warn!(%phase, error = %e, "Motif search failed.");
    }
    result
}

fn execute(
    query: &MotifSearchQuery,
    context: &SearchContext,
    reporter: &ProgressReporter,
    state: &mut SearchState,
) -> Result<SearchResult, EngineError> {
    let started = Instant::now();

    // === Phase 1: Validation ===
    let structure = reporter.phase(state.phase().name(), || {
        QueryStructure::prepare(query, &context.config)
    })?;
    info!(
        query = %query.structure_id,
        residues = query.residues.len(),
        descriptors = structure.edges.len(),
        tolerances = ?structure.tolerances,
        exchanges = ?query.exchanges,
        "Query prepared."
    );

    // === Phase 2: Target assembly ===
    state.advance();
    let assembly_started = Instant::now();
    let targets = reporter.phase(state.phase().name(), || {
        context.install(|| tasks::assembly::run(&structure, context, reporter))
    })?;
    let assembly = assembly_started.elapsed();

    // === Phase 3: Scoring ===
    state.advance();
    let scoring_started = Instant::now();
    let outcome = reporter.phase(state.phase().name(), || {
        context.install(|| tasks::scoring::run(&targets, &structure, query, context, reporter))
    })?;
    let scoring = scoring_started.elapsed();

    state.advance();
    let limit = query.parameters.effective_limit(&context.config);
    let mut hits = outcome.hits;
    let accepted = hits.len();
    hits.truncate(limit);

    let timings = SearchTimings {
        assembly,
        scoring,
        total: started.elapsed(),
    };
    reporter.report(Progress::Message(format!(
        "{} hit(s) in {} ms",
        hits.len(),
        timings.total_ms()
    )));
    info!(
        accepted,
        returned = hits.len(),
        limit,
        assembly_ms = timings.assembly_ms() as u64,
        scoring_ms = timings.scoring_ms() as u64,
        "Motif search complete."
    );

    Ok(SearchResult {
        hits,
        timings,
        lookups: structure.lookup_count(),
        candidate_structures: targets.len(),
        candidate_paths: outcome.candidate_paths,
    })
}
