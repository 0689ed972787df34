use super::config::MotifSearchConfig;
use super::scorer::{Hit, HitSummary};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Stages of a single query. `Failed` can be entered from any other stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Validating,
    Assembling,
    Scoring,
    Done,
    Failed,
}

impl SearchPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validating => "Validating",
            Self::Assembling => "Assembling",
            Self::Scoring => "Scoring",
            Self::Done => "Done",
            Self::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    fn successor(&self) -> Option<SearchPhase> {
        match self {
            Self::Validating => Some(Self::Assembling),
            Self::Assembling => Some(Self::Scoring),
            Self::Scoring => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }
}

impl fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tracks the phase of a running query.
#[derive(Debug)]
pub struct SearchState {
    phase: SearchPhase,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            phase: SearchPhase::Validating,
        }
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Moves to the next phase in order. Terminal phases stay put.
    pub fn advance(&mut self) -> SearchPhase {
        if let Some(next) = self.phase.successor() {
            debug!(from = %self.phase, to = %next, "Search phase transition");
            self.phase = next;
        }
        self.phase
    }

    /// Marks the query failed and returns the phase it failed in.
    pub fn fail(&mut self) -> SearchPhase {
        let failed_in = self.phase;
        self.phase = SearchPhase::Failed;
        failed_in
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchTimings {
    pub assembly: Duration,
    pub scoring: Duration,
    pub total: Duration,
}

impl SearchTimings {
    pub fn assembly_ms(&self) -> u128 {
        self.assembly.as_millis()
    }
    pub fn scoring_ms(&self) -> u128 {
        self.scoring.as_millis()
    }
    pub fn total_ms(&self) -> u128 {
        self.total.as_millis()
    }
}

/// Outcome of a completed query.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub hits: Vec<Hit>,
    pub timings: SearchTimings,
    /// Index lookups issued after tolerance expansion.
    pub lookups: usize,
    /// Structures that had candidate pairs for every query edge.
    pub candidate_structures: usize,
    /// Complete correspondences handed to scoring.
    pub candidate_paths: usize,
}

impl SearchResult {
    pub fn summaries(&self, config: &MotifSearchConfig) -> Vec<HitSummary> {
        self.hits.iter().map(|h| h.summary(config)).collect()
    }
}
