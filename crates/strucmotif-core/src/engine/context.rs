use super::config::MotifSearchConfig;
use super::error::EngineError;
use crate::core::motif::descriptor::Binning;
use crate::core::persistence::{InvertedIndex, StructureRepository};

/// Everything a query needs besides the query itself.
///
/// The index and repository are only read during a search, so one context can serve any number
/// of sequential queries.
pub struct SearchContext<'a> {
    pub config: MotifSearchConfig,
    pub index: &'a dyn InvertedIndex,
    pub repository: &'a dyn StructureRepository,
    #[cfg(feature = "parallel")]
    pool: rayon::ThreadPool,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        config: MotifSearchConfig,
        index: &'a dyn InvertedIndex,
        repository: &'a dyn StructureRepository,
    ) -> Result<Self, EngineError> {
        #[cfg(feature = "parallel")]
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.number_threads)
            .thread_name(|i| format!("strucmotif-worker-{i}"))
            .build()
            .map_err(|e| EngineError::ThreadPool(e.to_string()))?;

        Ok(Self {
            config,
            index,
            repository,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    pub fn binning(&self) -> Binning {
        self.config.binning()
    }

    /// Runs `op` on this context's worker pool.
    pub(crate) fn install<R, F>(&self, op: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        #[cfg(feature = "parallel")]
        {
            self.pool.install(op)
        }
        #[cfg(not(feature = "parallel"))]
        {
            op()
        }
    }
}
