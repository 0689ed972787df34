use super::assembler::{Correspondence, TargetStructure};
use super::config::MotifSearchConfig;
use super::error::EngineError;
use super::query::MotifSearchQuery;
use crate::core::align::{AlignmentError, AlignmentResult, AtomPairingScheme, align};
use crate::core::models::ids::{IndexSelection, StructureId};
use crate::core::models::residue::Residue;
use crate::core::models::structure::Structure;
use crate::core::persistence::{StorageError, StructureRepository};
use crate::core::utils::geometry::round_to;
use serde::Serialize;
use tracing::{debug, trace};

/// An accepted correspondence: the query motif superposed onto target residues within the RMSD
/// cutoff.
#[derive(Debug, Clone)]
pub struct Hit {
    pub structure_id: StructureId,
    pub correspondence: Correspondence,
    /// Chain-qualified labels of the matched residues, in query order.
    pub residue_labels: Vec<String>,
    pub alignment: AlignmentResult,
}

impl Hit {
    pub fn rmsd(&self) -> f64 {
        self.alignment.rmsd
    }

    pub fn summary(&self, config: &MotifSearchConfig) -> HitSummary {
        HitSummary {
            structure_id: self.structure_id.to_string(),
            rmsd: round_to(self.alignment.rmsd, config.decimal_places_rmsd),
            transformation: self
                .alignment
                .transformation
                .rounded(config.decimal_places_matrix),
            residues: self.residue_labels.clone(),
        }
    }
}

/// Reporting view of a [`Hit`] with rounded numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitSummary {
    pub structure_id: String,
    pub rmsd: f64,
    /// Row-major 4×4 matrix moving the query onto the hit.
    pub transformation: [f64; 16],
    pub residues: Vec<String>,
}

/// Resolves correspondences to residues, superposes the query, and applies the RMSD cutoff.
pub struct HitScorer<'a> {
    query_residues: &'a [Residue],
    scheme: AtomPairingScheme,
    rmsd_cutoff: f64,
    repository: &'a dyn StructureRepository,
}

impl<'a> HitScorer<'a> {
    pub fn new(query: &'a MotifSearchQuery, repository: &'a dyn StructureRepository) -> Self {
        Self {
            query_residues: &query.residues,
            scheme: query.parameters.atom_pairing_scheme,
            rmsd_cutoff: query.parameters.rmsd_cutoff,
            repository,
        }
    }

    /// Scores all correspondences of one structure with a single repository load.
    pub fn score_target(
        &self,
        target: &TargetStructure,
        paths: &[Correspondence],
    ) -> Result<Vec<Hit>, EngineError> {
        if paths.is_empty() {
            return Ok(Vec::new());
        }
        let mut selections: Vec<IndexSelection> = paths.iter().flatten().copied().collect();
        selections.sort_unstable();
        selections.dedup();

        let structure = self.repository.select(&target.structure_id, &selections)?;

        let mut hits = Vec::new();
        for path in paths {
            if let Some(hit) = self.score(&structure, path)? {
                hits.push(hit);
            }
        }
        debug!(
            structure = %target.structure_id,
            candidates = paths.len(),
            accepted = hits.len(),
            "Scored structure"
        );
        Ok(hits)
    }

    /// Scores one correspondence against an already loaded structure.
    ///
    /// Returns `Ok(None)` for rejected or unalignable candidates. A residue the structure cannot
    /// provide is a storage failure.
    pub fn score(&self, structure: &Structure, path: &[IndexSelection]) -> Result<Option<Hit>, EngineError> {
        let candidate = path
            .iter()
            .map(|selection| {
                structure
                    .residue(selection)
                    .cloned()
                    .ok_or_else(|| StorageError::ResidueUnavailable {
                        structure_id: structure.id.clone(),
                        selection: *selection,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let alignment = match align(self.query_residues, &candidate, self.scheme) {
            Ok(alignment) => alignment,
            Err(e @ AlignmentError::LengthMismatch { .. }) => {
                return Err(EngineError::Internal(e.to_string()));
            }
            Err(e) => {
                debug!(structure = %structure.id, reason = %e, "Correspondence dropped");
                return Ok(None);
            }
        };

        if alignment.rmsd > self.rmsd_cutoff {
            trace!(structure = %structure.id, rmsd = alignment.rmsd, "Correspondence rejected");
            return Ok(None);
        }

        Ok(Some(Hit {
            structure_id: structure.id.clone(),
            correspondence: path.to_vec(),
            residue_labels: path
                .iter()
                .map(|s| structure.label(s).unwrap_or_else(|| s.to_string()))
                .collect(),
            alignment,
        }))
    }
}
