use super::config::{ConfigError, MotifSearchConfig, QueryParameters};
use super::tolerance::{self, Lookup, Tolerances};
use crate::core::models::ids::StructureId;
use crate::core::models::residue::{Residue, ResidueType};
use crate::core::motif::descriptor::{Binning, ResiduePairDescriptor, descriptor_of};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum QueryError {
    #[error(
        "No residue pair descriptors could be derived from the query motif; all residues need \
         their representative atoms and pairs must lie within the distance cutoff of {distance_cutoff} Å"
    )]
    NoDescriptors { distance_cutoff: f64 },

    #[error("Query motif has {size} residues, supported sizes are 2 to {max}")]
    MotifSize { size: usize, max: usize },

    #[error("Query motif is disconnected: residue {residue} shares no descriptor with residue {anchor}")]
    Disconnected { residue: String, anchor: String },

    #[error("Exchange refers to motif position {position}, but the motif has {size} residues")]
    UnknownExchangePosition { position: usize, size: usize },
}

/// A motif to search for, the query-level parameters, and optional residue exchanges.
#[derive(Debug, Clone)]
pub struct MotifSearchQuery {
    pub structure_id: StructureId,
    pub residues: Vec<Residue>,
    pub parameters: QueryParameters,
    /// Alternative residue types accepted at a motif position (by position in `residues`).
    pub exchanges: BTreeMap<usize, Vec<ResidueType>>,
}

impl MotifSearchQuery {
    pub fn builder() -> MotifSearchQueryBuilder {
        MotifSearchQueryBuilder::new()
    }

    /// Residue types admissible at `position`: the residue's own type first, then its exchanges.
    pub fn admissible_types(&self, position: usize) -> Vec<ResidueType> {
        let mut types: Vec<ResidueType> = self
            .residues
            .get(position)
            .map(|r| r.residue_type())
            .into_iter()
            .collect();
        if let Some(exchanges) = self.exchanges.get(&position) {
            for t in exchanges {
                if !types.contains(t) {
                    types.push(*t);
                }
            }
        }
        types
    }

    /// Descriptors of every residue pair `i < j` that can be described.
    pub fn descriptors(&self, binning: &Binning) -> Vec<(usize, usize, ResiduePairDescriptor)> {
        let mut descriptors = Vec::new();
        for i in 0..self.residues.len() {
            for j in i + 1..self.residues.len() {
                match descriptor_of(&self.residues[i], &self.residues[j], binning) {
                    Ok(d) => descriptors.push((i, j, d)),
                    Err(e) => debug!(
                        first = %self.residues[i].identifier,
                        second = %self.residues[j].identifier,
                        reason = %e,
                        "Query residue pair excluded"
                    ),
                }
            }
        }
        descriptors
    }
}

#[derive(Default)]
pub struct MotifSearchQueryBuilder {
    structure_id: Option<StructureId>,
    residues: Option<Vec<Residue>>,
    parameters: Option<QueryParameters>,
    exchanges: BTreeMap<usize, Vec<ResidueType>>,
}

impl MotifSearchQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn structure_id(mut self, id: StructureId) -> Self {
        self.structure_id = Some(id);
        self
    }
    pub fn residues(mut self, residues: Vec<Residue>) -> Self {
        self.residues = Some(residues);
        self
    }
    pub fn parameters(mut self, parameters: QueryParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }
    pub fn exchange(mut self, position: usize, types: impl IntoIterator<Item = ResidueType>) -> Self {
        self.exchanges.entry(position).or_default().extend(types);
        self
    }

    pub fn build(self) -> Result<MotifSearchQuery, ConfigError> {
        Ok(MotifSearchQuery {
            structure_id: self
                .structure_id
                .unwrap_or_else(|| StructureId::new("query")),
            residues: self
                .residues
                .ok_or(ConfigError::MissingParameter("residues"))?,
            parameters: self.parameters.unwrap_or_default(),
            exchanges: self.exchanges,
        })
    }
}

/// A query pair with its tolerance-expanded lookups, in query order `first < second`.
#[derive(Debug, Clone)]
pub struct QueryEdge {
    pub first: usize,
    pub second: usize,
    pub descriptor: ResiduePairDescriptor,
    pub lookups: Vec<Lookup>,
}

/// The validated constraint graph of a query.
#[derive(Debug, Clone)]
pub struct QueryStructure {
    pub size: usize,
    pub edges: Vec<QueryEdge>,
    pub tolerances: Tolerances,
}

impl QueryStructure {
    /// Validates `query` and resolves its descriptors, tolerances and exchanges into lookups.
    ///
    /// Performs no index access.
    pub fn prepare(query: &MotifSearchQuery, config: &MotifSearchConfig) -> Result<Self, QueryError> {
        let size = query.residues.len();
        if size > config.max_motif_size {
            return Err(QueryError::MotifSize {
                size,
                max: config.max_motif_size,
            });
        }
        if let Some(&position) = query.exchanges.keys().find(|&&p| p >= size) {
            return Err(QueryError::UnknownExchangePosition { position, size });
        }

        let binning = config.binning();
        let descriptors = query.descriptors(&binning);
        if descriptors.is_empty() {
            return Err(QueryError::NoDescriptors {
                distance_cutoff: config.distance_cutoff,
            });
        }

        if let Some(unreached) = first_unreachable(size, descriptors.iter().map(|(i, j, _)| (*i, *j))) {
            return Err(QueryError::Disconnected {
                residue: query.residues[unreached].identifier.to_string(),
                anchor: query.residues[0].identifier.to_string(),
            });
        }

        let tolerances = Tolerances::from(&query.parameters);
        let admissible: Vec<_> = (0..size).map(|p| query.admissible_types(p)).collect();
        let edges = descriptors
            .into_iter()
            .map(|(first, second, descriptor)| QueryEdge {
                first,
                second,
                descriptor,
                lookups: tolerance::expand(
                    &admissible[first],
                    &admissible[second],
                    &descriptor,
                    &tolerances,
                    &binning,
                ),
            })
            .collect();

        Ok(Self {
            size,
            edges,
            tolerances,
        })
    }

    pub fn lookup_count(&self) -> usize {
        self.edges.iter().map(|e| e.lookups.len()).sum()
    }
}

/// First node not connected to node 0, if any.
fn first_unreachable(size: usize, edges: impl Iterator<Item = (usize, usize)>) -> Option<usize> {
    let mut parent: Vec<usize> = (0..size).collect();
    fn root(parent: &mut [usize], mut node: usize) -> usize {
        while parent[node] != node {
            parent[node] = parent[parent[node]];
            node = parent[node];
        }
        node
    }
    for (a, b) in edges {
        let (ra, rb) = (root(&mut parent, a), root(&mut parent, b));
        if ra != rb {
            parent[rb] = ra;
        }
    }
    let anchor = root(&mut parent, 0);
    (1..size).find(|&n| root(&mut parent, n) != anchor)
}
