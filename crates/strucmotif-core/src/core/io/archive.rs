use super::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::chain::Chain;
use crate::core::models::ids::StructureId;
use crate::core::models::residue::{ParseResidueTypeError, Residue, ResidueIdentifier, ResidueType};
use crate::core::models::structure::Structure;
use nalgebra::{Matrix4, Point3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Parse error on line {line}: {source}")]
    Parse {
        line: u64,
        #[source]
        source: ParseResidueTypeError,
    },
    #[error("Inconsistent data on line {line}: {message}")]
    Inconsistency { line: u64, message: String },
}

/// One atom per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct AtomRecord {
    structure: String,
    assembly: u32,
    chain: String,
    index: usize,
    seq_id: i32,
    residue: String,
    atom: String,
    x: f64,
    y: f64,
    z: f64,
}

/// Comma-separated atom table with a header row.
///
/// Coordinates are stored as final positions, so chains are rebuilt with identity operators.
/// Rows of one residue must be contiguous, and a residue index may be used by only one residue
/// per assembly of a structure, whichever chain it is in.
pub struct CsvArchive;

#[derive(Default)]
struct ChainDraft {
    id: String,
    assembly_id: u32,
    residues: Vec<(ResidueIdentifier, Vec<Atom>)>,
}

#[derive(Default)]
struct StructureDraft {
    id: String,
    chains: Vec<ChainDraft>,
    /// Chain that owns each `(assembly, index)` position.
    owners: HashMap<(u32, usize), String>,
}

impl StructureDraft {
    fn chain_slot(&mut self, id: &str, assembly_id: u32) -> usize {
        match self
            .chains
            .iter()
            .position(|c| c.id == id && c.assembly_id == assembly_id)
        {
            Some(pos) => pos,
            None => {
                self.chains.push(ChainDraft {
                    id: id.to_string(),
                    assembly_id,
                    residues: Vec::new(),
                });
                self.chains.len() - 1
            }
        }
    }

    fn build(self) -> Structure {
        let chains = self
            .chains
            .into_iter()
            .map(|c| {
                let residues = c
                    .residues
                    .into_iter()
                    .map(|(identifier, atoms)| Residue::new(identifier, atoms))
                    .collect();
                Chain::new(&c.id, c.assembly_id, residues, Matrix4::identity())
            })
            .collect();
        Structure::new(StructureId::new(&self.id), chains)
    }
}

impl StructureFile for CsvArchive {
    type Error = ArchiveError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Structure>, Self::Error> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let mut drafts: Vec<StructureDraft> = Vec::new();
        let mut draft_slots: HashMap<String, usize> = HashMap::new();
        for result in csv_reader.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());
            let row: AtomRecord = record.deserialize(Some(&headers))?;

            let residue_type: ResidueType = row
                .residue
                .parse()
                .map_err(|source| ArchiveError::Parse { line, source })?;
            let identifier = ResidueIdentifier {
                residue_type,
                seq_id: row.seq_id,
                index: row.index,
            };

            let structure_key = row.structure.trim().to_lowercase();
            let slot = *draft_slots.entry(structure_key).or_insert_with_key(|key| {
                drafts.push(StructureDraft {
                    id: key.clone(),
                    ..Default::default()
                });
                drafts.len() - 1
            });
            let draft = &mut drafts[slot];
            let chain_slot = draft.chain_slot(&row.chain, row.assembly);
            let chain = &mut draft.chains[chain_slot];
            let atom = Atom::new(&row.atom, Point3::new(row.x, row.y, row.z));

            match chain.residues.last_mut() {
                Some((last, atoms)) if last.index == identifier.index => {
                    if *last != identifier {
                        return Err(ArchiveError::Inconsistency {
                            line,
                            message: format!(
                                "residue index {} is both {} and {}",
                                identifier.index, last, identifier
                            ),
                        });
                    }
                    atoms.push(atom);
                }
                _ => {
                    match draft.owners.entry((row.assembly, identifier.index)) {
                        Entry::Occupied(owner) => {
                            let message = if *owner.get() == row.chain {
                                format!(
                                    "rows of residue index {} in chain {} are not contiguous",
                                    identifier.index, row.chain
                                )
                            } else {
                                format!(
                                    "residue index {} of assembly {} is used by chains {} and {}",
                                    identifier.index,
                                    row.assembly,
                                    owner.get(),
                                    row.chain
                                )
                            };
                            return Err(ArchiveError::Inconsistency { line, message });
                        }
                        Entry::Vacant(owner) => {
                            owner.insert(row.chain.clone());
                        }
                    }
                    chain.residues.push((identifier, vec![atom]));
                }
            }
        }

        Ok(drafts.into_iter().map(StructureDraft::build).collect())
    }

    fn write_to(structures: &[Structure], writer: &mut impl Write) -> Result<(), Self::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for structure in structures {
            for chain in structure.chains() {
                for residue in chain.residues() {
                    for atom in residue.atoms() {
                        csv_writer.serialize(AtomRecord {
                            structure: structure.id.to_string(),
                            assembly: chain.assembly_id,
                            chain: chain.id.clone(),
                            index: residue.identifier.index,
                            seq_id: residue.identifier.seq_id,
                            residue: residue.residue_type().to_string(),
                            atom: atom.name.clone(),
                            x: atom.position.x,
                            y: atom.position.y,
                            z: atom.position.z,
                        })?;
                    }
                }
            }
        }
        csv_writer.flush()?;
        Ok(())
    }
}
