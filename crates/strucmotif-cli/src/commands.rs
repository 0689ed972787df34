pub mod descriptors;
pub mod search;

use crate::error::{CliError, Result};
use crate::utils::parser::ResidueSelector;
use std::path::Path;
use strucmotif::core::io::archive::CsvArchive;
use strucmotif::core::io::traits::StructureFile;
use strucmotif::core::models::residue::Residue;
use strucmotif::core::models::structure::Structure;
use tracing::debug;

pub(crate) fn read_archive(path: &Path) -> Result<Vec<Structure>> {
    debug!(path = %path.display(), "Reading structure archive");
    CsvArchive::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

/// Picks the structure holding the motif: the named one, or the first in the archive.
pub(crate) fn pick_structure<'a>(
    structures: &'a [Structure],
    id: Option<&str>,
) -> Result<&'a Structure> {
    match id {
        Some(id) => structures
            .iter()
            .find(|s| s.id.as_str().eq_ignore_ascii_case(id))
            .ok_or_else(|| CliError::Argument(format!("Structure '{}' not found in query archive", id))),
        None => structures
            .first()
            .ok_or_else(|| CliError::Argument("Query archive holds no structures".to_string())),
    }
}

/// Resolves selectors against the first chain instance carrying each chain identifier.
pub(crate) fn motif_residues(
    structure: &Structure,
    selectors: &[ResidueSelector],
) -> Result<Vec<Residue>> {
    selectors
        .iter()
        .map(|selector| {
            structure
                .residues_iter()
                .find(|(selection, residue)| {
                    residue.identifier.seq_id == selector.seq_id
                        && structure
                            .chain_of(selection)
                            .is_some_and(|chain| chain.id == selector.chain_id)
                })
                .map(|(_, residue)| residue.clone())
                .ok_or_else(|| {
                    CliError::Argument(format!(
                        "Residue {} not found in structure '{}'",
                        selector, structure.id
                    ))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use strucmotif::core::models::residue::ResidueType;

    const ARCHIVE: &str = "\
structure,assembly,chain,index,seq_id,residue,atom,x,y,z
1abc,1,A,0,57,HIS,CA,0.0,0.0,0.0
1abc,1,B,1,57,SER,CA,1.0,0.0,0.0
2xyz,1,A,0,10,GLY,CA,0.0,0.0,0.0
";

    fn structures() -> Vec<Structure> {
        CsvArchive::read_from(&mut Cursor::new(ARCHIVE)).unwrap()
    }

    #[test]
    fn picks_named_or_first_structure() {
        let structures = structures();
        assert_eq!(pick_structure(&structures, None).unwrap().id.as_str(), "1abc");
        assert_eq!(
            pick_structure(&structures, Some("2XYZ")).unwrap().id.as_str(),
            "2xyz"
        );
        assert!(matches!(
            pick_structure(&structures, Some("9zzz")),
            Err(CliError::Argument(_))
        ));
        assert!(pick_structure(&[], None).is_err());
    }

    #[test]
    fn motif_residues_respect_chain_identifiers() {
        let structures = structures();
        let selectors = vec![
            ResidueSelector {
                chain_id: "B".to_string(),
                seq_id: 57,
            },
            ResidueSelector {
                chain_id: "A".to_string(),
                seq_id: 57,
            },
        ];
        let residues = motif_residues(&structures[0], &selectors).unwrap();
        assert_eq!(residues[0].residue_type(), ResidueType::Serine);
        assert_eq!(residues[1].residue_type(), ResidueType::Histidine);

        let missing = ResidueSelector {
            chain_id: "C".to_string(),
            seq_id: 57,
        };
        assert!(matches!(
            motif_residues(&structures[0], &[missing]),
            Err(CliError::Argument(_))
        ));
    }
}
