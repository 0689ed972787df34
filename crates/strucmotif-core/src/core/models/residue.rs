use super::atom::Atom;
use crate::core::utils::geometry::{VIRTUAL_CB_PARAMS, calculate_cb_position};
use nalgebra::{Matrix4, Point3};
use phf::{Map, phf_map};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Residue types known to the index.
///
/// The declaration order is the fixed total order used to canonicalize residue pair descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResidueType {
    // --- Amino acids ---
    Alanine,       // ALA
    Arginine,      // ARG
    Asparagine,    // ASN
    AsparticAcid,  // ASP
    Cysteine,      // CYS
    Glutamine,     // GLN
    GlutamicAcid,  // GLU
    Glycine,       // GLY
    Histidine,     // HIS
    Isoleucine,    // ILE
    Leucine,       // LEU
    Lysine,        // LYS
    Methionine,    // MET
    Phenylalanine, // PHE
    Proline,       // PRO
    Serine,        // SER
    Threonine,     // THR
    Tryptophan,    // TRP
    Tyrosine,      // TYR
    Valine,        // VAL

    // --- Ribonucleotides ---
    Adenosine, // A
    Cytidine,  // C
    Guanosine, // G
    Uridine,   // U

    // --- Deoxyribonucleotides ---
    Deoxyadenosine, // DA
    Deoxycytidine,  // DC
    Deoxyguanosine, // DG
    Deoxythymidine, // DT
}

static THREE_LETTER_CODES: Map<&'static str, ResidueType> = phf_map! {
    "ALA" => ResidueType::Alanine,
    "ARG" => ResidueType::Arginine,
    "ASN" => ResidueType::Asparagine,
    "ASP" => ResidueType::AsparticAcid,
    "CYS" => ResidueType::Cysteine,
    "GLN" => ResidueType::Glutamine,
    "GLU" => ResidueType::GlutamicAcid,
    "GLY" => ResidueType::Glycine,
    "HIS" => ResidueType::Histidine,
    "ILE" => ResidueType::Isoleucine,
    "LEU" => ResidueType::Leucine,
    "LYS" => ResidueType::Lysine,
    "MET" => ResidueType::Methionine,
    "PHE" => ResidueType::Phenylalanine,
    "PRO" => ResidueType::Proline,
    "SER" => ResidueType::Serine,
    "THR" => ResidueType::Threonine,
    "TRP" => ResidueType::Tryptophan,
    "TYR" => ResidueType::Tyrosine,
    "VAL" => ResidueType::Valine,
    "A" => ResidueType::Adenosine,
    "C" => ResidueType::Cytidine,
    "G" => ResidueType::Guanosine,
    "U" => ResidueType::Uridine,
    "DA" => ResidueType::Deoxyadenosine,
    "DC" => ResidueType::Deoxycytidine,
    "DG" => ResidueType::Deoxyguanosine,
    "DT" => ResidueType::Deoxythymidine,
};

static ONE_LETTER_CODES: Map<char, ResidueType> = phf_map! {
    'A' => ResidueType::Alanine,
    'R' => ResidueType::Arginine,
    'N' => ResidueType::Asparagine,
    'D' => ResidueType::AsparticAcid,
    'C' => ResidueType::Cysteine,
    'Q' => ResidueType::Glutamine,
    'E' => ResidueType::GlutamicAcid,
    'G' => ResidueType::Glycine,
    'H' => ResidueType::Histidine,
    'I' => ResidueType::Isoleucine,
    'L' => ResidueType::Leucine,
    'K' => ResidueType::Lysine,
    'M' => ResidueType::Methionine,
    'F' => ResidueType::Phenylalanine,
    'P' => ResidueType::Proline,
    'S' => ResidueType::Serine,
    'T' => ResidueType::Threonine,
    'W' => ResidueType::Tryptophan,
    'Y' => ResidueType::Tyrosine,
    'V' => ResidueType::Valine,
};

impl ResidueType {
    pub const ALL: [ResidueType; 28] = [
        ResidueType::Alanine,
        ResidueType::Arginine,
        ResidueType::Asparagine,
        ResidueType::AsparticAcid,
        ResidueType::Cysteine,
        ResidueType::Glutamine,
        ResidueType::GlutamicAcid,
        ResidueType::Glycine,
        ResidueType::Histidine,
        ResidueType::Isoleucine,
        ResidueType::Leucine,
        ResidueType::Lysine,
        ResidueType::Methionine,
        ResidueType::Phenylalanine,
        ResidueType::Proline,
        ResidueType::Serine,
        ResidueType::Threonine,
        ResidueType::Tryptophan,
        ResidueType::Tyrosine,
        ResidueType::Valine,
        ResidueType::Adenosine,
        ResidueType::Cytidine,
        ResidueType::Guanosine,
        ResidueType::Uridine,
        ResidueType::Deoxyadenosine,
        ResidueType::Deoxycytidine,
        ResidueType::Deoxyguanosine,
        ResidueType::Deoxythymidine,
    ];

    pub fn from_one_letter(code: char) -> Option<Self> {
        ONE_LETTER_CODES.get(&code.to_ascii_uppercase()).copied()
    }

    /// Parses a user-supplied code where single letters name amino acids.
    ///
    /// `"A"`, `"C"` and `"G"` resolve to alanine, cysteine and glycine here, while [`FromStr`]
    /// reads them as the nucleotide component ids found in structure archives.
    pub fn parse_amino_acid_first(s: &str) -> Result<Self, ParseResidueTypeError> {
        let code = s.trim();
        let mut chars = code.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(residue_type) = Self::from_one_letter(c) {
                return Ok(residue_type);
            }
        }
        s.parse()
    }

    pub fn to_three_letter(&self) -> &'static str {
        match self {
            ResidueType::Alanine => "ALA",
            ResidueType::Arginine => "ARG",
            ResidueType::Asparagine => "ASN",
            ResidueType::AsparticAcid => "ASP",
            ResidueType::Cysteine => "CYS",
            ResidueType::Glutamine => "GLN",
            ResidueType::GlutamicAcid => "GLU",
            ResidueType::Glycine => "GLY",
            ResidueType::Histidine => "HIS",
            ResidueType::Isoleucine => "ILE",
            ResidueType::Leucine => "LEU",
            ResidueType::Lysine => "LYS",
            ResidueType::Methionine => "MET",
            ResidueType::Phenylalanine => "PHE",
            ResidueType::Proline => "PRO",
            ResidueType::Serine => "SER",
            ResidueType::Threonine => "THR",
            ResidueType::Tryptophan => "TRP",
            ResidueType::Tyrosine => "TYR",
            ResidueType::Valine => "VAL",
            ResidueType::Adenosine => "A",
            ResidueType::Cytidine => "C",
            ResidueType::Guanosine => "G",
            ResidueType::Uridine => "U",
            ResidueType::Deoxyadenosine => "DA",
            ResidueType::Deoxycytidine => "DC",
            ResidueType::Deoxyguanosine => "DG",
            ResidueType::Deoxythymidine => "DT",
        }
    }

    pub fn is_nucleotide(&self) -> bool {
        *self >= ResidueType::Adenosine
    }

    /// Atom representing the backbone position of this residue.
    pub fn backbone_atom_name(&self) -> &'static str {
        if self.is_nucleotide() { "C4'" } else { "CA" }
    }

    /// Atom representing the side chain (or base) of this residue.
    ///
    /// `None` for glycine, whose side chain is represented by a virtual beta carbon.
    pub fn side_chain_atom_name(&self) -> Option<&'static str> {
        let name = match self {
            ResidueType::Alanine => "CB",
            ResidueType::Arginine => "CZ",
            ResidueType::Asparagine => "CG",
            ResidueType::AsparticAcid => "CG",
            ResidueType::Cysteine => "SG",
            ResidueType::Glutamine => "CD",
            ResidueType::GlutamicAcid => "CD",
            ResidueType::Glycine => return None,
            ResidueType::Histidine => "NE2",
            ResidueType::Isoleucine => "CD1",
            ResidueType::Leucine => "CG",
            ResidueType::Lysine => "NZ",
            ResidueType::Methionine => "SD",
            ResidueType::Phenylalanine => "CZ",
            ResidueType::Proline => "CG",
            ResidueType::Serine => "OG",
            ResidueType::Threonine => "OG1",
            ResidueType::Tryptophan => "CZ2",
            ResidueType::Tyrosine => "OH",
            ResidueType::Valine => "CB",
            ResidueType::Adenosine
            | ResidueType::Guanosine
            | ResidueType::Deoxyadenosine
            | ResidueType::Deoxyguanosine => "N1",
            ResidueType::Cytidine
            | ResidueType::Uridine
            | ResidueType::Deoxycytidine
            | ResidueType::Deoxythymidine => "N3",
        };
        Some(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown residue type code: '{0}'")]
pub struct ParseResidueTypeError(pub String);

impl FromStr for ResidueType {
    type Err = ParseResidueTypeError;

    /// Parses a component id as written in structure archives, falling back to one-letter amino
    /// acid codes. Single-letter component ids (`A`, `C`, `G`, `U`) are nucleotides.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        if let Some(residue_type) = THREE_LETTER_CODES.get(code.as_str()) {
            return Ok(*residue_type);
        }
        let mut chars = code.chars();
        let one_letter = match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_one_letter(c),
            _ => None,
        };
        one_letter.ok_or_else(|| ParseResidueTypeError(s.to_string()))
    }
}

impl fmt::Display for ResidueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_three_letter())
    }
}

/// Identity of a residue: its type, author sequence position and the stable index within its structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResidueIdentifier {
    pub residue_type: ResidueType,
    pub seq_id: i32,
    pub index: usize,
}

impl fmt::Display for ResidueIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.residue_type, self.seq_id)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Residue {residue} lacks required atom '{atom}'")]
pub struct MissingAtomError {
    pub residue: String,
    pub atom: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub identifier: ResidueIdentifier,
    atoms: Vec<Atom>,                 // Atoms in source order
    atom_map: HashMap<String, usize>, // Map from atom name to its position in `atoms`
}

impl Residue {
    pub fn new(identifier: ResidueIdentifier, atoms: Vec<Atom>) -> Self {
        let mut atom_map = HashMap::with_capacity(atoms.len());
        for (i, atom) in atoms.iter().enumerate() {
            atom_map.entry(atom.name.clone()).or_insert(i);
        }
        Self {
            identifier,
            atoms,
            atom_map,
        }
    }

    pub fn residue_type(&self) -> ResidueType {
        self.identifier.residue_type
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atom_map.get(name).map(|&i| &self.atoms[i])
    }

    /// Returns a copy of this residue with every atom moved by `transform`.
    pub fn transformed(&self, transform: &Matrix4<f64>) -> Self {
        Self {
            identifier: self.identifier,
            atoms: self.atoms.iter().map(|a| a.transformed(transform)).collect(),
            atom_map: self.atom_map.clone(),
        }
    }

    pub fn backbone_point(&self) -> Result<Point3<f64>, MissingAtomError> {
        self.required_position(self.residue_type().backbone_atom_name())
    }

    /// Position standing in for the side chain: the representative atom, or a virtual beta
    /// carbon built from N, CA and C for glycine.
    pub fn side_chain_point(&self) -> Result<Point3<f64>, MissingAtomError> {
        match self.residue_type().side_chain_atom_name() {
            Some(name) => self.required_position(name),
            None => {
                let n = self.required_position("N")?;
                let ca = self.required_position("CA")?;
                let c = self.required_position("C")?;
                let cb = calculate_cb_position(&n, &ca, &c, &VIRTUAL_CB_PARAMS);
                if cb.coords.iter().all(|v| v.is_finite()) {
                    Ok(cb)
                } else {
                    Err(self.missing("CB"))
                }
            }
        }
    }

    fn required_position(&self, name: &'static str) -> Result<Point3<f64>, MissingAtomError> {
        self.atom(name)
            .map(|atom| atom.position)
            .ok_or_else(|| self.missing(name))
    }

    fn missing(&self, atom: &'static str) -> MissingAtomError {
        MissingAtomError {
            residue: self.identifier.to_string(),
            atom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn identifier(residue_type: ResidueType) -> ResidueIdentifier {
        ResidueIdentifier {
            residue_type,
            seq_id: 7,
            index: 3,
        }
    }

    fn glycine() -> Residue {
        Residue::new(
            identifier(ResidueType::Glycine),
            vec![
                Atom::new("N", Point3::new(-0.527, 1.36, 0.0)),
                Atom::new("CA", Point3::new(0.0, 0.0, 0.0)),
                Atom::new("C", Point3::new(1.525, 0.0, 0.0)),
                Atom::new("O", Point3::new(2.1, -1.0, 0.0)),
            ],
        )
    }

    #[test]
    fn residue_type_parses_three_and_one_letter_codes() {
        assert_eq!("his".parse::<ResidueType>(), Ok(ResidueType::Histidine));
        assert_eq!("W".parse::<ResidueType>(), Ok(ResidueType::Tryptophan));
        assert_eq!("DT".parse::<ResidueType>(), Ok(ResidueType::Deoxythymidine));
        assert_eq!(
            "XYZ".parse::<ResidueType>(),
            Err(ParseResidueTypeError("XYZ".to_string()))
        );
    }

    #[test]
    fn single_letters_shared_with_nucleotides_depend_on_the_parser() {
        assert_eq!("A".parse::<ResidueType>(), Ok(ResidueType::Adenosine));
        assert_eq!("g".parse::<ResidueType>(), Ok(ResidueType::Guanosine));

        let amino = ResidueType::parse_amino_acid_first;
        assert_eq!(amino("A"), Ok(ResidueType::Alanine));
        assert_eq!(amino("c"), Ok(ResidueType::Cysteine));
        assert_eq!(amino(" G "), Ok(ResidueType::Glycine));
        assert_eq!(amino("U"), Ok(ResidueType::Uridine));
        assert_eq!(amino("DA"), Ok(ResidueType::Deoxyadenosine));
        assert_eq!(amino("cys"), Ok(ResidueType::Cysteine));
        assert_eq!(amino("B"), Err(ParseResidueTypeError("B".to_string())));
    }

    #[test]
    fn three_letter_codes_round_trip_for_every_type() {
        for residue_type in ResidueType::ALL {
            assert_eq!(
                residue_type.to_three_letter().parse::<ResidueType>(),
                Ok(residue_type)
            );
        }
    }

    #[test]
    fn total_order_follows_declaration_order() {
        assert!(ResidueType::Alanine < ResidueType::Serine);
        assert!(ResidueType::Valine < ResidueType::Adenosine);
        assert!(ResidueType::Adenosine.is_nucleotide());
        assert!(!ResidueType::Valine.is_nucleotide());
    }

    #[test]
    fn atom_lookup_by_name_uses_first_occurrence() {
        let residue = Residue::new(
            identifier(ResidueType::Alanine),
            vec![
                Atom::new("CA", Point3::new(1.0, 0.0, 0.0)),
                Atom::new("CA", Point3::new(2.0, 0.0, 0.0)),
            ],
        );
        assert_eq!(residue.atom("CA").unwrap().position.x, 1.0);
        assert!(residue.atom("CB").is_none());
    }

    #[test]
    fn side_chain_point_uses_representative_atom() {
        let residue = Residue::new(
            identifier(ResidueType::Serine),
            vec![
                Atom::new("CA", Point3::new(0.0, 0.0, 0.0)),
                Atom::new("OG", Point3::new(1.0, 2.0, 3.0)),
            ],
        );
        assert_eq!(residue.side_chain_point(), Ok(Point3::new(1.0, 2.0, 3.0)));
        assert_eq!(residue.backbone_point(), Ok(Point3::origin()));
    }

    #[test]
    fn glycine_side_chain_point_is_virtual_beta_carbon() {
        let gly = glycine();
        let cb = gly.side_chain_point().unwrap();
        assert!(((cb - Point3::origin()).norm() - 1.53).abs() < 1e-6);
    }

    #[test]
    fn missing_atoms_are_reported_by_name() {
        let residue = Residue::new(identifier(ResidueType::Lysine), vec![]);
        let err = residue.backbone_point().unwrap_err();
        assert_eq!(err.atom, "CA");
        assert_eq!(err.residue, "LYS7");
        assert_eq!(residue.side_chain_point().unwrap_err().atom, "NZ");
    }

    #[test]
    fn transformed_moves_every_atom() {
        let shift = Matrix4::new_translation(&Vector3::new(0.0, 0.0, 10.0));
        let moved = glycine().transformed(&shift);
        assert!(moved.atoms().iter().all(|a| a.position.z == 10.0));
        assert_eq!(moved.atom("CA").unwrap().position, Point3::new(0.0, 0.0, 10.0));
    }
}
