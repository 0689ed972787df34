use phf::{Set, phf_set};

// Heavy and hydrogen atom names that belong to the polymer backbone rather than a side chain or
// base.
static BACKBONE_ATOM_NAMES: Set<&'static str> = phf_set! {
    // --- Amino acids ---
    "N", "H", "HN", "CA", "HA", "HA2", "HA3", "C", "O", "OXT", "H1", "H2", "H3",
    // --- Nucleotides (sugar-phosphate backbone) ---
    "P", "OP1", "OP2", "OP3", "O5'", "C5'", "H5'", "H5''", "C4'", "H4'", "O4'",
    "C3'", "H3'", "O3'", "C2'", "H2'", "H2''", "O2'", "HO2'", "C1'", "H1'",
};

pub fn is_backbone_atom(atom_name: &str) -> bool {
    BACKBONE_ATOM_NAMES.contains(atom_name.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peptide_backbone_names_are_recognized() {
        for name in ["N", "CA", "C", "O", "OXT", "HA2"] {
            assert!(is_backbone_atom(name), "{name}");
        }
        for name in ["CB", "OG", "NE2", "CZ2"] {
            assert!(!is_backbone_atom(name), "{name}");
        }
    }

    #[test]
    fn sugar_phosphate_names_are_backbone_but_bases_are_not() {
        assert!(is_backbone_atom("OP1"));
        assert!(is_backbone_atom("C1'"));
        assert!(!is_backbone_atom("N1"));
        assert!(!is_backbone_atom("N3"));
    }

    #[test]
    fn lookup_trims_but_keeps_case() {
        assert!(is_backbone_atom("  C4' "));
        assert!(!is_backbone_atom("ca"));
    }
}
