use crate::core::models::atom::Atom;
use phf::{Map, Set, phf_map, phf_set};

static AMINO_ACID_CODES: Map<&'static str, char> = phf_map! {
    "GLY" => 'G', "ALA" => 'A', "VAL" => 'V', "LEU" => 'L', "ILE" => 'I',
    "MET" => 'M', "PHE" => 'F', "TRP" => 'W', "PRO" => 'P', "SER" => 'S',
    "THR" => 'T', "CYS" => 'C', "TYR" => 'Y', "ASN" => 'N', "GLN" => 'Q',
    "ASP" => 'D', "GLU" => 'E', "LYS" => 'K', "ARG" => 'R', "HIS" => 'H',
    "HSE" => 'H', "HSD" => 'H', "HSP" => 'H', "HIE" => 'H', "HID" => 'H', "HIP" => 'H',
    "CYX" => 'C', "SEC" => 'U',
};

static BACKBONE_ATOM_NAMES: Set<&'static str> = phf_set! {
    "N", "CA", "C", "O", "OXT", "OT1", "OT2",
};

// Standard atomic weights (g/mol) for the elements found in biomolecules.
static ATOMIC_MASSES: Map<&'static str, f64> = phf_map! {
    "H" => 1.008, "D" => 2.014, "C" => 12.011, "N" => 14.007, "O" => 15.999,
    "P" => 30.974, "S" => 32.06, "SE" => 78.971, "NA" => 22.990, "MG" => 24.305,
    "CL" => 35.45, "K" => 39.098, "CA" => 40.078, "MN" => 54.938, "FE" => 55.845,
    "CO" => 58.933, "NI" => 58.693, "CU" => 63.546, "ZN" => 65.38,
};

/// Maps a three-letter residue name to its one-letter amino-acid code.
pub fn one_letter_code(res_name: &str) -> Option<char> {
    AMINO_ACID_CODES
        .get(res_name.trim().to_ascii_uppercase().as_str())
        .copied()
}

/// Returns `true` for standard (and common protonation-variant) amino acids.
pub fn is_amino_acid(res_name: &str) -> bool {
    one_letter_code(res_name).is_some()
}

pub fn is_backbone_atom(atom_name: &str) -> bool {
    BACKBONE_ATOM_NAMES.contains(atom_name.trim())
}

/// Resolves the element symbol of an atom.
///
/// The element column wins when present. Otherwise the first letter of the
/// atom name is used, which is only reliable for the organic elements
/// (H, C, N, O, P, S); two-letter ions such as `NA` or `CL` need the element
/// column to be filled in.
pub fn element_symbol(atom: &Atom) -> String {
    let element = atom.element.trim();
    if !element.is_empty() {
        return element.to_ascii_uppercase();
    }
    atom.name
        .trim()
        .chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_default()
}

/// Looks up the atomic mass of an atom, `None` if the element is unknown.
pub fn atomic_mass(atom: &Atom) -> Option<f64> {
    ATOMIC_MASSES.get(element_symbol(atom).as_str()).copied()
}
