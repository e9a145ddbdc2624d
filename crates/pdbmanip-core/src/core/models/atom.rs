use nalgebra::Point3;
use std::fmt;
use std::str::FromStr;

/// The coordinate record an atom was read from.
///
/// PDB files distinguish standard polymer atoms (`ATOM`) from hetero groups
/// such as ligands, ions and waters (`HETATM`). The distinction is kept so
/// that written files round-trip the original record names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum RecordType {
    /// Standard polymer atom (`ATOM`).
    #[default]
    Atom,
    /// Hetero atom (`HETATM`).
    HetAtm,
}

impl RecordType {
    /// Returns the record name as written in columns 1-6 of a PDB line.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Atom => "ATOM",
            RecordType::HetAtm => "HETATM",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = ();

    /// Parses a record name, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `()` if the input is neither `ATOM` nor `HETATM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ATOM" => Ok(RecordType::Atom),
            "HETATM" => Ok(RecordType::HetAtm),
            _ => Err(()),
        }
    }
}

/// One row of an atom table.
///
/// This struct holds everything a PDB coordinate record carries, plus the two
/// identifiers the table maintains itself: the table-wide `index` and the
/// `uniq_resid` residue counter.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Unique position-independent index within the owning table.
    pub index: usize,
    /// Atom serial number as found in the source file.
    pub serial: usize,
    /// The record type (`ATOM` or `HETATM`).
    pub record: RecordType,
    /// The name of the atom (e.g., "CA", "N", "O").
    pub name: String,
    /// Alternate location indicator, `None` when blank.
    pub alt_loc: Option<char>,
    /// Three-letter residue name (e.g., "ALA").
    pub res_name: String,
    /// Chain identifier; a blank chain is stored as `' '`.
    pub chain: char,
    /// Residue sequence number from the source file.
    pub res_num: isize,
    /// Residue insertion code, `None` when blank.
    pub insertion_code: Option<char>,
    /// Zero-based residue counter, incremented at each residue boundary.
    pub uniq_resid: usize,
    /// Cartesian coordinates in Angstroms for the active frame.
    pub position: Point3<f64>,
    /// Occupancy factor.
    pub occupancy: f64,
    /// Temperature (B) factor.
    pub b_factor: f64,
    /// Element symbol from columns 77-78, possibly empty.
    pub element: String,
}

impl Atom {
    /// Creates a new `Atom` with default values for the bookkeeping fields.
    ///
    /// `index`, `serial` and `uniq_resid` start at zero and are normally
    /// assigned by [`AtomTableBuilder`](super::builder::AtomTableBuilder).
    /// Occupancy defaults to `1.0`, the B-factor to `0.0`.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `res_name` - The residue name.
    /// * `chain` - The chain identifier.
    /// * `res_num` - The residue sequence number.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(
        name: &str,
        res_name: &str,
        chain: char,
        res_num: isize,
        position: Point3<f64>,
    ) -> Self {
        Self {
            index: 0,
            serial: 0,
            record: RecordType::default(),
            name: name.to_string(),
            alt_loc: None,
            res_name: res_name.to_string(),
            chain,
            res_num,
            insertion_code: None,
            uniq_resid: 0,
            position,
            occupancy: 1.0,
            b_factor: 0.0,
            element: String::new(),
        }
    }

    /// The key that identifies the residue this atom belongs to.
    pub fn residue_key(&self) -> (char, isize, Option<char>) {
        (self.chain, self.res_num, self.insertion_code)
    }
}
