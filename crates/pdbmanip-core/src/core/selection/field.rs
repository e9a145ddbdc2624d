use super::error::SelectionError;
use std::fmt;
use std::str::FromStr;

/// The atom record fields a selection can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Index,
    Serial,
    Record,
    Name,
    AltLoc,
    ResName,
    Chain,
    ResNum,
    InsertionCode,
    UniqResid,
    Occupancy,
    BFactor,
    Element,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::Index,
        Field::Serial,
        Field::Record,
        Field::Name,
        Field::AltLoc,
        Field::ResName,
        Field::Chain,
        Field::ResNum,
        Field::InsertionCode,
        Field::UniqResid,
        Field::Occupancy,
        Field::BFactor,
        Field::Element,
    ];

    /// The canonical snake_case name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Index => "index",
            Field::Serial => "serial",
            Field::Record => "record",
            Field::Name => "name",
            Field::AltLoc => "alt_loc",
            Field::ResName => "res_name",
            Field::Chain => "chain",
            Field::ResNum => "res_num",
            Field::InsertionCode => "insertion_code",
            Field::UniqResid => "uniq_resid",
            Field::Occupancy => "occupancy",
            Field::BFactor => "b_factor",
            Field::Element => "element",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = SelectionError;

    /// Parses a field name.
    ///
    /// Besides the canonical names, the short keys used by PDB-manipulation
    /// scripts are accepted (`num`, `field`, `alter_loc`, `insert_res`, `occ`,
    /// `beta`, `elem`). Matching is case-insensitive and ignores `-` versus `_`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::NotSelectable`] for coordinate fields and
    /// [`SelectionError::InvalidField`] for anything else that is unknown.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        match key.as_str() {
            "index" => Ok(Field::Index),
            "serial" | "num" => Ok(Field::Serial),
            "record" | "field" => Ok(Field::Record),
            "name" => Ok(Field::Name),
            "alt_loc" | "alter_loc" => Ok(Field::AltLoc),
            "res_name" | "resname" => Ok(Field::ResName),
            "chain" => Ok(Field::Chain),
            "res_num" | "resnum" => Ok(Field::ResNum),
            "insertion_code" | "insert_res" => Ok(Field::InsertionCode),
            "uniq_resid" => Ok(Field::UniqResid),
            "occupancy" | "occ" => Ok(Field::Occupancy),
            "b_factor" | "beta" => Ok(Field::BFactor),
            "element" | "elem" => Ok(Field::Element),
            "position" | "xyz" | "x" | "y" | "z" => Err(SelectionError::NotSelectable(key)),
            _ => Err(SelectionError::InvalidField(s.trim().to_string())),
        }
    }
}
