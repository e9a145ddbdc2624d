//! Atom selection by field predicates.
//!
//! A [`Selection`] is a conjunction of typed [`Criterion`] values, one per
//! field. It can be assembled in code with the builder methods, or from a
//! field-name → accepted-values mapping (for instance a TOML table), in which
//! case unknown field names are rejected up front with
//! [`SelectionError::InvalidField`].
//!
//! ```ignore
//! use pdbmanip::core::selection::Selection;
//!
//! let ca_of_chain_a = Selection::all().chains(['A']).names(["CA"]);
//! let sub_table = table.select(&ca_of_chain_a);
//! ```

pub mod criterion;
pub mod edit;
pub mod error;
pub mod field;
pub mod value;

pub use criterion::{Criterion, FloatRange, IntFilter};
pub use edit::FieldEdit;
pub use error::SelectionError;
pub use field::Field;
pub use value::{Scalar, SelectionValue};

use crate::core::models::atom::Atom;
use crate::core::models::table::AtomTable;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// A conjunction of field criteria.
///
/// An atom is selected iff it satisfies every criterion. The empty selection
/// matches every atom.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, SelectionValue>")]
pub struct Selection {
    criteria: Vec<Criterion>,
}

impl Selection {
    /// The selection matching every atom.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self { criteria }
    }

    /// Selects alpha carbons only.
    pub fn alpha_carbons() -> Self {
        Self::all().names(["CA"])
    }

    /// Selects the protein backbone heavy atoms (N, CA, C, O).
    pub fn backbone() -> Self {
        Self::all().names(["N", "CA", "C", "O"])
    }

    /// Builds a selection from a field-name → values mapping.
    ///
    /// # Errors
    ///
    /// Fails with [`SelectionError::InvalidField`] on the first unknown field
    /// name, or with the conversion error of the first malformed value.
    pub fn from_map<I, K>(entries: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = (K, SelectionValue)>,
        K: AsRef<str>,
    {
        let criteria = entries
            .into_iter()
            .map(|(key, value)| {
                let field = Field::from_str(key.as_ref())?;
                Criterion::from_value(field, &value)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { criteria })
    }

    pub fn with(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn names<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(Criterion::Name(names.into_iter().map(Into::into).collect()))
    }

    pub fn res_names<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(Criterion::ResName(
            names.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn chains<I: IntoIterator<Item = char>>(self, chains: I) -> Self {
        self.with(Criterion::Chain(chains.into_iter().collect()))
    }

    pub fn res_nums<I: IntoIterator<Item = isize>>(self, numbers: I) -> Self {
        self.with(Criterion::ResNum(IntFilter::Values(
            numbers.into_iter().map(|n| n as i64).collect(),
        )))
    }

    pub fn res_num_range(self, range: RangeInclusive<isize>) -> Self {
        let (min, max) = range.into_inner();
        self.with(Criterion::ResNum(IntFilter::Range {
            min: min as i64,
            max: max as i64,
        }))
    }

    pub fn uniq_resids<I: IntoIterator<Item = usize>>(self, ids: I) -> Self {
        self.with(Criterion::UniqResid(IntFilter::Values(
            ids.into_iter().map(|n| n as i64).collect(),
        )))
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn matches(&self, atom: &Atom) -> bool {
        self.criteria.iter().all(|c| c.matches(atom))
    }
}

impl TryFrom<BTreeMap<String, SelectionValue>> for Selection {
    type Error = SelectionError;

    fn try_from(map: BTreeMap<String, SelectionValue>) -> Result<Self, Self::Error> {
        Self::from_map(map)
    }
}

/// Selects atoms of `table` using a field-name → values mapping.
///
/// # Errors
///
/// Returns [`SelectionError::InvalidField`] if the mapping names a field that
/// does not exist. An empty result is not an error.
pub fn select_by_map<I, K>(table: &AtomTable, entries: I) -> Result<AtomTable, SelectionError>
where
    I: IntoIterator<Item = (K, SelectionValue)>,
    K: AsRef<str>,
{
    let selection = Selection::from_map(entries)?;
    Ok(table.select(&selection))
}
