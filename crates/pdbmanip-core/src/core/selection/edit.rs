use super::criterion::single_char;
use super::error::SelectionError;
use super::field::Field;
use super::value::Scalar;
use crate::core::models::atom::{Atom, RecordType};
use std::str::FromStr;

/// A typed assignment to one atom record field.
///
/// `index` and `uniq_resid` are bookkeeping owned by the table and cannot be
/// assigned; use `reindex` and `renumber_residues` instead.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Serial(usize),
    Record(RecordType),
    Name(String),
    AltLoc(Option<char>),
    ResName(String),
    Chain(char),
    ResNum(isize),
    InsertionCode(Option<char>),
    Occupancy(f64),
    BFactor(f64),
    Element(String),
}

impl FieldEdit {
    pub fn field(&self) -> Field {
        match self {
            FieldEdit::Serial(_) => Field::Serial,
            FieldEdit::Record(_) => Field::Record,
            FieldEdit::Name(_) => Field::Name,
            FieldEdit::AltLoc(_) => Field::AltLoc,
            FieldEdit::ResName(_) => Field::ResName,
            FieldEdit::Chain(_) => Field::Chain,
            FieldEdit::ResNum(_) => Field::ResNum,
            FieldEdit::InsertionCode(_) => Field::InsertionCode,
            FieldEdit::Occupancy(_) => Field::Occupancy,
            FieldEdit::BFactor(_) => Field::BFactor,
            FieldEdit::Element(_) => Field::Element,
        }
    }

    /// Converts a raw value into an assignment for `field`.
    ///
    /// # Errors
    ///
    /// [`SelectionError::ReadOnlyField`] for `index` and `uniq_resid`;
    /// [`SelectionError::InvalidValue`] when the value does not fit the field.
    pub fn from_scalar(field: Field, value: &Scalar) -> Result<Self, SelectionError> {
        let invalid = |reason: &'static str| SelectionError::InvalidValue {
            field: field.as_str(),
            value: value.to_string(),
            reason,
        };
        let text = || value.to_string().trim().to_string();
        let edit = match field {
            Field::Index | Field::UniqResid => {
                return Err(SelectionError::ReadOnlyField(field.as_str()));
            }
            Field::Serial => FieldEdit::Serial(
                value
                    .as_int()
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| invalid("expected a non-negative integer"))?,
            ),
            Field::ResNum => FieldEdit::ResNum(
                value
                    .as_int()
                    .and_then(|n| isize::try_from(n).ok())
                    .ok_or_else(|| invalid("expected an integer"))?,
            ),
            Field::Occupancy => {
                FieldEdit::Occupancy(value.as_float().ok_or_else(|| invalid("expected a number"))?)
            }
            Field::BFactor => {
                FieldEdit::BFactor(value.as_float().ok_or_else(|| invalid("expected a number"))?)
            }
            Field::Record => FieldEdit::Record(
                RecordType::from_str(&text()).map_err(|_| invalid("expected ATOM or HETATM"))?,
            ),
            Field::Name => FieldEdit::Name(text()),
            Field::ResName => FieldEdit::ResName(text()),
            Field::Element => FieldEdit::Element(text()),
            Field::Chain => FieldEdit::Chain(single_char(field, value)?),
            Field::AltLoc => FieldEdit::AltLoc(optional_char(field, value)?),
            Field::InsertionCode => FieldEdit::InsertionCode(optional_char(field, value)?),
        };
        Ok(edit)
    }

    /// Parses a field-name → value mapping into assignments, in order.
    ///
    /// # Errors
    ///
    /// The first unknown field name or invalid value.
    pub fn from_map<I, K>(entries: I) -> Result<Vec<Self>, SelectionError>
    where
        I: IntoIterator<Item = (K, Scalar)>,
        K: AsRef<str>,
    {
        entries
            .into_iter()
            .map(|(key, value)| Self::from_scalar(Field::from_str(key.as_ref())?, &value))
            .collect()
    }

    pub fn apply(&self, atom: &mut Atom) {
        match self {
            FieldEdit::Serial(v) => atom.serial = *v,
            FieldEdit::Record(v) => atom.record = *v,
            FieldEdit::Name(v) => atom.name.clone_from(v),
            FieldEdit::AltLoc(v) => atom.alt_loc = *v,
            FieldEdit::ResName(v) => atom.res_name.clone_from(v),
            FieldEdit::Chain(v) => atom.chain = *v,
            FieldEdit::ResNum(v) => atom.res_num = *v,
            FieldEdit::InsertionCode(v) => atom.insertion_code = *v,
            FieldEdit::Occupancy(v) => atom.occupancy = *v,
            FieldEdit::BFactor(v) => atom.b_factor = *v,
            FieldEdit::Element(v) => atom.element.clone_from(v),
        }
    }

    /// Whether applying this edit can move a residue boundary.
    pub fn changes_residue_key(&self) -> bool {
        matches!(
            self,
            FieldEdit::Chain(_) | FieldEdit::ResNum(_) | FieldEdit::InsertionCode(_)
        )
    }
}

fn optional_char(field: Field, value: &Scalar) -> Result<Option<char>, SelectionError> {
    single_char(field, value).map(|c| if c == ' ' { None } else { Some(c) })
}
