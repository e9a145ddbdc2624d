use super::error::SelectionError;
use super::field::Field;
use super::value::{Scalar, SelectionValue};
use crate::core::models::atom::{Atom, RecordType};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Filter on an integer-valued field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntFilter {
    /// Membership in an explicit set of values.
    Values(BTreeSet<i64>),
    /// Inclusive range `min..=max`.
    Range { min: i64, max: i64 },
}

impl IntFilter {
    pub fn matches(&self, value: i64) -> bool {
        match self {
            IntFilter::Values(values) => values.contains(&value),
            IntFilter::Range { min, max } => (*min..=*max).contains(&value),
        }
    }
}

/// Inclusive range filter on a real-valued field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatRange {
    pub min: f64,
    pub max: f64,
}

impl FloatRange {
    pub fn matches(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A predicate on a single atom field.
///
/// There is exactly one variant per selectable [`Field`], so evaluation is a
/// plain `match` over the atom's typed data.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Index(IntFilter),
    Serial(IntFilter),
    Record(BTreeSet<RecordType>),
    Name(BTreeSet<String>),
    AltLoc(BTreeSet<Option<char>>),
    ResName(BTreeSet<String>),
    Chain(BTreeSet<char>),
    ResNum(IntFilter),
    InsertionCode(BTreeSet<Option<char>>),
    UniqResid(IntFilter),
    Occupancy(FloatRange),
    BFactor(FloatRange),
    Element(BTreeSet<String>),
}

impl Criterion {
    pub fn field(&self) -> Field {
        match self {
            Criterion::Index(_) => Field::Index,
            Criterion::Serial(_) => Field::Serial,
            Criterion::Record(_) => Field::Record,
            Criterion::Name(_) => Field::Name,
            Criterion::AltLoc(_) => Field::AltLoc,
            Criterion::ResName(_) => Field::ResName,
            Criterion::Chain(_) => Field::Chain,
            Criterion::ResNum(_) => Field::ResNum,
            Criterion::InsertionCode(_) => Field::InsertionCode,
            Criterion::UniqResid(_) => Field::UniqResid,
            Criterion::Occupancy(_) => Field::Occupancy,
            Criterion::BFactor(_) => Field::BFactor,
            Criterion::Element(_) => Field::Element,
        }
    }

    pub fn matches(&self, atom: &Atom) -> bool {
        match self {
            Criterion::Index(f) => f.matches(atom.index as i64),
            Criterion::Serial(f) => f.matches(atom.serial as i64),
            Criterion::Record(set) => set.contains(&atom.record),
            Criterion::Name(set) => set.contains(atom.name.as_str()),
            Criterion::AltLoc(set) => set.contains(&atom.alt_loc),
            Criterion::ResName(set) => set.contains(atom.res_name.as_str()),
            Criterion::Chain(set) => set.contains(&atom.chain),
            Criterion::ResNum(f) => f.matches(atom.res_num as i64),
            Criterion::InsertionCode(set) => set.contains(&atom.insertion_code),
            Criterion::UniqResid(f) => f.matches(atom.uniq_resid as i64),
            Criterion::Occupancy(r) => r.matches(atom.occupancy),
            Criterion::BFactor(r) => r.matches(atom.b_factor),
            Criterion::Element(set) => set.contains(atom.element.trim()),
        }
    }

    /// Builds the typed criterion for `field` from a mapping value.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::TypeMismatch`] when the value has the wrong
    /// shape for the field (e.g. a range on a text field) and
    /// [`SelectionError::InvalidValue`] when an individual value cannot be
    /// converted (e.g. a two-letter chain identifier).
    pub fn from_value(field: Field, value: &SelectionValue) -> Result<Self, SelectionError> {
        let criterion = match field {
            Field::Index => Criterion::Index(int_filter(field, value)?),
            Field::Serial => Criterion::Serial(int_filter(field, value)?),
            Field::ResNum => Criterion::ResNum(int_filter(field, value)?),
            Field::UniqResid => Criterion::UniqResid(int_filter(field, value)?),
            Field::Occupancy => Criterion::Occupancy(float_range(field, value)?),
            Field::BFactor => Criterion::BFactor(float_range(field, value)?),
            Field::Name => Criterion::Name(text_set(field, value)?),
            Field::ResName => Criterion::ResName(text_set(field, value)?),
            Field::Element => Criterion::Element(text_set(field, value)?),
            Field::Chain => Criterion::Chain(
                scalars(field, value)?
                    .iter()
                    .map(|s| single_char(field, s))
                    .collect::<Result<_, _>>()?,
            ),
            Field::AltLoc => Criterion::AltLoc(optional_char_set(field, value)?),
            Field::InsertionCode => Criterion::InsertionCode(optional_char_set(field, value)?),
            Field::Record => Criterion::Record(
                scalars(field, value)?
                    .iter()
                    .map(|s| {
                        RecordType::from_str(&s.to_string()).map_err(|_| {
                            SelectionError::InvalidValue {
                                field: field.as_str(),
                                value: s.to_string(),
                                reason: "expected ATOM or HETATM",
                            }
                        })
                    })
                    .collect::<Result<_, _>>()?,
            ),
        };
        Ok(criterion)
    }
}

fn scalars(field: Field, value: &SelectionValue) -> Result<Vec<Scalar>, SelectionError> {
    match value {
        SelectionValue::Single(s) => Ok(vec![s.clone()]),
        SelectionValue::List(list) => Ok(list.clone()),
        SelectionValue::Range { .. } => Err(SelectionError::TypeMismatch {
            field: field.as_str(),
            expected: "a value or a list of values",
        }),
    }
}

fn int_filter(field: Field, value: &SelectionValue) -> Result<IntFilter, SelectionError> {
    let to_int = |s: &Scalar| {
        s.as_int().ok_or_else(|| SelectionError::InvalidValue {
            field: field.as_str(),
            value: s.to_string(),
            reason: "expected an integer",
        })
    };
    match value {
        SelectionValue::Range { min, max } => Ok(IntFilter::Range {
            min: to_int(min)?,
            max: to_int(max)?,
        }),
        _ => Ok(IntFilter::Values(
            scalars(field, value)?
                .iter()
                .map(to_int)
                .collect::<Result<_, _>>()?,
        )),
    }
}

fn float_range(field: Field, value: &SelectionValue) -> Result<FloatRange, SelectionError> {
    let SelectionValue::Range { min, max } = value else {
        return Err(SelectionError::TypeMismatch {
            field: field.as_str(),
            expected: "a { min, max } range",
        });
    };
    let to_float = |s: &Scalar| {
        s.as_float().ok_or_else(|| SelectionError::InvalidValue {
            field: field.as_str(),
            value: s.to_string(),
            reason: "expected a number",
        })
    };
    Ok(FloatRange {
        min: to_float(min)?,
        max: to_float(max)?,
    })
}

fn text_set(field: Field, value: &SelectionValue) -> Result<BTreeSet<String>, SelectionError> {
    Ok(scalars(field, value)?
        .iter()
        .map(|s| s.to_string().trim().to_string())
        .collect())
}

pub(super) fn single_char(field: Field, scalar: &Scalar) -> Result<char, SelectionError> {
    let text = scalar.to_string();
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(' '),
        (Some(c), None) => Ok(c),
        _ => Err(SelectionError::InvalidValue {
            field: field.as_str(),
            value: text.clone(),
            reason: "expected a single character",
        }),
    }
}

fn optional_char_set(
    field: Field,
    value: &SelectionValue,
) -> Result<BTreeSet<Option<char>>, SelectionError> {
    scalars(field, value)?
        .iter()
        .map(|s| single_char(field, s).map(|c| if c == ' ' { None } else { Some(c) }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn sample_atom() -> Atom {
        let mut atom = Atom::new("CA", "LYS", 'A', 42, Point3::origin());
        atom.index = 7;
        atom.serial = 8;
        atom.uniq_resid = 3;
        atom.b_factor = 21.5;
        atom.occupancy = 0.5;
        atom.element = "C".into();
        atom
    }

    #[test]
    fn int_filter_supports_sets_and_inclusive_ranges() {
        let set = IntFilter::Values([1, 5, 9].into_iter().collect());
        assert!(set.matches(5));
        assert!(!set.matches(6));

        let range = IntFilter::Range { min: 10, max: 20 };
        assert!(range.matches(10));
        assert!(range.matches(20));
        assert!(!range.matches(21));
    }

    #[test]
    fn every_field_variant_matches_sample_atom() {
        let atom = sample_atom();
        let cases: Vec<(Field, SelectionValue)> = vec![
            (Field::Index, 7i64.into()),
            (Field::Serial, 8i64.into()),
            (Field::Record, "ATOM".into()),
            (Field::Name, ["CA", "CB"].into()),
            (Field::AltLoc, "".into()),
            (Field::ResName, "LYS".into()),
            (Field::Chain, "A".into()),
            (Field::ResNum, (40i64..=45).into()),
            (Field::InsertionCode, " ".into()),
            (Field::UniqResid, vec![3i64].into()),
            (Field::Occupancy, SelectionValue::range(0.0f64, 1.0f64)),
            (Field::BFactor, SelectionValue::range(20i64, 22i64)),
            (Field::Element, "C".into()),
        ];
        for (field, value) in cases {
            let criterion = Criterion::from_value(field, &value).unwrap();
            assert_eq!(criterion.field(), field);
            assert!(criterion.matches(&atom), "criterion on {field} should match");
        }
    }

    #[test]
    fn non_matching_values_reject_atom() {
        let atom = sample_atom();
        let chain_b = Criterion::from_value(Field::Chain, &"B".into()).unwrap();
        let hetatm = Criterion::from_value(Field::Record, &"HETATM".into()).unwrap();
        let low_beta =
            Criterion::from_value(Field::BFactor, &SelectionValue::range(0.0f64, 10.0f64)).unwrap();
        assert!(!chain_b.matches(&atom));
        assert!(!hetatm.matches(&atom));
        assert!(!low_beta.matches(&atom));
    }

    #[test]
    fn range_on_text_field_is_a_type_mismatch() {
        let err = Criterion::from_value(Field::Name, &(1i64..=3).into()).unwrap_err();
        assert!(matches!(err, SelectionError::TypeMismatch { field: "name", .. }));
    }

    #[test]
    fn list_on_float_field_is_a_type_mismatch() {
        let err = Criterion::from_value(Field::BFactor, &vec![1.0f64].into()).unwrap_err();
        assert!(matches!(err, SelectionError::TypeMismatch { field: "b_factor", .. }));
    }

    #[test]
    fn multi_character_chain_is_invalid() {
        let err = Criterion::from_value(Field::Chain, &"AB".into()).unwrap_err();
        assert!(matches!(err, SelectionError::InvalidValue { field: "chain", .. }));
    }

    #[test]
    fn non_integer_res_num_is_invalid() {
        let err = Criterion::from_value(Field::ResNum, &"ten".into()).unwrap_err();
        assert!(matches!(err, SelectionError::InvalidValue { field: "res_num", .. }));
    }

    #[test]
    fn alt_loc_values_map_blank_to_none() {
        let criterion = Criterion::from_value(Field::AltLoc, &["", "A"].into()).unwrap();
        assert_eq!(
            criterion,
            Criterion::AltLoc([None, Some('A')].into_iter().collect())
        );
    }
}
