use nalgebra::Vector3;
use pdbmanip::core::selection::{FieldEdit, Scalar, Selection, SelectionError, SelectionValue};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid selection '{0}'. Expected 'field=value[,value...]' or 'field=min:max'.")]
    InvalidSelectionFormat(String),

    #[error("Invalid assignment '{0}'. Expected 'field=value'.")]
    InvalidAssignmentFormat(String),

    #[error("Invalid vector '{0}'. Expected three comma-separated numbers (e.g., '1.0,0,-2.5').")]
    InvalidVectorFormat(String),

    #[error("Component '{component}' cannot be empty in '{text}'.")]
    EmptyComponent {
        component: &'static str,
        text: String,
    },
}

/// Splits one `field=values` argument into its field name and value.
///
/// `min:max` becomes an inclusive range, anything else a comma-separated list.
/// Values stay text; the target field decides whether they are numbers.
pub fn parse_selection_arg(text: &str) -> Result<(String, SelectionValue), ParseError> {
    let (field, values) = text
        .split_once('=')
        .ok_or_else(|| ParseError::InvalidSelectionFormat(text.to_string()))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "field",
            text: text.to_string(),
        });
    }
    if values.trim().is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "values",
            text: text.to_string(),
        });
    }

    let value = match values.split_once(':') {
        Some((min, max)) => {
            if min.trim().is_empty() || max.trim().is_empty() {
                return Err(ParseError::InvalidSelectionFormat(text.to_string()));
            }
            SelectionValue::Range {
                min: Scalar::text(min),
                max: Scalar::text(max),
            }
        }
        None => SelectionValue::List(values.split(',').map(Scalar::text).collect()),
    };
    Ok((field.to_string(), value))
}

#[derive(Debug, Error, PartialEq)]
pub enum SelectionArgError {
    #[error(transparent)]
    Format(#[from] ParseError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Builds a selection from repeated `-s` arguments. Returns `None` when no
/// argument was given, so callers can fall back to configured defaults.
pub fn parse_selection(args: &[String]) -> Result<Option<Selection>, SelectionArgError> {
    if args.is_empty() {
        return Ok(None);
    }
    let entries = args
        .iter()
        .map(|arg| parse_selection_arg(arg))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(Selection::from_map(entries)?))
}

/// Builds field assignments from repeated `--set field=value` arguments.
/// An empty value is allowed and clears optional one-letter fields.
pub fn parse_assignments(args: &[String]) -> Result<Vec<FieldEdit>, SelectionArgError> {
    let entries = args
        .iter()
        .map(|arg| {
            let (field, value) = arg
                .split_once('=')
                .ok_or_else(|| ParseError::InvalidAssignmentFormat(arg.clone()))?;
            if field.trim().is_empty() {
                return Err(ParseError::EmptyComponent {
                    component: "field",
                    text: arg.clone(),
                });
            }
            Ok((field.trim().to_string(), Scalar::text(value)))
        })
        .collect::<Result<Vec<_>, ParseError>>()?;
    Ok(FieldEdit::from_map(entries)?)
}

pub fn parse_vector3(text: &str) -> Result<Vector3<f64>, ParseError> {
    let components: Vec<f64> = text
        .split(',')
        .map(|c| c.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| ParseError::InvalidVectorFormat(text.to_string()))?;
    match components.as_slice() {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(ParseError::InvalidVectorFormat(text.to_string())),
    }
}
