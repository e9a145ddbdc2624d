use super::alignment::{check_shapes, superpose};
use super::config::RotationMethod;
use super::error::EngineError;
use nalgebra::Point3;

/// Root-mean-square deviation between paired points, without any fitting.
///
/// # Errors
///
/// Returns [`EngineError::ShapeMismatch`] if the sets differ in size and
/// [`EngineError::EmptyCoordinates`] if they are empty.
pub fn rmsd(a: &[Point3<f64>], b: &[Point3<f64>]) -> Result<f64, EngineError> {
    check_shapes(a, b)?;
    let sum_sq: f64 = a.iter().zip(b).map(|(p, q)| (p - q).norm_squared()).sum();
    Ok((sum_sq / a.len() as f64).sqrt())
}

/// RMSD after optimally superposing `mobile` onto `reference`.
///
/// Neither input is modified.
///
/// # Errors
///
/// Same as [`rmsd`], plus [`EngineError::Decomposition`] if the fit fails.
pub fn superposed_rmsd(
    mobile: &[Point3<f64>],
    reference: &[Point3<f64>],
    method: RotationMethod,
) -> Result<f64, EngineError> {
    let superposition = superpose(mobile, reference, method)?;
    rmsd(&superposition.aligned, reference)
}
