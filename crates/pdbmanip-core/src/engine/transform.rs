use super::alignment::Superposition;
use super::error::EngineError;
use crate::core::models::table::AtomTable;
use crate::core::utils::geometry::{
    angle_between, box_dimensions, center_of_mass, euler_rotation, principal_axes,
    rotation_to_align,
};
use nalgebra::{Matrix3, Point3, Vector3};
use tracing::info;

/// Adds `vector` to every position of the active frame.
pub fn translate(table: &mut AtomTable, vector: &Vector3<f64>) {
    for position in table.positions_mut() {
        *position += *vector;
    }
}

/// Rotates the active frame about `pivot`: `p' = M (p - pivot) + pivot`.
pub fn rotate(table: &mut AtomTable, matrix: &Matrix3<f64>, pivot: &Point3<f64>) {
    for position in table.positions_mut() {
        *position = *pivot + matrix * (*position - *pivot);
    }
}

/// Rotates the active frame about the origin by the composed `Rx · Ry · Rz`
/// rotation, with angles in degrees.
pub fn rotate_euler(table: &mut AtomTable, angles_degrees: &Vector3<f64>) {
    rotate(table, &euler_rotation(angles_degrees), &Point3::origin());
}

/// Applies a superposition computed on a subset to every atom of `table`.
pub fn apply_superposition(table: &mut AtomTable, superposition: &Superposition) {
    for position in table.positions_mut() {
        *position = superposition.apply(position);
    }
}

/// Centres the table on its center of mass and rotates it so that principal
/// axis `axis` (0, 1 or 2, by decreasing moment of inertia) points along
/// `target`.
///
/// Returns the rotation angle that was applied, in degrees.
///
/// # Errors
///
/// Returns [`EngineError::InvalidAxis`] for an axis index above 2 and
/// [`EngineError::EmptyCoordinates`] when the table is empty, has no atom of
/// known mass, or `target` is the zero vector.
pub fn align_principal_axis(
    table: &mut AtomTable,
    axis: usize,
    target: &Vector3<f64>,
) -> Result<f64, EngineError> {
    if axis > 2 {
        return Err(EngineError::InvalidAxis(axis));
    }
    let center = center_of_mass(table.atoms()).ok_or(EngineError::EmptyCoordinates)?;
    let axes = principal_axes(table.atoms()).ok_or(EngineError::EmptyCoordinates)?;
    let rotation =
        rotation_to_align(&axes[axis], target).ok_or(EngineError::EmptyCoordinates)?;
    let angle = angle_between(&axes[axis], target).to_degrees();
    info!(axis, angle_degrees = angle, "Aligning principal axis");

    translate(table, &-center.coords);
    rotate(table, rotation.matrix(), &Point3::origin());
    Ok(angle)
}

/// The largest bounding-box edge of the table once its smallest-moment axis
/// is aligned with `z`, with every edge rounded up to a whole Angstrom. The
/// table itself is left untouched.
///
/// # Errors
///
/// Same as [`align_principal_axis`].
pub fn max_size(table: &AtomTable) -> Result<f64, EngineError> {
    let mut aligned = table.clone();
    align_principal_axis(&mut aligned, 2, &Vector3::z())?;
    let dims = box_dimensions(&aligned.positions()).ok_or(EngineError::EmptyCoordinates)?;
    Ok(dims.map(f64::ceil).max())
}
