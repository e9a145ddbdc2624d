use crate::core::models::table::AtomTable;
use crate::engine::alignment::superpose;
use crate::engine::config::{AlignmentConfig, RotationMethod};
use crate::engine::error::EngineError;
use crate::engine::rmsd::rmsd;
use crate::engine::transform::apply_superposition;
use nalgebra::{Matrix3, Point3, Vector3};
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentReport {
    /// Number of atom pairs used for the fit.
    pub atom_count: usize,
    pub rmsd_before: f64,
    pub rmsd_after: f64,
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
    pub well_conditioned: bool,
}

/// Superposes `mobile` onto `reference`.
///
/// The fit is computed on the atoms matching `config.selection` in the active
/// frame of each table, paired in table order. The resulting transform is then
/// applied to every atom of every frame of `mobile`, so models keep their
/// relative placement.
///
/// # Errors
///
/// Returns [`EngineError::ShapeMismatch`] when the selections differ in size
/// and [`EngineError::EmptyCoordinates`] when they are empty.
#[instrument(skip_all, name = "align_workflow")]
pub fn run(
    mobile: &mut AtomTable,
    reference: &AtomTable,
    config: &AlignmentConfig,
) -> Result<AlignmentReport, EngineError> {
    let mobile_points = mobile.select(&config.selection).positions();
    let reference_points = reference.select(&config.selection).positions();
    fit_and_apply(mobile, &mobile_points, &reference_points, config.method)
}

/// Fits `mobile_points` onto `reference_points` and moves every frame of
/// `mobile` with the resulting transform.
pub(crate) fn fit_and_apply(
    mobile: &mut AtomTable,
    mobile_points: &[Point3<f64>],
    reference_points: &[Point3<f64>],
    method: RotationMethod,
) -> Result<AlignmentReport, EngineError> {
    let rmsd_before = rmsd(mobile_points, reference_points)?;
    let superposition = superpose(mobile_points, reference_points, method)?;
    let rmsd_after = rmsd(&superposition.aligned, reference_points)?;

    mobile.for_each_frame(|frame| {
        apply_superposition(frame, &superposition);
        Ok::<(), EngineError>(())
    })?;
    info!(
        frames = mobile.frame_count(),
        atoms = mobile_points.len(),
        rmsd_before,
        rmsd_after,
        method = %method,
        "Alignment complete"
    );

    Ok(AlignmentReport {
        atom_count: mobile_points.len(),
        rmsd_before,
        rmsd_after,
        rotation: superposition.rotation,
        translation: superposition.translation,
        well_conditioned: superposition.well_conditioned,
    })
}
