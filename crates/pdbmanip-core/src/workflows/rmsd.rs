use crate::core::models::table::AtomTable;
use crate::engine::config::{RmsdConfig, RmsdMode};
use crate::engine::error::EngineError;
use crate::engine::rmsd::{rmsd, superposed_rmsd};
use nalgebra::Point3;
use serde::Serialize;
use std::io::Write;
use tracing::{info, instrument};

/// RMSD of one frame of the mobile table against the reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RmsdRecord {
    pub frame: usize,
    pub rmsd: f64,
}

/// Per-frame RMSD values, in frame order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RmsdSeries {
    pub records: Vec<RmsdRecord>,
}

impl RmsdSeries {
    pub fn values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.rmsd).collect()
    }

    /// Writes the series as CSV with a `frame,rmsd` header.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for record in &self.records {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

fn measure(
    mobile: &[Point3<f64>],
    reference: &[Point3<f64>],
    mode: RmsdMode,
) -> Result<f64, EngineError> {
    match mode {
        RmsdMode::AsIs => rmsd(mobile, reference),
        RmsdMode::Superposed(method) => superposed_rmsd(mobile, reference, method),
    }
}

/// RMSD between the selected atoms of the active frames of both tables.
///
/// # Errors
///
/// Returns [`EngineError::ShapeMismatch`] when the selections differ in size
/// and [`EngineError::EmptyCoordinates`] when they are empty.
#[instrument(skip_all, name = "rmsd_workflow")]
pub fn run(
    mobile: &AtomTable,
    reference: &AtomTable,
    config: &RmsdConfig,
) -> Result<f64, EngineError> {
    let mobile_points = mobile.select(&config.selection).positions();
    let reference_points = reference.select(&config.selection).positions();
    let value = measure(&mobile_points, &reference_points, config.mode)?;
    info!(atoms = mobile_points.len(), rmsd = value, mode = ?config.mode, "RMSD computed");
    Ok(value)
}

/// RMSD of every frame of `mobile` against the active frame of `reference`.
///
/// Neither table is modified, and the active frame of `mobile` is irrelevant.
///
/// # Errors
///
/// Same as [`run`], reported for the first failing frame.
#[instrument(skip_all, name = "rmsd_frames_workflow")]
pub fn run_frames(
    mobile: &AtomTable,
    reference: &AtomTable,
    config: &RmsdConfig,
) -> Result<RmsdSeries, EngineError> {
    let mobile_selected = mobile.select(&config.selection);
    let reference_points = reference.select(&config.selection).positions();

    let records = (0..mobile_selected.frame_count())
        .map(|frame| {
            let positions = mobile_selected.frame_positions(frame)?;
            let rmsd = measure(&positions, &reference_points, config.mode)?;
            Ok(RmsdRecord { frame, rmsd })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    info!(frames = records.len(), "RMSD series computed");
    Ok(RmsdSeries { records })
}
