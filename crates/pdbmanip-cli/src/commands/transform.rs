use super::{read_structure, write_structure};
use crate::cli::TransformArgs;
use crate::error::{CliError, Result};
use nalgebra::Vector3;
use pdbmanip::core::models::table::AtomTable;
use pdbmanip::core::utils::geometry::center_of_mass;
use pdbmanip::engine::error::EngineError;
use pdbmanip::engine::transform::{align_principal_axis, rotate_euler, translate};
use tracing::info;

pub fn run(args: TransformArgs) -> Result<()> {
    if !has_operations(&args) {
        return Err(CliError::Argument(
            "Nothing to do: pass --center, --principal-axis, --rotate or --translate.".into(),
        ));
    }
    let (mut table, metadata) = read_structure(&args.input)?;
    apply(&mut table, &args)?;
    write_structure(&args.output, &table, &metadata)?;
    println!("Transformed structure written to: {}", args.output.display());
    Ok(())
}

fn has_operations(args: &TransformArgs) -> bool {
    args.center || args.principal_axis.is_some() || args.rotate.is_some() || args.translate.is_some()
}

/// Applies the requested operations to every model of `table`.
fn apply(table: &mut AtomTable, args: &TransformArgs) -> Result<()> {
    table.for_each_frame(|frame| apply_to_active_frame(frame, args))
}

/// Fixed order: centering (or principal-axis alignment), rotation,
/// translation. Centering uses the frame's own center of mass.
fn apply_to_active_frame(table: &mut AtomTable, args: &TransformArgs) -> Result<()> {
    if let Some(axis) = args.principal_axis {
        let angle = align_principal_axis(table, axis, &Vector3::z())?;
        println!(
            "Model {}: principal axis {axis} aligned with z (rotated {angle:.2} degrees)",
            table.active_frame() + 1
        );
    } else if args.center {
        let center = center_of_mass(table.atoms()).ok_or(EngineError::EmptyCoordinates)?;
        info!("Centering on {:.3} {:.3} {:.3}", center.x, center.y, center.z);
        translate(table, &-center.coords);
    }
    if let Some(angles) = &args.rotate {
        rotate_euler(table, angles);
    }
    if let Some(vector) = &args.translate {
        translate(table, vector);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use pdbmanip::core::models::atom::Atom;
    use pdbmanip::core::io::pdb::PdbFile;
    use pdbmanip::core::io::traits::MolecularFile;
    use pdbmanip::core::models::builder::AtomTableBuilder;
    use std::fs;
    use std::path::PathBuf;

    const TWO_MODELS: &str = "\
MODEL        1
ATOM      1  CA  ALA A   1       1.000   0.000   0.000  1.00  0.00           C
ENDMDL
MODEL        2
ATOM      1  CA  ALA A   1       1.500   0.000   0.000  1.00  0.00           C
ENDMDL
END
";

    fn args() -> TransformArgs {
        TransformArgs {
            input: PathBuf::from("in.pdb"),
            output: PathBuf::from("out.pdb"),
            center: false,
            principal_axis: None,
            rotate: None,
            translate: None,
        }
    }

    fn pair() -> AtomTable {
        let mut builder = AtomTableBuilder::new();
        builder.add_atom(Atom::new("CA", "ALA", 'A', 1, Point3::new(2.0, 0.0, 0.0)));
        builder.add_atom(Atom::new("CA", "ALA", 'A', 2, Point3::new(4.0, 0.0, 0.0)));
        builder.build().unwrap()
    }

    #[test]
    fn nothing_requested_is_detected() {
        assert!(!has_operations(&args()));
        assert!(has_operations(&TransformArgs {
            center: true,
            ..args()
        }));
    }

    #[test]
    fn center_then_rotate_then_translate() {
        let mut table = pair();
        let request = TransformArgs {
            center: true,
            rotate: Some(Vector3::new(0.0, 0.0, 90.0)),
            translate: Some(Vector3::new(0.0, 0.0, 1.0)),
            ..args()
        };
        apply(&mut table, &request).unwrap();

        let positions = table.positions();
        assert!((positions[0] - Point3::new(0.0, -1.0, 1.0)).norm() < 1e-9);
        assert!((positions[1] - Point3::new(0.0, 1.0, 1.0)).norm() < 1e-9);
    }

    #[test]
    fn principal_axis_request_is_validated() {
        let mut table = pair();
        let request = TransformArgs {
            principal_axis: Some(5),
            ..args()
        };
        assert!(matches!(
            apply(&mut table, &request),
            Err(CliError::Engine(EngineError::InvalidAxis(5)))
        ));
    }

    #[test]
    fn every_model_is_translated() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("models.pdb");
        let output = dir.path().join("moved.pdb");
        fs::write(&input, TWO_MODELS).unwrap();

        run(TransformArgs {
            input,
            output: output.clone(),
            translate: Some(Vector3::new(10.0, 0.0, 0.0)),
            ..args()
        })
        .unwrap();

        let (moved, _) = PdbFile::read_from_path(&output).unwrap();
        assert_eq!(moved.frame_count(), 2);
        assert!((moved.frame_positions(0).unwrap()[0].x - 11.0).abs() < 1e-6);
        assert!((moved.frame_positions(1).unwrap()[0].x - 11.5).abs() < 1e-6);
        assert_eq!(moved.active_frame(), 0);
    }

    #[test]
    fn centering_is_computed_per_model() {
        let mut table = pair();
        let shifted = table
            .positions()
            .iter()
            .map(|p| p + Vector3::new(0.0, 7.0, 0.0))
            .collect();
        table.add_frame(shifted).unwrap();

        apply(&mut table, &TransformArgs { center: true, ..args() }).unwrap();

        for frame in 0..2 {
            let positions = table.frame_positions(frame).unwrap();
            assert!((positions[0] - Point3::new(-1.0, 0.0, 0.0)).norm() < 1e-9);
            assert!((positions[1] - Point3::new(1.0, 0.0, 0.0)).norm() < 1e-9);
        }
    }
}
