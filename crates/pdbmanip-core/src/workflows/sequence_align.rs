use super::align::{AlignmentReport, fit_and_apply};
use crate::core::models::atom::Atom;
use crate::core::models::table::AtomTable;
use crate::core::utils::residues::one_letter_code;
use crate::engine::config::SequenceAlignmentConfig;
use crate::engine::error::EngineError;
use crate::engine::sequence::{SequenceAlignment, align_sequences};
use nalgebra::Point3;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceAlignmentReport {
    pub alignment: SequenceAlignment,
    /// Atom indices of the paired alpha carbons, `(mobile, reference)`.
    pub pairs: Vec<(usize, usize)>,
    pub fit: AlignmentReport,
}

/// Alpha carbons of amino-acid residues, grouped by `chains` in the order
/// given (every chain in table order when `chains` is empty).
fn alpha_trace<'a>(table: &'a AtomTable, chains: &[char]) -> Vec<&'a Atom> {
    let is_trace = |atom: &&Atom| atom.name == "CA" && one_letter_code(&atom.res_name).is_some();
    if chains.is_empty() {
        return table.iter().filter(is_trace).collect();
    }
    chains
        .iter()
        .flat_map(|&chain| {
            table
                .iter()
                .filter(move |atom| atom.chain == chain)
                .filter(is_trace)
        })
        .collect()
}

fn sequence_of(trace: &[&Atom]) -> String {
    trace
        .iter()
        .filter_map(|atom| one_letter_code(&atom.res_name))
        .collect()
}

/// Superposes `mobile` onto `reference` when the two structures do not share
/// a residue numbering.
///
/// The CA traces of both tables are turned into one-letter sequences and
/// aligned globally. Residues aligned to each other pair their alpha carbons,
/// the fit is computed on those pairs, and the transform is applied to every
/// frame of `mobile`.
///
/// # Errors
///
/// Returns [`EngineError::EmptySequence`] when either trace has no amino-acid
/// residue, and [`EngineError::EmptyCoordinates`] when the alignment pairs no
/// residue at all.
#[instrument(skip_all, name = "sequence_align_workflow")]
pub fn run(
    mobile: &mut AtomTable,
    reference: &AtomTable,
    config: &SequenceAlignmentConfig,
) -> Result<SequenceAlignmentReport, EngineError> {
    let mobile_trace = alpha_trace(mobile, &config.mobile_chains);
    let reference_trace = alpha_trace(reference, &config.reference_chains);
    let alignment = align_sequences(
        &sequence_of(&mobile_trace),
        &sequence_of(&reference_trace),
        config.gaps,
    )?;
    debug!(score = alignment.score, "Sequence alignment\n{alignment}");

    let positions = alignment.aligned_pairs();
    let pairs: Vec<(usize, usize)> = positions
        .iter()
        .map(|&(i, j)| (mobile_trace[i].index, reference_trace[j].index))
        .collect();
    let mobile_points: Vec<Point3<f64>> =
        positions.iter().map(|&(i, _)| mobile_trace[i].position).collect();
    let reference_points: Vec<Point3<f64>> =
        positions.iter().map(|&(_, j)| reference_trace[j].position).collect();

    info!(
        paired = pairs.len(),
        identity = alignment.identity(),
        "Residues paired by sequence"
    );
    let fit = fit_and_apply(mobile, &mobile_points, &reference_points, config.method)?;

    Ok(SequenceAlignmentReport {
        alignment,
        pairs,
        fit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::AtomTableBuilder;
    use crate::core::selection::FieldEdit;
    use crate::core::utils::geometry::euler_rotation;
    use crate::engine::config::SequenceAlignmentConfigBuilder;
    use crate::engine::transform::{rotate, translate};
    use nalgebra::Vector3;

    const HELIX: [[f64; 3]; 6] = [
        [2.3, 0.0, 0.0],
        [-0.4, 2.26, 1.5],
        [-2.16, -0.79, 3.0],
        [1.15, -1.99, 4.5],
        [1.76, 1.48, 6.0],
        [-1.58, 1.67, 7.5],
    ];

    fn protein(chain: char, residues: &[(&str, [f64; 3])]) -> AtomTable {
        let mut builder = AtomTableBuilder::new();
        for (i, (name, xyz)) in residues.iter().enumerate() {
            let res_num = i as isize + 1;
            let ca = Point3::from(*xyz);
            builder
                .add_atom(Atom::new("N", name, chain, res_num, ca - Vector3::new(1.0, 0.0, 0.0)))
                .add_atom(Atom::new("CA", name, chain, res_num, ca));
        }
        builder.build().unwrap()
    }

    fn reference() -> AtomTable {
        let names = ["TRP", "CYS", "HIS", "LYS", "TRP", "MET"];
        let residues: Vec<_> = names.iter().copied().zip(HELIX).collect();
        protein('A', &residues)
    }

    #[test]
    fn missing_residue_is_skipped_when_pairing() {
        let reference = reference();
        // Same helix without its third residue, renumbered, on another chain,
        // rotated and shifted.
        let names = ["TRP", "CYS", "LYS", "TRP", "MET"];
        let coords = [HELIX[0], HELIX[1], HELIX[3], HELIX[4], HELIX[5]];
        let residues: Vec<_> = names.iter().copied().zip(coords).collect();
        let mut mobile = protein('B', &residues);
        let pivot = Point3::new(0.5, 0.5, 0.5);
        rotate(&mut mobile, &euler_rotation(&Vector3::new(30.0, -20.0, 60.0)), &pivot);
        translate(&mut mobile, &Vector3::new(4.0, -3.0, 8.0));

        let report = run(&mut mobile, &reference, &SequenceAlignmentConfig::default()).unwrap();

        assert_eq!(report.alignment.first, "WC-KWM");
        assert_eq!(report.pairs, vec![(1, 1), (3, 3), (5, 7), (7, 9), (9, 11)]);
        assert_eq!(report.fit.atom_count, 5);
        assert!(report.fit.rmsd_before > 1.0);
        assert!(report.fit.rmsd_after < 1e-6);
        let third_ca = mobile.find(5).map(|a| a.position).unwrap();
        assert!((third_ca - Point3::from(HELIX[3])).norm() < 1e-6);
    }

    #[test]
    fn chains_restrict_and_order_the_trace() {
        let a = reference();
        let mut b = reference();
        b.edit_fields(&[FieldEdit::Chain('B')]);
        let both = AtomTable::concat([&a, &b]).unwrap();

        assert_eq!(alpha_trace(&both, &[]).len(), 12);
        let only_b = alpha_trace(&both, &['B']);
        assert_eq!(only_b.len(), 6);
        assert!(only_b.iter().all(|atom| atom.chain == 'B'));
        let b_then_a: Vec<char> = alpha_trace(&both, &['B', 'A']).iter().map(|a| a.chain).collect();
        assert_eq!(b_then_a[0], 'B');
        assert_eq!(b_then_a[11], 'A');

        let mut mobile = both.clone();
        let config = SequenceAlignmentConfigBuilder::new()
            .mobile_chains(['B'])
            .reference_chains(['A'])
            .build()
            .unwrap();
        let report = run(&mut mobile, &a, &config).unwrap();
        assert_eq!(report.pairs[0], (13, 1));
    }

    #[test]
    fn no_amino_acids_is_an_error() {
        let mut builder = AtomTableBuilder::new();
        builder.add_atom(Atom::new("CA", "HOH", 'A', 1, Point3::origin()));
        let mut water = builder.build().unwrap();
        assert_eq!(
            run(&mut water, &reference(), &SequenceAlignmentConfig::default()),
            Err(EngineError::EmptySequence)
        );
    }
}
