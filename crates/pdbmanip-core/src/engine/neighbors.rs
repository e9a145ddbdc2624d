use crate::core::models::table::AtomTable;
use kiddo::{KdTree, SquaredEuclidean};
use std::collections::HashSet;
use tracing::debug;

/// Positions of `table` with exact duplicates removed. A k-d tree bucket
/// cannot split points that share every coordinate, and dropping repeats
/// leaves every nearest distance unchanged.
fn distinct_positions(table: &AtomTable) -> Vec<[f64; 3]> {
    let mut seen = HashSet::new();
    table
        .iter()
        .map(|atom| [atom.position.x, atom.position.y, atom.position.z])
        .filter(|p| seen.insert(p.map(|c| if c == 0.0 { 0u64 } else { c.to_bits() })))
        .collect()
}

/// Indices of the atoms of `table` whose nearest atom in `other` lies strictly
/// between `min` and `max` Angstroms.
///
/// Returns an empty list when `other` has no atoms.
pub fn atoms_within_shell(table: &AtomTable, other: &AtomTable, min: f64, max: f64) -> Vec<usize> {
    if other.is_empty() {
        return Vec::new();
    }
    let other_positions = distinct_positions(other);
    let kdtree: KdTree<f64, 3> = (&other_positions).into();

    let indices: Vec<usize> = table
        .iter()
        .filter(|atom| {
            let query = [atom.position.x, atom.position.y, atom.position.z];
            let nearest = kdtree.nearest_one::<SquaredEuclidean>(&query);
            let distance = nearest.distance.sqrt();
            distance > min && distance < max
        })
        .map(|atom| atom.index)
        .collect();
    debug!(
        candidates = table.len(),
        found = indices.len(),
        min,
        max,
        "Distance shell query"
    );
    indices
}

/// Indices of the atoms of `table` closer than `cutoff` to any atom of `other`.
pub fn atoms_within(table: &AtomTable, other: &AtomTable, cutoff: f64) -> Vec<usize> {
    atoms_within_shell(table, other, f64::NEG_INFINITY, cutoff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::builder::AtomTableBuilder;
    use nalgebra::Point3;

    fn table_on_x_axis(xs: &[f64]) -> AtomTable {
        let mut builder = AtomTableBuilder::new();
        for (i, &x) in xs.iter().enumerate() {
            builder.add_atom(Atom::new("C", "LIG", 'A', i as isize, Point3::new(x, 0.0, 0.0)));
        }
        builder.build().unwrap()
    }

    #[test]
    fn shell_bounds_are_exclusive() {
        let table = table_on_x_axis(&[1.0, 3.0, 4.0, 5.0, 8.0]);
        let origin = table_on_x_axis(&[0.0]);
        assert_eq!(atoms_within_shell(&table, &origin, 3.0, 5.0), vec![2]);
        assert_eq!(atoms_within_shell(&table, &origin, 0.5, 5.5), vec![0, 1, 2, 3]);
    }

    #[test]
    fn nearest_atom_of_other_decides() {
        let table = table_on_x_axis(&[0.0, 10.0]);
        let other = table_on_x_axis(&[-20.0, 11.0]);
        assert_eq!(atoms_within(&table, &other, 2.0), vec![1]);
    }

    #[test]
    fn coincident_atoms_in_other_are_handled() {
        let table = table_on_x_axis(&[0.5, 1.5, 3.0]);
        let other = table_on_x_axis(&[0.0; 200]);
        assert_eq!(atoms_within(&table, &other, 2.0), vec![0, 1]);
        assert_eq!(atoms_within_shell(&table, &other, 1.0, 5.0), vec![1, 2]);
    }

    #[test]
    fn signed_zero_counts_as_one_position() {
        let other = table_on_x_axis(&[0.0, -0.0, 2.0, 2.0]);
        assert_eq!(distinct_positions(&other).len(), 2);
    }

    #[test]
    fn empty_other_yields_nothing() {
        let table = table_on_x_axis(&[0.0]);
        assert!(atoms_within(&table, &AtomTable::new(), 100.0).is_empty());
    }
}
