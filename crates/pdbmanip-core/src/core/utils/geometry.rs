use super::residues::atomic_mass;
use crate::core::models::atom::Atom;
use nalgebra::{Matrix3, Point3, Rotation3, SymmetricEigen, Unit, Vector3};
use tracing::warn;

/// Smallest rotation taking the direction of `from` onto the direction of `to`.
///
/// Antiparallel vectors get a half turn about an arbitrary perpendicular axis.
/// Returns `None` if either vector has zero length.
pub fn rotation_to_align(from: &Vector3<f64>, to: &Vector3<f64>) -> Option<Rotation3<f64>> {
    if from.norm() == 0.0 || to.norm() == 0.0 {
        return None;
    }
    Rotation3::rotation_between(from, to).or_else(|| {
        let mut perpendicular = from.cross(&Vector3::x());
        if perpendicular.norm() < 1e-8 {
            perpendicular = from.cross(&Vector3::y());
        }
        Some(Rotation3::from_axis_angle(
            &Unit::new_normalize(perpendicular),
            std::f64::consts::PI,
        ))
    })
}

pub fn rotation_from_axis_angle(axis: &Vector3<f64>, angle_degrees: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle_degrees.to_radians())
}

/// Builds the rotation `Rx · Ry · Rz` from three angles in degrees.
pub fn euler_rotation(angles_degrees: &Vector3<f64>) -> Matrix3<f64> {
    let rx = rotation_from_axis_angle(&Vector3::x(), angles_degrees.x);
    let ry = rotation_from_axis_angle(&Vector3::y(), angles_degrees.y);
    let rz = rotation_from_axis_angle(&Vector3::z(), angles_degrees.z);
    (rx * ry * rz).into_inner()
}

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}

/// Computes the mass-weighted center of a set of atoms.
///
/// Atoms whose element cannot be resolved contribute zero mass and emit a
/// warning. Returns `None` for an empty slice or when the total mass is zero.
pub fn center_of_mass(atoms: &[Atom]) -> Option<Point3<f64>> {
    let masses = atom_masses(atoms);
    let total: f64 = masses.iter().sum();
    if atoms.is_empty() || total <= 0.0 {
        return None;
    }
    let weighted = atoms
        .iter()
        .zip(&masses)
        .fold(Vector3::zeros(), |acc, (atom, &m)| acc + atom.position.coords * m);
    Some(Point3::from(weighted / total))
}

fn atom_masses(atoms: &[Atom]) -> Vec<f64> {
    atoms
        .iter()
        .map(|atom| {
            atomic_mass(atom).unwrap_or_else(|| {
                warn!(atom = %atom.name, index = atom.index, "Atom mass could not be found; using 0.");
                0.0
            })
        })
        .collect()
}

/// Returns the edge lengths of the axis-aligned bounding box of the points.
pub fn box_dimensions(points: &[Point3<f64>]) -> Option<Vector3<f64>> {
    let first = points.first()?;
    let (min, max) = points
        .iter()
        .fold((first.coords, first.coords), |(min, max), p| {
            (min.inf(&p.coords), max.sup(&p.coords))
        });
    Some(max - min)
}

/// Moment of inertia tensor relative to the center of mass.
pub fn inertia_tensor(atoms: &[Atom]) -> Option<Matrix3<f64>> {
    let com = center_of_mass(atoms)?;
    let masses = atom_masses(atoms);

    let mut tensor = Matrix3::zeros();
    for (atom, &m) in atoms.iter().zip(&masses) {
        let r = atom.position - com;
        tensor[(0, 0)] += m * (r.y * r.y + r.z * r.z);
        tensor[(1, 1)] += m * (r.x * r.x + r.z * r.z);
        tensor[(2, 2)] += m * (r.x * r.x + r.y * r.y);
        tensor[(0, 1)] -= m * r.x * r.y;
        tensor[(0, 2)] -= m * r.x * r.z;
        tensor[(1, 2)] -= m * r.y * r.z;
    }
    tensor[(1, 0)] = tensor[(0, 1)];
    tensor[(2, 0)] = tensor[(0, 2)];
    tensor[(2, 1)] = tensor[(1, 2)];
    Some(tensor)
}

/// Principal axes of inertia, ordered by decreasing moment.
///
/// The first axis is the one with the largest moment of inertia, so the last
/// axis is the direction along which the molecule is most elongated.
pub fn principal_axes(atoms: &[Atom]) -> Option<[Vector3<f64>; 3]> {
    let tensor = inertia_tensor(atoms)?;
    let eigen = SymmetricEigen::new(tensor);

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[b]
            .partial_cmp(&eigen.eigenvalues[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Some(order.map(|i| eigen.eigenvectors.column(i).into_owned().normalize()))
}

pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (a - b).norm()
}

/// Unsigned angle between two vectors, in radians.
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let cos = a.dot(b) / (a.norm() * b.norm());
    cos.clamp(-1.0, 1.0).acos()
}

/// Angle `a-b-c` at vertex `b`, in degrees.
pub fn bond_angle(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    angle_between(&(a - b), &(c - b)).to_degrees()
}

/// Signed dihedral angle `a-b-c-d` in degrees, in the range [-180, 180].
pub fn dihedral(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>, d: &Point3<f64>) -> f64 {
    let b0 = a - b;
    let b1 = (c - b).normalize();
    let b2 = d - c;

    let v = b0 - b1 * b0.dot(&b1);
    let w = b2 - b1 * b2.dot(&b1);

    let x = v.dot(&w);
    let y = b1.cross(&v).dot(&w);
    y.atan2(x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn atom_at(name: &str, x: f64, y: f64, z: f64) -> Atom {
        Atom::new(name, "ALA", 'A', 1, Point3::new(x, y, z))
    }

    #[test]
    fn centroid_is_mean_of_points() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, 3.0, -3.0),
        ];
        let c = centroid(&points).unwrap();
        assert!((c - Point3::new(1.0, 1.0, -1.0)).norm() < EPS);
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn center_of_mass_is_weighted_toward_heavy_atoms() {
        let atoms = [atom_at("H1", 0.0, 0.0, 0.0), atom_at("S", 1.0, 0.0, 0.0)];
        let com = center_of_mass(&atoms).unwrap();
        let expected = 32.06 / (32.06 + 1.008);
        assert!((com.x - expected).abs() < EPS);
        assert_eq!(com.y, 0.0);
    }

    #[test]
    fn center_of_mass_is_none_without_known_masses() {
        let mut atom = atom_at("XX", 1.0, 1.0, 1.0);
        atom.element = "XX".into();
        assert!(center_of_mass(&[atom]).is_none());
        assert!(center_of_mass(&[]).is_none());
    }

    #[test]
    fn box_dimensions_spans_extremes() {
        let points = [
            Point3::new(-1.0, 2.0, 0.5),
            Point3::new(3.0, -2.0, 1.5),
            Point3::new(0.0, 0.0, 0.0),
        ];
        let dims = box_dimensions(&points).unwrap();
        assert!((dims - Vector3::new(4.0, 4.0, 1.5)).norm() < EPS);
        assert!(box_dimensions(&[]).is_none());
    }

    #[test]
    fn inertia_tensor_is_symmetric_and_principal_axes_follow_elongation() {
        let atoms = [
            atom_at("C1", -3.0, 0.0, 0.0),
            atom_at("C2", 3.0, 0.0, 0.0),
            atom_at("C3", 0.0, 1.0, 0.0),
            atom_at("C4", 0.0, -1.0, 0.0),
        ];
        let tensor = inertia_tensor(&atoms).unwrap();
        assert!((tensor - tensor.transpose()).norm() < EPS);

        let axes = principal_axes(&atoms).unwrap();
        // Elongated along x: smallest moment, hence last axis.
        assert!((axes[2].x.abs() - 1.0).abs() < 1e-6);
        // Flat in z: largest moment, hence first axis.
        assert!((axes[0].z.abs() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn distance_and_angle_match_simple_geometry() {
        let a = Point3::new(1.0, 0.0, 0.0);
        let b = Point3::origin();
        let c = Point3::new(0.0, 1.0, 0.0);
        assert!((distance(&a, &c) - 2f64.sqrt()).abs() < EPS);
        assert!((bond_angle(&a, &b, &c) - 90.0).abs() < EPS);
        assert!((bond_angle(&a, &b, &a) - 0.0).abs() < 1e-6);
    }

    #[test]
    fn dihedral_distinguishes_cis_trans_and_sign() {
        let a = Point3::new(0.0, 1.0, 0.0);
        let b = Point3::origin();
        let c = Point3::new(1.0, 0.0, 0.0);

        let trans = dihedral(&a, &b, &c, &Point3::new(1.0, -1.0, 0.0));
        let cis = dihedral(&a, &b, &c, &Point3::new(1.0, 1.0, 0.0));
        let plus = dihedral(&a, &b, &c, &Point3::new(1.0, 0.0, 1.0));
        let minus = dihedral(&a, &b, &c, &Point3::new(1.0, 0.0, -1.0));

        assert!((trans.abs() - 180.0).abs() < EPS);
        assert!(cis.abs() < EPS);
        assert!((plus - 90.0).abs() < EPS);
        assert!((minus + 90.0).abs() < EPS);
    }

    #[test]
    fn euler_rotation_is_proper_and_composes_axes() {
        let m = euler_rotation(&Vector3::new(0.0, 0.0, 90.0));
        let rotated = m * Vector3::x();
        assert!((rotated - Vector3::y()).norm() < EPS);

        let m = euler_rotation(&Vector3::new(30.0, -45.0, 120.0));
        assert!((m.determinant() - 1.0).abs() < EPS);
        assert!((m * m.transpose() - Matrix3::identity()).norm() < EPS);
    }

    #[test]
    fn rotation_to_align_maps_vectors() {
        let from = Vector3::new(1.0, 1.0, 0.0);
        let to = Vector3::z();
        let rot = rotation_to_align(&from, &to).unwrap();
        assert!(((rot * from).normalize() - to).norm() < 1e-9);
    }

    #[test]
    fn rotation_to_align_handles_antiparallel_and_zero_vectors() {
        let rot = rotation_to_align(&Vector3::x(), &-Vector3::x()).unwrap();
        assert!((rot * Vector3::x() + Vector3::x()).norm() < 1e-9);
        assert!(rotation_to_align(&Vector3::zeros(), &Vector3::z()).is_none());
    }
}
