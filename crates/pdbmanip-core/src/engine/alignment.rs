use super::config::RotationMethod;
use super::error::EngineError;
use crate::core::utils::geometry::centroid;
use nalgebra::{Matrix3, Matrix4, Point3, Quaternion, SVD, SymmetricEigen, UnitQuaternion, Vector3};
use tracing::{debug, warn};

/// Relative eigenvalue below which a point cloud is treated as colinear.
const COLINEARITY_TOLERANCE: f64 = 1e-8;

/// The rigid transform that best maps a mobile point set onto a reference.
///
/// A point `p` of the mobile set is mapped to `rotation * p + translation`.
#[derive(Debug, Clone, PartialEq)]
pub struct Superposition {
    /// Proper rotation matrix (determinant +1).
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
    /// The mobile points after applying the transform.
    pub aligned: Vec<Point3<f64>>,
    /// `false` when fewer than three points were given or the points are
    /// colinear, in which case the rotation is not unique.
    pub well_conditioned: bool,
}

impl Superposition {
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * point.coords + self.translation)
    }
}

pub(crate) fn check_shapes(a: &[Point3<f64>], b: &[Point3<f64>]) -> Result<(), EngineError> {
    if a.len() != b.len() {
        return Err(EngineError::ShapeMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    if a.is_empty() {
        return Err(EngineError::EmptyCoordinates);
    }
    Ok(())
}

/// Computes the least-squares superposition of `mobile` onto `reference`.
///
/// Points are paired by position in the slices. Both sets are centred on their
/// centroids, the optimal rotation is computed with `method`, and the
/// translation is chosen so that the mobile centroid lands on the reference
/// centroid.
///
/// # Errors
///
/// Returns [`EngineError::ShapeMismatch`] if the sets differ in size,
/// [`EngineError::EmptyCoordinates`] if they are empty and
/// [`EngineError::Decomposition`] if the SVD does not converge.
pub fn superpose(
    mobile: &[Point3<f64>],
    reference: &[Point3<f64>],
    method: RotationMethod,
) -> Result<Superposition, EngineError> {
    check_shapes(reference, mobile)?;
    let mobile_center = centroid(mobile).ok_or(EngineError::EmptyCoordinates)?;
    let reference_center = centroid(reference).ok_or(EngineError::EmptyCoordinates)?;

    let mobile_centered: Vec<Vector3<f64>> = mobile.iter().map(|p| p - mobile_center).collect();
    let reference_centered: Vec<Vector3<f64>> =
        reference.iter().map(|p| p - reference_center).collect();

    let rotation = match method {
        RotationMethod::Kabsch => kabsch_rotation(&mobile_centered, &reference_centered)?,
        RotationMethod::Quaternion => quaternion_rotation(&mobile_centered, &reference_centered),
    };
    let translation = reference_center.coords - rotation * mobile_center.coords;

    let well_conditioned =
        spans_a_plane(&mobile_centered) && spans_a_plane(&reference_centered);
    if !well_conditioned {
        warn!(
            points = mobile.len(),
            "Alignment is ill-conditioned (fewer than 3 points or colinear points); the rotation is not unique."
        );
    }
    debug!(points = mobile.len(), %method, "Computed superposition");

    let aligned = mobile
        .iter()
        .map(|p| Point3::from(rotation * p.coords + translation))
        .collect();

    Ok(Superposition {
        rotation,
        translation,
        aligned,
        well_conditioned,
    })
}

fn cross_covariance(mobile: &[Vector3<f64>], reference: &[Vector3<f64>]) -> Matrix3<f64> {
    mobile
        .iter()
        .zip(reference)
        .fold(Matrix3::zeros(), |acc, (m, r)| acc + m * r.transpose())
}

/// Kabsch rotation for two centred point sets.
///
/// With `H = Σ m rᵀ = U S Vᵀ`, the rotation is `R = V Uᵀ`, with the last
/// column of `V` negated when that product would be a reflection.
pub fn kabsch_rotation(
    mobile_centered: &[Vector3<f64>],
    reference_centered: &[Vector3<f64>],
) -> Result<Matrix3<f64>, EngineError> {
    let h = cross_covariance(mobile_centered, reference_centered);
    let svd = SVD::new(h, true, true);
    let u = svd
        .u
        .ok_or(EngineError::Decomposition("SVD did not produce U"))?;
    let v_t = svd
        .v_t
        .ok_or(EngineError::Decomposition("SVD did not produce Vᵀ"))?;

    let mut v = v_t.transpose();
    if (v * u.transpose()).determinant() < 0.0 {
        let flipped = -v.column(2);
        v.set_column(2, &flipped);
    }
    Ok(v * u.transpose())
}

/// Horn's closed-form rotation for two centred point sets.
///
/// The optimal unit quaternion is the eigenvector of the largest eigenvalue of
/// the symmetric 4x4 key matrix built from the cross-covariance entries.
pub fn quaternion_rotation(
    mobile_centered: &[Vector3<f64>],
    reference_centered: &[Vector3<f64>],
) -> Matrix3<f64> {
    let s = cross_covariance(mobile_centered, reference_centered);
    let (sxx, sxy, sxz) = (s[(0, 0)], s[(0, 1)], s[(0, 2)]);
    let (syx, syy, syz) = (s[(1, 0)], s[(1, 1)], s[(1, 2)]);
    let (szx, szy, szz) = (s[(2, 0)], s[(2, 1)], s[(2, 2)]);

    #[rustfmt::skip]
    let key = Matrix4::new(
        sxx + syy + szz, syz - szy,       szx - sxz,        sxy - syx,
        syz - szy,       sxx - syy - szz, sxy + syx,        szx + sxz,
        szx - sxz,       sxy + syx,       -sxx + syy - szz, syz + szy,
        sxy - syx,       szx + sxz,       syz + szy,        -sxx - syy + szz,
    );

    let eigen = SymmetricEigen::new(key);
    let q = eigen.eigenvectors.column(eigen.eigenvalues.imax());
    UnitQuaternion::from_quaternion(Quaternion::new(q[0], q[1], q[2], q[3]))
        .to_rotation_matrix()
        .into_inner()
}

/// Whether centred points determine a unique rotation: at least three of them,
/// not all on one line.
fn spans_a_plane(centered: &[Vector3<f64>]) -> bool {
    if centered.len() < 3 {
        return false;
    }
    let scatter = centered
        .iter()
        .fold(Matrix3::zeros(), |acc, v| acc + v * v.transpose());
    let mut eigenvalues: Vec<f64> = scatter.symmetric_eigenvalues().iter().copied().collect();
    eigenvalues.sort_by(|a, b| b.total_cmp(a));
    eigenvalues[0] > 0.0 && eigenvalues[1] > COLINEARITY_TOLERANCE * eigenvalues[0]
}
