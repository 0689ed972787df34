use super::transformation::Transformation;
use crate::core::utils::geometry::{calculate_rmsd, centroid};
use nalgebra::{Matrix3, Matrix4, Point3, Quaternion, SymmetricEigen, UnitQuaternion};

/// Degenerate key matrices (all cross terms vanish) carry no orientation information.
const DEGENERATE_KEY_NORM: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Superposition {
    pub transformation: Transformation,
    pub rmsd: f64,
}

/// Cross-covariance `h[(i, j)] = Σ mobile_i · fixed_j` of two centered clouds.
fn cross_covariance(mobile: &[Point3<f64>], fixed: &[Point3<f64>]) -> Matrix3<f64> {
    mobile
        .iter()
        .zip(fixed)
        .fold(Matrix3::zeros(), |acc, (m, f)| acc + m.coords * f.coords.transpose())
}

/// Horn's symmetric 4×4 key matrix. Its dominant eigenvector is the unit quaternion of the
/// rotation that best maps the mobile cloud onto the fixed one.
fn key_matrix(h: &Matrix3<f64>) -> Matrix4<f64> {
    let trace = h.trace();
    Matrix4::new(
        trace,
        h[(1, 2)] - h[(2, 1)],
        h[(2, 0)] - h[(0, 2)],
        h[(0, 1)] - h[(1, 0)],
        h[(1, 2)] - h[(2, 1)],
        h[(0, 0)] - h[(1, 1)] - h[(2, 2)],
        h[(0, 1)] + h[(1, 0)],
        h[(0, 2)] + h[(2, 0)],
        h[(2, 0)] - h[(0, 2)],
        h[(0, 1)] + h[(1, 0)],
        -h[(0, 0)] + h[(1, 1)] - h[(2, 2)],
        h[(1, 2)] + h[(2, 1)],
        h[(0, 1)] - h[(1, 0)],
        h[(0, 2)] + h[(2, 0)],
        h[(1, 2)] + h[(2, 1)],
        -h[(0, 0)] - h[(1, 1)] + h[(2, 2)],
    )
}

fn optimal_rotation(key: Matrix4<f64>) -> Option<Matrix3<f64>> {
    if key.norm() <= DEGENERATE_KEY_NORM {
        return Some(Matrix3::identity());
    }
    let eigen = SymmetricEigen::new(key);
    let dominant = eigen.eigenvalues.imax();
    let q = eigen.eigenvectors.column(dominant);
    let quaternion = Quaternion::new(q[0], q[1], q[2], q[3]);
    if quaternion.norm() <= f64::EPSILON || !quaternion.coords.iter().all(|v| v.is_finite()) {
        return None;
    }
    Some(
        UnitQuaternion::from_quaternion(quaternion)
            .to_rotation_matrix()
            .into_inner(),
    )
}

/// Least-squares superposition moving `mobile` onto `fixed`.
///
/// Both slices must be non-empty and of equal length. Returns `None` when the eigen
/// decomposition produces no usable rotation.
pub(crate) fn superpose(mobile: &[Point3<f64>], fixed: &[Point3<f64>]) -> Option<Superposition> {
    let mobile_center = centroid(mobile)?;
    let fixed_center = centroid(fixed)?;

    let rotation = if mobile.len() == 1 {
        Matrix3::identity()
    } else {
        let centered_mobile: Vec<_> = mobile
            .iter()
            .map(|p| Point3::from(p - mobile_center))
            .collect();
        let centered_fixed: Vec<_> = fixed
            .iter()
            .map(|p| Point3::from(p - fixed_center))
            .collect();
        let h = cross_covariance(&centered_mobile, &centered_fixed);
        optimal_rotation(key_matrix(&h))?
    };

    let translation = fixed_center.coords - rotation * mobile_center.coords;
    let transformation = Transformation::from_parts(rotation, translation);

    let moved: Vec<_> = mobile
        .iter()
        .map(|p| transformation.transform_point(p))
        .collect();
    let rmsd = calculate_rmsd(&moved, fixed)?;
    if !rmsd.is_finite() {
        return None;
    }

    Some(Superposition {
        transformation,
        rmsd,
    })
}
