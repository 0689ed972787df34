use crate::core::models::atom::Atom;
use crate::core::models::residue::Residue;
use crate::core::utils::geometry::round_to;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

const IDENTITY_TOLERANCE: f64 = 1e-9;

/// A rigid-body transformation stored as a homogeneous 4×4 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformation {
    matrix: Matrix4<f64>,
}

impl Transformation {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// Applies `rotation` first, then `translation`.
    pub fn from_parts(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        let mut matrix = rotation.to_homogeneous();
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
        Self { matrix }
    }

    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self::from_parts(Matrix3::identity(), translation)
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    pub fn rotation(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    pub fn translation(&self) -> Vector3<f64> {
        self.matrix.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// The 16 matrix entries in row-major order.
    pub fn flattened(&self) -> [f64; 16] {
        let mut values = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                values[row * 4 + col] = self.matrix[(row, col)];
            }
        }
        values
    }

    pub fn rounded(&self, decimal_places: u32) -> [f64; 16] {
        self.flattened().map(|v| round_to(v, decimal_places))
    }

    pub fn is_identity(&self) -> bool {
        (self.matrix - Matrix4::identity())
            .iter()
            .all(|v| v.abs() <= IDENTITY_TOLERANCE)
    }

    /// Inverse of a rigid motion: transposed rotation and back-rotated negated translation.
    pub fn inverse(&self) -> Self {
        let rotation_t = self.rotation().transpose();
        Self::from_parts(rotation_t, -(rotation_t * self.translation()))
    }

    /// `self` applied after `first`.
    pub fn compose(&self, first: &Transformation) -> Self {
        Self {
            matrix: self.matrix * first.matrix,
        }
    }

    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.matrix.transform_point(point)
    }

    pub fn transform_atom(&self, atom: &Atom) -> Atom {
        atom.transformed(&self.matrix)
    }

    pub fn transform_residue(&self, residue: &Residue) -> Residue {
        residue.transformed(&self.matrix)
    }
}

impl Default for Transformation {
    fn default() -> Self {
        Self::identity()
    }
}
