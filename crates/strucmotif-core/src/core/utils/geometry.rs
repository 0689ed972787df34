use nalgebra::{Point3, Rotation3, Unit, Vector3};

#[derive(Debug, Clone, Copy)]
pub struct CbCreationParams {
    pub off_bisector_angle: f64,
    pub off_plane_angle: f64,
    pub bond_length: f64,
}

/// Ideal geometry for placing a virtual beta carbon on a glycine.
pub const VIRTUAL_CB_PARAMS: CbCreationParams = CbCreationParams {
    off_bisector_angle: 0.0,
    off_plane_angle: 54.75,
    bond_length: 1.53,
};

pub fn calculate_cb_position(
    n_pos: &Point3<f64>,
    ca_pos: &Point3<f64>,
    c_pos: &Point3<f64>,
    params: &CbCreationParams,
) -> Point3<f64> {
    let ca_n = (n_pos - ca_pos).normalize();
    let ca_c = (c_pos - ca_pos).normalize();

    let bisector = -(ca_n + ca_c).normalize();
    let plane_normal = Unit::new_normalize(ca_n.cross(&ca_c));

    let rot_off_bisector =
        Rotation3::from_axis_angle(&plane_normal, params.off_bisector_angle.to_radians());
    let cb_vec_in_plane = rot_off_bisector * bisector;

    let rot_off_plane = Rotation3::from_axis_angle(
        &Unit::new_normalize(bisector.cross(&plane_normal)),
        params.off_plane_angle.to_radians(),
    );
    let final_cb_vec = rot_off_plane * cb_vec_in_plane;

    ca_pos + final_cb_vec * params.bond_length
}

/// Angle between two vectors in degrees, in `[0, 180]`.
///
/// Returns `None` if either vector has zero length.
pub fn angle_between_degrees(a: &Vector3<f64>, b: &Vector3<f64>) -> Option<f64> {
    let norms = a.norm() * b.norm();
    if norms <= f64::EPSILON {
        return None;
    }
    let cos = (a.dot(b) / norms).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
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

pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}

/// Rounds to a fixed number of decimal places (used for reported scores and matrices).
pub fn round_to(value: f64, decimal_places: u32) -> f64 {
    let factor = 10f64.powi(decimal_places.min(i32::MAX as u32) as i32);
    let rounded = (value * factor).round() / factor;
    // Past f64 precision the scaled value overflows; nothing is left to round.
    if rounded.is_finite() { rounded } else { value }
}
