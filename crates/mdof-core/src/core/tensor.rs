use nalgebra::{Matrix3, Rotation3, Vector3};

/// Largest Frobenius norm of `QᵀQ − I` accepted before an orientation is re-projected
/// onto the rotation group.
pub const ORTHONORMALITY_TOLERANCE: f64 = 1e-12;

/// Rotation by `angle` radians about the x axis.
pub fn rotation_x(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c)
}

/// Rotation by `angle` radians about the y axis.
pub fn rotation_y(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c)
}

/// Rotation by `angle` radians about the z axis.
pub fn rotation_z(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Composes the single-axis rotations about body x, then y, then z.
pub fn split_rotation(angles: &Vector3<f64>) -> Matrix3<f64> {
    rotation_x(angles.x) * rotation_y(angles.y) * rotation_z(angles.z)
}

pub fn orthonormality_error(q: &Matrix3<f64>) -> f64 {
    (q.transpose() * q - Matrix3::identity()).norm()
}

pub fn is_rotation(q: &Matrix3<f64>, tolerance: f64) -> bool {
    orthonormality_error(q) <= tolerance && (q.determinant() - 1.0).abs() <= tolerance
}

/// Projects `q` onto the nearest proper rotation (polar decomposition `U·Vᵀ`).
///
/// Returns `None` for non-finite input or when the nearest orthogonal tensor is a
/// reflection.
pub fn orthonormalize(q: &Matrix3<f64>) -> Option<Matrix3<f64>> {
    if !q.iter().all(|c| c.is_finite()) {
        return None;
    }
    let svd = q.svd(true, true);
    let r = svd.u? * svd.v_t?;
    (r.determinant() > 0.0).then_some(r)
}

/// Returns `q` untouched while it is within [`ORTHONORMALITY_TOLERANCE`], otherwise its
/// polar projection.
pub fn correct_drift(q: &Matrix3<f64>) -> Option<Matrix3<f64>> {
    if orthonormality_error(q) <= ORTHONORMALITY_TOLERANCE && q.determinant() > 0.0 {
        Some(*q)
    } else {
        orthonormalize(q)
    }
}

/// Rotation vector (axis scaled by angle) of a rotation tensor.
pub fn rotation_vector(r: &Matrix3<f64>) -> Vector3<f64> {
    Rotation3::from_matrix_unchecked(*r).scaled_axis()
}

/// Roll, pitch and yaw (radians) of an orientation tensor.
pub fn euler_angles(q: &Matrix3<f64>) -> (f64, f64, f64) {
    Rotation3::from_matrix_unchecked(*q).euler_angles()
}
