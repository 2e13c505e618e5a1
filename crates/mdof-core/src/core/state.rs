use nalgebra::{Matrix3, Point3, Vector3};

/// A snapshot of the kinematic state of a rigid body.
///
/// The snapshot is a plain value: the motion object keeps one for the start of the
/// current time step and one for the latest estimate, and each integration pass
/// produces a fresh snapshot rather than editing either in place. No validation is
/// performed here; the owner is responsible for keeping `q` orthonormal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    /// Position of the centre of rotation in global coordinates.
    centre_of_rotation: Point3<f64>,
    /// Orientation tensor mapping body-local vectors to global vectors.
    q: Matrix3<f64>,
    /// Linear velocity of the centre of rotation (global frame).
    v: Vector3<f64>,
    /// Linear acceleration of the centre of rotation (global frame).
    a: Vector3<f64>,
    /// Angular momentum in the body-fixed frame.
    pi: Vector3<f64>,
    /// Rate of change of `pi` in the body-fixed frame.
    tau: Vector3<f64>,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            centre_of_rotation: Point3::origin(),
            q: Matrix3::identity(),
            v: Vector3::zeros(),
            a: Vector3::zeros(),
            pi: Vector3::zeros(),
            tau: Vector3::zeros(),
        }
    }
}

impl MotionState {
    pub fn new(
        centre_of_rotation: Point3<f64>,
        q: Matrix3<f64>,
        v: Vector3<f64>,
        a: Vector3<f64>,
        pi: Vector3<f64>,
        tau: Vector3<f64>,
    ) -> Self {
        Self {
            centre_of_rotation,
            q,
            v,
            a,
            pi,
            tau,
        }
    }

    /// A body at rest at `centre_of_rotation` with orientation `q`.
    pub fn at_rest(centre_of_rotation: Point3<f64>, q: Matrix3<f64>) -> Self {
        Self {
            centre_of_rotation,
            q,
            ..Self::default()
        }
    }

    pub fn centre_of_rotation(&self) -> &Point3<f64> {
        &self.centre_of_rotation
    }
    pub fn q(&self) -> &Matrix3<f64> {
        &self.q
    }
    pub fn v(&self) -> &Vector3<f64> {
        &self.v
    }
    pub fn a(&self) -> &Vector3<f64> {
        &self.a
    }
    pub fn pi(&self) -> &Vector3<f64> {
        &self.pi
    }
    pub fn tau(&self) -> &Vector3<f64> {
        &self.tau
    }

    pub fn set_centre_of_rotation(&mut self, centre_of_rotation: Point3<f64>) {
        self.centre_of_rotation = centre_of_rotation;
    }
    pub fn set_q(&mut self, q: Matrix3<f64>) {
        self.q = q;
    }
    pub fn set_v(&mut self, v: Vector3<f64>) {
        self.v = v;
    }
    pub fn set_a(&mut self, a: Vector3<f64>) {
        self.a = a;
    }
    pub fn set_pi(&mut self, pi: Vector3<f64>) {
        self.pi = pi;
    }
    pub fn set_tau(&mut self, tau: Vector3<f64>) {
        self.tau = tau;
    }

    /// Returns `true` if every component of the snapshot is a finite number.
    pub fn is_finite(&self) -> bool {
        self.centre_of_rotation.coords.iter().all(|c| c.is_finite())
            && self.q.iter().all(|c| c.is_finite())
            && self.v.iter().all(|c| c.is_finite())
            && self.a.iter().all(|c| c.is_finite())
            && self.pi.iter().all(|c| c.is_finite())
            && self.tau.iter().all(|c| c.is_finite())
    }
}
