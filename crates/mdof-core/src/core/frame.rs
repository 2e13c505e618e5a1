use super::state::MotionState;
use nalgebra::{Matrix3, Point3, Vector3};

/// The reference configuration of a body, fixed at construction.
///
/// Every point handed to [`BodyKinematics::transform`] is interpreted relative to this
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceFrame {
    centre_of_rotation: Point3<f64>,
    centre_of_mass: Point3<f64>,
    q: Matrix3<f64>,
}

impl ReferenceFrame {
    pub fn new(
        centre_of_rotation: Point3<f64>,
        centre_of_mass: Point3<f64>,
        q: Matrix3<f64>,
    ) -> Self {
        Self {
            centre_of_rotation,
            centre_of_mass,
            q,
        }
    }

    pub fn centre_of_rotation(&self) -> &Point3<f64> {
        &self.centre_of_rotation
    }

    pub fn centre_of_mass(&self) -> &Point3<f64> {
        &self.centre_of_mass
    }

    pub fn q(&self) -> &Matrix3<f64> {
        &self.q
    }
}

/// Read-only kinematic view of a body: its reference configuration, one motion
/// state and the principal moments of inertia needed to turn `pi` into an angular
/// velocity.
#[derive(Debug, Clone, Copy)]
pub struct BodyKinematics<'a> {
    reference: &'a ReferenceFrame,
    state: &'a MotionState,
    moment_of_inertia: &'a Vector3<f64>,
}

impl<'a> BodyKinematics<'a> {
    pub fn new(
        reference: &'a ReferenceFrame,
        state: &'a MotionState,
        moment_of_inertia: &'a Vector3<f64>,
    ) -> Self {
        Self {
            reference,
            state,
            moment_of_inertia,
        }
    }

    pub fn reference(&self) -> &ReferenceFrame {
        self.reference
    }

    pub fn state(&self) -> &MotionState {
        self.state
    }

    /// Angular velocity in the body frame, `I⁻¹·pi`.
    pub fn omega_body(&self) -> Vector3<f64> {
        self.state.pi().component_div(self.moment_of_inertia)
    }

    /// Angular velocity in the global frame.
    pub fn omega(&self) -> Vector3<f64> {
        self.state.q() * self.omega_body()
    }

    /// Angular acceleration in the global frame.
    pub fn angular_acceleration(&self) -> Vector3<f64> {
        self.state.q() * self.state.tau().component_div(self.moment_of_inertia)
    }

    /// Rotation accumulated since the reference configuration, `Q·Q₀ᵀ`.
    pub fn rotation_from_reference(&self) -> Matrix3<f64> {
        self.state.q() * self.reference.q().transpose()
    }

    /// Maps a reference-configuration point to its current global position.
    pub fn transform(&self, initial_point: &Point3<f64>) -> Point3<f64> {
        self.state.centre_of_rotation()
            + self.rotation_from_reference() * (initial_point - self.reference.centre_of_rotation())
    }

    /// Current position of the initial centre of mass.
    pub fn centre_of_mass(&self) -> Point3<f64> {
        self.transform(self.reference.centre_of_mass())
    }

    /// Displacement of a reference-configuration point.
    pub fn displacement(&self, initial_point: &Point3<f64>) -> Vector3<f64> {
        self.transform(initial_point) - initial_point
    }

    /// Velocity of the body at a current global position.
    pub fn velocity(&self, point: &Point3<f64>) -> Vector3<f64> {
        let r = point - self.state.centre_of_rotation();
        self.state.v() + self.omega().cross(&r)
    }

    /// Acceleration of the body at a current global position.
    pub fn acceleration(&self, point: &Point3<f64>) -> Vector3<f64> {
        let r = point - self.state.centre_of_rotation();
        let omega = self.omega();
        self.state.a() + self.angular_acceleration().cross(&r) + omega.cross(&omega.cross(&r))
    }
}
