use super::error::MotionError;
use crate::core::constraints::{self, Constraint};
use crate::core::frame::{BodyKinematics, ReferenceFrame};
use crate::core::io::config::{ConfigError, MotionConfig, require_non_negative, require_positive};
use crate::core::restraints::{self, Restraint};
use crate::core::state::MotionState;
use crate::core::tensor;
use nalgebra::{Matrix3, Vector3};

/// External force and torque about the centre of rotation, both in the global frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Load {
    pub force: Vector3<f64>,
    pub torque: Vector3<f64>,
}

impl Load {
    pub fn new(force: Vector3<f64>, torque: Vector3<f64>) -> Self {
        Self { force, torque }
    }

    pub fn zero() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros())
    }
}

/// Inertial properties, coefficients, restraints and constraint projectors of a body.
///
/// Everything here is configuration: it is rebuilt wholesale by `SystemMotion::read`
/// and never touched by an update.
#[derive(Debug)]
pub struct Dynamics {
    mass: f64,
    moment_of_inertia: Vector3<f64>,
    a_relax: f64,
    a_damp: f64,
    restraints: Vec<Box<dyn Restraint>>,
    constraints: Vec<Box<dyn Constraint>>,
    t_constraints: Matrix3<f64>,
    r_constraints: Matrix3<f64>,
}

impl Dynamics {
    pub fn from_config(config: &MotionConfig) -> Result<Self, ConfigError> {
        let mass = require_positive("mass", config.mass)?;
        let [ixx, iyy, izz] = config.moment_of_inertia;
        let moment_of_inertia = Vector3::new(
            require_positive("moment-of-inertia[0]", ixx)?,
            require_positive("moment-of-inertia[1]", iyy)?,
            require_positive("moment-of-inertia[2]", izz)?,
        );

        let a_relax = config.acceleration_relaxation;
        if !(a_relax.is_finite() && a_relax > 0.0 && a_relax <= 1.0) {
            return Err(ConfigError::invalid(
                "acceleration-relaxation",
                format!("must lie in (0, 1], got {}", a_relax),
            ));
        }
        let a_damp = require_non_negative("acceleration-damping", config.acceleration_damping)?;

        let restraints = restraints::build_all(&config.restraints)?;
        let constraints = constraints::build_all(&config.constraints)?;
        let (t_constraints, r_constraints) = constraints::projectors(&constraints);

        Ok(Self {
            mass,
            moment_of_inertia,
            a_relax,
            a_damp,
            restraints,
            constraints,
            t_constraints,
            r_constraints,
        })
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn moment_of_inertia(&self) -> &Vector3<f64> {
        &self.moment_of_inertia
    }

    pub fn a_relax(&self) -> f64 {
        self.a_relax
    }

    pub fn a_damp(&self) -> f64 {
        self.a_damp
    }

    pub fn restraints(&self) -> &[Box<dyn Restraint>] {
        &self.restraints
    }

    pub fn constraints(&self) -> &[Box<dyn Constraint>] {
        &self.constraints
    }

    pub fn t_constraints(&self) -> &Matrix3<f64> {
        &self.t_constraints
    }

    pub fn r_constraints(&self) -> &Matrix3<f64> {
        &self.r_constraints
    }

    pub fn kinematics<'a>(
        &'a self,
        reference: &'a ReferenceFrame,
        state: &'a MotionState,
    ) -> BodyKinematics<'a> {
        BodyKinematics::new(reference, state, &self.moment_of_inertia)
    }

    /// Recomputes the linear acceleration and body-frame torque of `state`.
    ///
    /// Restraints are evaluated at `state`, the global torque is rotated into the body
    /// frame and the gyroscopic term `ω × pi` removed. When `relax` is set the result
    /// is under-relaxed against the accelerations already carried by `state` (the
    /// previous iteration). Steady-state damping then subtracts `aDamp·v` and
    /// `aDamp·pi`.
    pub fn accelerate(
        &self,
        reference: &ReferenceFrame,
        state: &MotionState,
        load: &Load,
        relax: bool,
    ) -> Result<MotionState, MotionError> {
        let body = self.kinematics(reference, state);
        let restraining = restraints::total(&self.restraints, &body);

        let force = load.force + restraining.force;
        let torque = body_torque(state.q(), &(load.torque + restraining.moment));
        let gyroscopic = body.omega_body().cross(state.pi());

        let mut a = self.t_constraints * (force / self.mass);
        let mut tau = self.r_constraints * (torque - gyroscopic);

        if relax {
            a = self.a_relax * a + (1.0 - self.a_relax) * state.a();
            tau = self.a_relax * tau + (1.0 - self.a_relax) * state.tau();
        }

        a -= self.a_damp * state.v();
        tau -= self.a_damp * state.pi();

        let a = self.t_constraints * a;
        let tau = self.r_constraints * tau;

        if !a.iter().chain(tau.iter()).all(|c| c.is_finite()) {
            return Err(MotionError::Degenerate {
                quantity: "acceleration",
                detail: format!(
                    "a = [{}, {}, {}], tau = [{}, {}, {}]",
                    a.x, a.y, a.z, tau.x, tau.y, tau.z
                ),
            });
        }

        let mut next = *state;
        next.set_a(a);
        next.set_tau(tau);
        Ok(next)
    }

    /// `state` with velocity, acceleration, angular momentum and torque projected onto
    /// the free directions.
    pub fn constrain(&self, state: &MotionState) -> MotionState {
        let mut next = *state;
        next.set_v(self.t_constraints * state.v());
        next.set_a(self.t_constraints * state.a());
        next.set_pi(self.r_constraints * state.pi());
        next.set_tau(self.r_constraints * state.tau());
        next
    }

    /// Orientation reached from `q0` by rotating with body angular momentum `pi` for
    /// `delta_t`, composed as successive rotations about body x, y and z.
    pub fn rotate(
        &self,
        q0: &Matrix3<f64>,
        pi: &Vector3<f64>,
        delta_t: f64,
    ) -> Result<Matrix3<f64>, MotionError> {
        let angles = delta_t * pi.component_div(&self.moment_of_inertia);
        let q = q0 * tensor::split_rotation(&angles);
        tensor::correct_drift(&q).ok_or_else(|| MotionError::Degenerate {
            quantity: "orientation",
            detail: format!(
                "rotation by angles [{}, {}, {}] left a non-rotation tensor",
                angles.x, angles.y, angles.z
            ),
        })
    }
}

/// Rotates a global-frame torque into the body frame, `Qᵀ·τ`.
pub fn body_torque(q: &Matrix3<f64>, tau_global: &Vector3<f64>) -> Vector3<f64> {
    q.transpose() * tau_global
}
