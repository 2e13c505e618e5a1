use super::dynamics::{Dynamics, Load};
use super::error::MotionError;
use super::solvers::{self, Solver, StepContext};
use crate::core::constraints::Constraint;
use crate::core::frame::{BodyKinematics, ReferenceFrame};
use crate::core::io::config::MotionConfig;
use crate::core::io::state_record::MotionStateRecord;
use crate::core::restraints::Restraint;
use crate::core::state::MotionState;
use nalgebra::{Matrix3, Point3, Vector3};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Six-degree-of-freedom motion of a single rigid body.
///
/// Holds the start-of-step snapshot (`motion_state0`) and the latest estimate
/// (`motion_state`). The coupling loop calls [`new_time`](Self::new_time) once per time
/// step and [`update`](Self::update) one or more times; the point queries always read
/// the latest estimate.
#[derive(Debug)]
pub struct SystemMotion {
    motion_state: MotionState,
    motion_state0: MotionState,
    reference: ReferenceFrame,
    dynamics: Dynamics,
    solver: Box<dyn Solver>,
    report: bool,
    /// Set once the first update has produced accelerations to relax against.
    updated: bool,
}

impl SystemMotion {
    #[instrument(skip_all, name = "system_motion_new")]
    pub fn new(config: &MotionConfig, record: &MotionStateRecord) -> Result<Self, MotionError> {
        let dynamics = Dynamics::from_config(config)?;
        let solver = solvers::build(&config.solver)?;
        let motion_state = dynamics.constrain(&record.motion_state()?);

        let (initial_centre, initial_q) = record.initial_configuration()?;
        let initial_centre_of_mass = config
            .centre_of_mass
            .map(Point3::from)
            .unwrap_or(initial_centre);
        let reference = ReferenceFrame::new(initial_centre, initial_centre_of_mass, initial_q);

        info!(
            mass = dynamics.mass(),
            solver = solver.type_name(),
            restraints = dynamics.restraints().len(),
            constraints = dynamics.constraints().len(),
            "Rigid-body motion initialized."
        );

        Ok(Self {
            motion_state,
            motion_state0: motion_state,
            reference,
            dynamics,
            solver,
            report: config.report,
            updated: false,
        })
    }

    /// Loads the configuration and, if given, a state record; without one the body
    /// starts at rest at the origin.
    pub fn from_files(config_path: &Path, state_path: Option<&Path>) -> Result<Self, MotionError> {
        let config = MotionConfig::load(config_path)?;
        let record = match state_path {
            Some(path) => MotionStateRecord::load(path)?,
            None => MotionStateRecord::default(),
        };
        Self::new(&config, &record)
    }

    /// Replaces the parameters, restraints, constraints and solver. Position, orientation
    /// and the reference configuration are kept; rates along directions the new
    /// constraints lock are dropped. Nothing changes if the new configuration is rejected.
    #[instrument(skip_all, name = "system_motion_read")]
    pub fn read(&mut self, config: &MotionConfig) -> Result<(), MotionError> {
        let dynamics = Dynamics::from_config(config)?;
        let solver = solvers::build(&config.solver)?;

        self.motion_state = dynamics.constrain(&self.motion_state);
        self.motion_state0 = dynamics.constrain(&self.motion_state0);
        self.dynamics = dynamics;
        self.solver = solver;
        self.report = config.report;

        info!(
            solver = self.solver.type_name(),
            restraints = self.dynamics.restraints().len(),
            constraints = self.dynamics.constraints().len(),
            "Rigid-body motion re-read."
        );
        Ok(())
    }

    /// Starts a new time step: the latest estimate becomes the start-of-step snapshot.
    pub fn new_time(&mut self) {
        self.motion_state0 = self.motion_state;
    }

    /// Advances the latest estimate under the global force and torque (about the centre
    /// of rotation). `first_iter` marks the first sub-iteration of the time step;
    /// `delta_t0` is the length of the previous step.
    ///
    /// On error the latest estimate is left as it was.
    pub fn update(
        &mut self,
        first_iter: bool,
        f_global: Vector3<f64>,
        tau_global: Vector3<f64>,
        delta_t: f64,
        delta_t0: f64,
    ) -> Result<(), MotionError> {
        check_time_step("delta_t", delta_t)?;
        check_time_step("delta_t0", delta_t0)?;

        let ctx = StepContext {
            dynamics: &self.dynamics,
            reference: &self.reference,
            previous: &self.motion_state0,
            current: &self.motion_state,
            load: Load::new(f_global, tau_global),
            delta_t,
            delta_t0,
            relax: self.updated,
        };
        let next = self.solver.solve(first_iter, &ctx)?;

        if !next.is_finite() {
            return Err(MotionError::Degenerate {
                quantity: "motion state",
                detail: format!("{} update produced non-finite values", self.solver.type_name()),
            });
        }

        debug!(
            first_iter,
            delta_t,
            solver = self.solver.type_name(),
            centre_of_rotation = %format_vector(&next.centre_of_rotation().coords),
            velocity = %format_vector(next.v()),
            "Rigid-body motion updated."
        );

        self.motion_state = next;
        self.updated = true;
        Ok(())
    }

    /// Emits the current position, orientation and velocities when reporting is on.
    pub fn status(&self) {
        if !self.report {
            return;
        }
        let q = self.orientation();
        info!(
            centre_of_rotation = %format_vector(&self.centre_of_rotation().coords),
            centre_of_mass = %format_vector(&self.centre_of_mass().coords),
            orientation = %format!(
                "[{} {} {}]",
                format_vector(&q.row(0).transpose()),
                format_vector(&q.row(1).transpose()),
                format_vector(&q.row(2).transpose())
            ),
            velocity = %format_vector(self.v()),
            angular_velocity = %format_vector(&self.omega()),
            "Rigid-body motion status."
        );
    }

    /// The latest estimate together with the reference configuration, as a record that
    /// [`new`](Self::new) accepts back.
    pub fn write(&self) -> MotionStateRecord {
        MotionStateRecord::from_state(&self.motion_state, &self.reference)
    }

    pub fn write_to(&self, writer: &mut impl Write) -> Result<(), MotionError> {
        Ok(self.write().write_to(writer)?)
    }

    pub fn state(&self) -> &MotionState {
        &self.motion_state
    }

    pub fn previous_state(&self) -> &MotionState {
        &self.motion_state0
    }

    pub fn reference(&self) -> &ReferenceFrame {
        &self.reference
    }

    pub fn dynamics(&self) -> &Dynamics {
        &self.dynamics
    }

    pub fn solver_name(&self) -> &'static str {
        self.solver.type_name()
    }

    pub fn report(&self) -> bool {
        self.report
    }

    pub fn mass(&self) -> f64 {
        self.dynamics.mass()
    }

    pub fn moment_of_inertia(&self) -> &Vector3<f64> {
        self.dynamics.moment_of_inertia()
    }

    pub fn restraints(&self) -> &[Box<dyn Restraint>] {
        self.dynamics.restraints()
    }

    pub fn constraints(&self) -> &[Box<dyn Constraint>] {
        self.dynamics.constraints()
    }

    pub fn t_constraints(&self) -> &Matrix3<f64> {
        self.dynamics.t_constraints()
    }

    pub fn r_constraints(&self) -> &Matrix3<f64> {
        self.dynamics.r_constraints()
    }

    pub fn centre_of_rotation(&self) -> &Point3<f64> {
        self.motion_state.centre_of_rotation()
    }

    pub fn initial_centre_of_rotation(&self) -> &Point3<f64> {
        self.reference.centre_of_rotation()
    }

    pub fn orientation(&self) -> &Matrix3<f64> {
        self.motion_state.q()
    }

    pub fn v(&self) -> &Vector3<f64> {
        self.motion_state.v()
    }

    pub fn a(&self) -> &Vector3<f64> {
        self.motion_state.a()
    }

    /// Angular velocity in the global frame.
    pub fn omega(&self) -> Vector3<f64> {
        self.kinematics().omega()
    }

    /// Current position of the initial centre of mass.
    pub fn centre_of_mass(&self) -> Point3<f64> {
        self.kinematics().centre_of_mass()
    }

    pub fn kinematics(&self) -> BodyKinematics<'_> {
        self.dynamics.kinematics(&self.reference, &self.motion_state)
    }

    pub fn transform(&self, initial_point: &Point3<f64>) -> Point3<f64> {
        self.kinematics().transform(initial_point)
    }

    pub fn transform_points(&self, initial_points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        let body = self.kinematics();
        initial_points.iter().map(|p| body.transform(p)).collect()
    }

    /// Per-point blend between the reference position (scale 0) and the full rigid
    /// transform (scale 1). Scales are clamped to `[0, 1]`.
    pub fn transform_scaled(
        &self,
        initial_points: &[Point3<f64>],
        scale: &[f64],
    ) -> Result<Vec<Point3<f64>>, MotionError> {
        if initial_points.len() != scale.len() {
            return Err(MotionError::FieldSizeMismatch {
                points: initial_points.len(),
                scales: scale.len(),
            });
        }

        let body = self.kinematics();
        Ok(initial_points
            .iter()
            .zip(scale)
            .map(|(p0, &s)| {
                if s >= 1.0 {
                    body.transform(p0)
                } else if s > 0.0 {
                    p0 + s * (body.transform(p0) - p0)
                } else {
                    *p0
                }
            })
            .collect())
    }

    /// Velocity of the body at a current global position.
    pub fn velocity(&self, point: &Point3<f64>) -> Vector3<f64> {
        self.kinematics().velocity(point)
    }

    /// Acceleration of the body at a current global position.
    pub fn acceleration(&self, point: &Point3<f64>) -> Vector3<f64> {
        self.kinematics().acceleration(point)
    }

    pub fn displacement(&self, initial_point: &Point3<f64>) -> Vector3<f64> {
        self.kinematics().displacement(initial_point)
    }
}

fn check_time_step(name: &'static str, value: f64) -> Result<(), MotionError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MotionError::InvalidTimeStep { name, value })
    }
}

fn format_vector(v: &Vector3<f64>) -> String {
    format!("({:.6e} {:.6e} {:.6e})", v.x, v.y, v.z)
}
