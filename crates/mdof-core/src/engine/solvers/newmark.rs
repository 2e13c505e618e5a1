use super::symplectic::predict;
use super::{Solver, StepContext};
use crate::core::io::config::{ConfigError, SolverSpec, parse_coeffs};
use crate::core::state::MotionState;
use crate::engine::error::MotionError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NewmarkCoeffs {
    #[serde(default = "default_beta")]
    beta: f64,
    #[serde(default = "default_gamma")]
    gamma: f64,
}

fn default_beta() -> f64 {
    0.25
}

fn default_gamma() -> f64 {
    0.5
}

/// Newmark-β corrector. The defaults (`β = 0.25`, `γ = 0.5`) are the average
/// acceleration method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Newmark {
    beta: f64,
    gamma: f64,
}

impl Default for Newmark {
    fn default() -> Self {
        Self {
            beta: default_beta(),
            gamma: default_gamma(),
        }
    }
}

impl Newmark {
    pub fn new(beta: f64, gamma: f64) -> Result<Self, ConfigError> {
        if !(beta.is_finite() && beta > 0.0 && beta <= 0.5) {
            return Err(ConfigError::invalid(
                "solver.beta",
                format!("must lie in (0, 0.5], got {}", beta),
            ));
        }
        if !(gamma.is_finite() && (0.0..=1.0).contains(&gamma)) {
            return Err(ConfigError::invalid(
                "solver.gamma",
                format!("must lie in [0, 1], got {}", gamma),
            ));
        }
        Ok(Self { beta, gamma })
    }

    pub fn construct(spec: &SolverSpec) -> Result<Box<dyn Solver>, ConfigError> {
        let c: NewmarkCoeffs = parse_coeffs("solver", &spec.type_name, &spec.coeffs)?;
        Ok(Box::new(Self::new(c.beta, c.gamma)?))
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    fn correct(&self, ctx: &StepContext<'_>) -> Result<MotionState, MotionError> {
        let dynamics = ctx.dynamics;
        let t = dynamics.t_constraints();
        let r = dynamics.r_constraints();
        let s0 = ctx.previous;
        let dt = ctx.delta_t;
        let dt2 = dt * dt;
        let (beta, gamma) = (self.beta, self.gamma);

        let mut next = ctx.accelerate(ctx.current)?;

        let v = t * (s0.v() + dt * (gamma * next.a() + (1.0 - gamma) * s0.a()));
        let pi = r * (s0.pi() + dt * (gamma * next.tau() + (1.0 - gamma) * s0.tau()));

        let centre = s0.centre_of_rotation()
            + t * (dt * s0.v() + dt2 * beta * next.a() + dt2 * (0.5 - beta) * s0.a());
        let pi_delta_t =
            r * (dt * s0.pi() + dt2 * beta * next.tau() + dt2 * (0.5 - beta) * s0.tau());
        let q = dynamics.rotate(s0.q(), &(pi_delta_t / dt), dt)?;

        next.set_v(v);
        next.set_pi(pi);
        next.set_centre_of_rotation(centre);
        next.set_q(q);
        Ok(next)
    }
}

impl Solver for Newmark {
    fn type_name(&self) -> &'static str {
        "newmark"
    }

    fn solve(&self, first_iter: bool, ctx: &StepContext<'_>) -> Result<MotionState, MotionError> {
        if first_iter {
            predict(ctx)
        } else {
            self.correct(ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{oscillator, solver_spec};
    use super::*;
    use crate::core::frame::ReferenceFrame;
    use crate::engine::dynamics::Load;
    use nalgebra::{Matrix3, Point3, Vector3};
    use std::f64::consts::PI;

    #[test]
    fn parameters_are_read_and_validated() {
        let solver = Newmark::construct(&solver_spec("newmark", "beta = 0.3\ngamma = 0.6")).unwrap();
        assert_eq!(solver.type_name(), "newmark");

        for coeffs in ["beta = 0.0", "beta = 0.6", "gamma = -0.1", "gamma = 1.1"] {
            let result = Newmark::construct(&solver_spec("newmark", coeffs));
            assert!(
                matches!(result, Err(ConfigError::InvalidValue { .. })),
                "accepted {coeffs}"
            );
        }
    }

    #[test]
    fn defaults_are_average_acceleration() {
        let n = Newmark::default();
        assert_eq!((n.beta(), n.gamma()), (0.25, 0.5));
    }

    #[test]
    fn corrector_uses_beta_weighted_displacement() {
        let dynamics = oscillator();
        let reference = ReferenceFrame::new(Point3::origin(), Point3::origin(), Matrix3::identity());
        let s0 = MotionState::at_rest(Point3::origin(), Matrix3::identity());
        let ctx = StepContext {
            dynamics: &dynamics,
            reference: &reference,
            previous: &s0,
            current: &s0,
            load: Load::new(Vector3::new(4.0, 0.0, 0.0), Vector3::zeros()),
            delta_t: 0.5,
            delta_t0: 0.5,
            relax: false,
        };

        // a = 4, a0 = 0: c = dt^2 * beta * a = 0.25 * 0.25 * 4
        let next = Newmark::default().solve(false, &ctx).unwrap();
        assert!((next.centre_of_rotation().x - 0.25).abs() < 1e-15);
        assert!((next.v().x - 1.0).abs() < 1e-15);
    }

    #[test]
    fn iterated_corrector_tracks_the_oscillator() {
        let dynamics = oscillator();
        let reference = ReferenceFrame::new(Point3::origin(), Point3::origin(), Matrix3::identity());
        let solver = Newmark::default();
        let delta_t = 0.01;
        let steps = (2.0 * PI / delta_t).round() as usize;

        let mut state = MotionState::at_rest(Point3::new(1.0, 0.0, 0.0), Matrix3::identity());
        state.set_a(Vector3::new(-1.0, 0.0, 0.0));
        for _ in 0..steps {
            let s0 = state;
            for iteration in 0..6 {
                let current = state;
                let ctx = StepContext {
                    dynamics: &dynamics,
                    reference: &reference,
                    previous: &s0,
                    current: &current,
                    load: Load::zero(),
                    delta_t,
                    delta_t0: delta_t,
                    relax: false,
                };
                state = solver.solve(iteration == 0, &ctx).unwrap();
            }
        }

        let t = steps as f64 * delta_t;
        assert!((state.centre_of_rotation().x - t.cos()).abs() < 1e-3);
        assert!((state.v().x + t.sin()).abs() < 1e-3);
    }
}
