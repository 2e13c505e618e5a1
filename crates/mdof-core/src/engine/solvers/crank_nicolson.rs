use super::symplectic::predict;
use super::{Solver, StepContext};
use crate::core::io::config::{ConfigError, SolverSpec, parse_coeffs};
use crate::core::state::MotionState;
use crate::engine::error::MotionError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CrankNicolsonCoeffs {
    #[serde(default = "half")]
    aoc: f64,
    #[serde(default = "half")]
    voc: f64,
}

fn half() -> f64 {
    0.5
}

/// Crank-Nicolson corrector with off-centring coefficients.
///
/// `aoc` weights the latest acceleration against the start-of-step one when updating
/// velocities; `voc` does the same for velocities when updating positions. Both at
/// `0.5` give the trapezoidal rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrankNicolson {
    aoc: f64,
    voc: f64,
}

impl Default for CrankNicolson {
    fn default() -> Self {
        Self { aoc: 0.5, voc: 0.5 }
    }
}

impl CrankNicolson {
    pub fn new(aoc: f64, voc: f64) -> Result<Self, ConfigError> {
        for (key, value) in [("solver.aoc", aoc), ("solver.voc", voc)] {
            if !(value.is_finite() && (0.0..=1.0).contains(&value)) {
                return Err(ConfigError::invalid(
                    key,
                    format!("must lie in [0, 1], got {}", value),
                ));
            }
        }
        Ok(Self { aoc, voc })
    }

    pub fn construct(spec: &SolverSpec) -> Result<Box<dyn Solver>, ConfigError> {
        let c: CrankNicolsonCoeffs = parse_coeffs("solver", &spec.type_name, &spec.coeffs)?;
        Ok(Box::new(Self::new(c.aoc, c.voc)?))
    }

    pub fn aoc(&self) -> f64 {
        self.aoc
    }

    pub fn voc(&self) -> f64 {
        self.voc
    }

    fn correct(&self, ctx: &StepContext<'_>) -> Result<MotionState, MotionError> {
        let dynamics = ctx.dynamics;
        let t = dynamics.t_constraints();
        let r = dynamics.r_constraints();
        let s0 = ctx.previous;
        let dt = ctx.delta_t;

        let mut next = ctx.accelerate(ctx.current)?;

        let v = t * (s0.v() + dt * (self.aoc * next.a() + (1.0 - self.aoc) * s0.a()));
        let pi = r * (s0.pi() + dt * (self.aoc * next.tau() + (1.0 - self.aoc) * s0.tau()));
        let centre =
            s0.centre_of_rotation() + dt * (t * (self.voc * v + (1.0 - self.voc) * s0.v()));
        let q = dynamics.rotate(s0.q(), &(r * (self.voc * pi + (1.0 - self.voc) * s0.pi())), dt)?;

        next.set_v(v);
        next.set_pi(pi);
        next.set_centre_of_rotation(centre);
        next.set_q(q);
        Ok(next)
    }
}

impl Solver for CrankNicolson {
    fn type_name(&self) -> &'static str {
        "crank-nicolson"
    }

    fn solve(&self, first_iter: bool, ctx: &StepContext<'_>) -> Result<MotionState, MotionError> {
        if first_iter {
            predict(ctx)
        } else {
            self.correct(ctx)
        }
    }
}
