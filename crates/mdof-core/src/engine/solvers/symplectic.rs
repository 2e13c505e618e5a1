use super::{Solver, StepContext};
use crate::core::io::config::{ConfigError, SolverSpec, parse_coeffs};
use crate::core::state::MotionState;
use crate::engine::error::MotionError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoCoeffs {}

/// Explicit kick-drift-kick (velocity Verlet) integration.
///
/// Rotation is split into successive body-axis rotations applied to `Q` only; the
/// gyroscopic coupling enters through the torque. Every pass restarts from the
/// start-of-step snapshot, so repeating it within a time step just re-samples the load.
#[derive(Debug, Clone, Copy, Default)]
pub struct Symplectic;

impl Symplectic {
    pub fn construct(spec: &SolverSpec) -> Result<Box<dyn Solver>, ConfigError> {
        let _: NoCoeffs = parse_coeffs("solver", &spec.type_name, &spec.coeffs)?;
        Ok(Box::new(Self))
    }
}

impl Solver for Symplectic {
    fn type_name(&self) -> &'static str {
        "symplectic"
    }

    fn solve(&self, _first_iter: bool, ctx: &StepContext<'_>) -> Result<MotionState, MotionError> {
        predict(ctx)
    }
}

/// One explicit step from `ctx.previous`; also the predictor of the implicit schemes.
pub(crate) fn predict(ctx: &StepContext<'_>) -> Result<MotionState, MotionError> {
    let dynamics = ctx.dynamics;
    let t = dynamics.t_constraints();
    let r = dynamics.r_constraints();
    let s0 = ctx.previous;

    // First half-kick with the start-of-step accelerations.
    let v = t * (s0.v() + 0.5 * ctx.delta_t0 * s0.a());
    let pi = r * (s0.pi() + 0.5 * ctx.delta_t0 * s0.tau());

    // Drift.
    let mut drifted = *ctx.current;
    drifted.set_v(v);
    drifted.set_pi(pi);
    drifted.set_centre_of_rotation(s0.centre_of_rotation() + ctx.delta_t * v);
    drifted.set_q(dynamics.rotate(s0.q(), &pi, ctx.delta_t)?);

    // Second half-kick with the accelerations of the drifted configuration.
    let mut next = ctx.accelerate(&drifted)?;
    next.set_v(v + t * (0.5 * ctx.delta_t * next.a()));
    next.set_pi(pi + r * (0.5 * ctx.delta_t * next.tau()));
    Ok(next)
}
