//! # Solvers Module
//!
//! Time-integration schemes for the rigid-body equations of motion.
//!
//! ## Overview
//!
//! Every scheme is a [`Solver`] strategy that maps a [`StepContext`] to a fresh
//! [`MotionState`]. The symplectic scheme is explicit and doubles as the predictor for
//! the implicit correctors; Crank-Nicolson and Newmark blend start-of-step and latest
//! accelerations and are meant to be iterated to convergence by the caller.
//!
//! Schemes are selected by the `type` tag of the `[solver]` table through
//! [`SOLVER_TYPES`].

pub mod crank_nicolson;
pub mod newmark;
pub mod symplectic;

pub use crank_nicolson::CrankNicolson;
pub use newmark::Newmark;
pub use symplectic::Symplectic;

use super::dynamics::{Dynamics, Load};
use super::error::MotionError;
use crate::core::frame::ReferenceFrame;
use crate::core::io::config::{ConfigError, SolverSpec};
use crate::core::state::MotionState;
use phf::{Map, phf_map};
use std::fmt::Debug;

/// Everything a scheme needs for one pass: the constant body description, the
/// start-of-step snapshot, the latest estimate and the load sampled for this pass.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub dynamics: &'a Dynamics,
    pub reference: &'a ReferenceFrame,
    /// Snapshot at the start of the time step (`motion_state0`).
    pub previous: &'a MotionState,
    /// Latest estimate of the end-of-step state.
    pub current: &'a MotionState,
    pub load: Load,
    pub delta_t: f64,
    pub delta_t0: f64,
    /// Whether acceleration relaxation may blend against `current`.
    pub relax: bool,
}

impl StepContext<'_> {
    /// Recomputes accelerations of `state` under this pass's load.
    pub fn accelerate(&self, state: &MotionState) -> Result<MotionState, MotionError> {
        self.dynamics
            .accelerate(self.reference, state, &self.load, self.relax)
    }
}

pub trait Solver: Debug + Send + Sync {
    fn type_name(&self) -> &'static str;

    /// Produces the new end-of-step estimate. `first_iter` marks the first pass of a
    /// time step.
    fn solve(&self, first_iter: bool, ctx: &StepContext<'_>) -> Result<MotionState, MotionError>;
}

pub type SolverConstructor = fn(&SolverSpec) -> Result<Box<dyn Solver>, ConfigError>;

pub static SOLVER_TYPES: Map<&'static str, SolverConstructor> = phf_map! {
    "symplectic" => Symplectic::construct as SolverConstructor,
    "crank-nicolson" => CrankNicolson::construct as SolverConstructor,
    "newmark" => Newmark::construct as SolverConstructor,
};

pub fn build(spec: &SolverSpec) -> Result<Box<dyn Solver>, ConfigError> {
    let constructor = SOLVER_TYPES.get(spec.type_name.as_str()).ok_or_else(|| {
        let mut tags: Vec<&str> = SOLVER_TYPES.keys().copied().collect();
        tags.sort_unstable();
        ConfigError::UnknownType {
            kind: "solver",
            tag: spec.type_name.clone(),
            expected: tags.join(", "),
        }
    })?;
    constructor(spec)
}
