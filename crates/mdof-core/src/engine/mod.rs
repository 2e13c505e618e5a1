//! # Engine Module
//!
//! The stateful layer: the long-lived [`motion::SystemMotion`] object and the
//! machinery it orchestrates on every coupling sub-iteration.
//!
//! ## Architecture
//!
//! - **Motion** ([`motion`]) - Owns the previous/current state pair, the reference frame and the solver
//! - **Dynamics** ([`dynamics`]) - Acceleration update: restraints, frames, projection, relaxation, damping
//! - **Solvers** ([`solvers`]) - Symplectic predictor and the Crank-Nicolson / Newmark correctors
//! - **State Log** ([`state_log`]) - Tabular time history of the body's motion
//! - **Progress** ([`progress`]) - Callback-based progress reporting for long runs
//! - **Error Handling** ([`error`]) - Engine error type
//!
//! ## Time-Step Protocol
//!
//! The coupling loop calls `new_time()` once per time step, which copies the current
//! state into the previous-state slot, followed by one or more `update()` calls. The
//! first `update()` of a step runs the explicit predictor, and later calls in the same
//! step run the configured implicit corrector from the start-of-step state using the
//! latest estimate. Convergence of those sub-iterations is entirely the caller's
//! business.

pub mod dynamics;
pub mod error;
pub mod motion;
pub mod progress;
pub mod solvers;
pub mod state_log;
