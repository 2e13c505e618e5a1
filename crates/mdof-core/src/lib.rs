//! # mdof Core Library
//!
//! A multi-degree-of-freedom rigid-body motion integrator for partitioned
//! fluid/structure coupling. An external coupling loop supplies force and torque
//! samples, and the library advances the position, orientation, velocity and
//! angular momentum of a single rigid body with run-time-selectable restraints,
//! constraints and time-integration schemes.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless value types (`MotionState`, the
//!   reference frame), rotation-tensor utilities, the polymorphic restraint and
//!   constraint models with their tag registries, and TOML intake/output of the
//!   body configuration and state records.
//!
//! - **[`engine`]: The Logic Core.** The stateful `SystemMotion` object, the
//!   acceleration update (restraints, relaxation, damping, constraint projection)
//!   and the integration-scheme strategies (symplectic, Crank-Nicolson, Newmark).
//!
//! - **[`workflows`]: The Public API.** A reference coupling loop that drives a
//!   `SystemMotion` through a fixed schedule of time steps and sub-iterations
//!   against a load model, reporting progress along the way.

pub mod core;
pub mod engine;
pub mod workflows;
