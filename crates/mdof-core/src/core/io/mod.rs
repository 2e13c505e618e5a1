//! # I/O Module
//!
//! TOML intake and output for the two records a body is built from: the constant
//! configuration (mass, inertia, coefficients, solver, restraints, constraints) and
//! the kinematic state record. Both use kebab-case keys.

pub mod config;
pub mod state_record;
