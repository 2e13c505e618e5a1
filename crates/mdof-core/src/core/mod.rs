//! # Core Module
//!
//! The foundation layer of the motion library: value types and pure functions with
//! no knowledge of the time-stepping protocol.
//!
//! ## Architecture
//!
//! - **Kinematic State** ([`state`]) - The per-step `MotionState` snapshot
//! - **Rotation Tensors** ([`tensor`]) - Elementary rotations, re-orthonormalisation, angle extraction
//! - **Reference Frame** ([`frame`]) - Initial configuration and point-wise kinematic queries
//! - **Restraints** ([`restraints`]) - Springs and dampers contributing force and moment
//! - **Constraints** ([`constraints`]) - Projectors removing translational/rotational freedom
//! - **Configuration and State I/O** ([`io`]) - TOML records for body parameters and state
//!
//! Frames are a recurring source of confusion in this layer: positions, linear
//! velocities, forces and restraint moments are global, while the angular momentum
//! `pi` and the torque `tau` held by a `MotionState` are expressed in the body frame.

pub mod constraints;
pub mod frame;
pub mod io;
pub mod restraints;
pub mod state;
pub mod tensor;
