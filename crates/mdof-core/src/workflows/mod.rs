//! # Workflows Module
//!
//! High-level drivers that put a [`SystemMotion`](crate::engine::motion::SystemMotion)
//! through a complete run.
//!
//! ## Overview
//!
//! The motion object only knows how to advance one sub-iteration at a time; a real
//! simulation embeds it in a fluid or structural solver that owns time stepping and
//! supplies the loads. The workflows here play that role for stand-alone use: a fixed
//! schedule of time steps and sub-iterations, a load model sampled before every
//! update, and an observer that records the trajectory.
//!
//! ## Architecture
//!
//! - **Coupling Workflow** ([`coupling`]) - Fixed-step coupling loop with predictor and
//!   corrector sub-iterations, load models and step observers.

pub mod coupling;
