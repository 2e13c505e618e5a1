//! # Constraints Module
//!
//! Constraints remove translational and/or rotational degrees of freedom from the
//! body. Every constraint contributes locked directions to a translational and a
//! rotational [`PointConstraint`] accumulator; the combined accumulators yield the
//! projection tensors applied to each computed increment before integration.
//!
//! Translational directions are global. Rotational directions are expressed in the
//! body frame, matching the frame of the angular momentum they act on.

pub mod point_constraint;
pub mod rotational;
pub mod translational;

pub use point_constraint::PointConstraint;

use crate::core::io::config::{ConfigError, ModelSpec};
use nalgebra::{Matrix3, Vector3};
use phf::{Map, phf_map};
use std::fmt::Debug;

pub trait Constraint: Debug + Send + Sync {
    fn name(&self) -> &str;

    fn type_name(&self) -> &'static str;

    fn constrain_translation(&self, _pc: &mut PointConstraint) {}

    fn constrain_rotation(&self, _pc: &mut PointConstraint) {}
}

pub type ConstraintConstructor = fn(&ModelSpec) -> Result<Box<dyn Constraint>, ConfigError>;

pub static CONSTRAINT_TYPES: Map<&'static str, ConstraintConstructor> = phf_map! {
    "plane" => translational::PlaneConstraint::construct as ConstraintConstructor,
    "line" => translational::LineConstraint::construct as ConstraintConstructor,
    "point" => translational::PointLock::construct as ConstraintConstructor,
    "axis" => rotational::AxisConstraint::construct as ConstraintConstructor,
    "orientation" => rotational::OrientationLock::construct as ConstraintConstructor,
};

pub fn build(spec: &ModelSpec) -> Result<Box<dyn Constraint>, ConfigError> {
    let constructor =
        CONSTRAINT_TYPES
            .get(spec.type_name.as_str())
            .ok_or_else(|| {
                let mut tags: Vec<&str> = CONSTRAINT_TYPES.keys().copied().collect();
                tags.sort_unstable();
                ConfigError::UnknownType {
                    kind: "constraint",
                    tag: spec.type_name.clone(),
                    expected: tags.join(", "),
                }
            })?;
    constructor(spec)
}

pub fn build_all(specs: &[ModelSpec]) -> Result<Vec<Box<dyn Constraint>>, ConfigError> {
    specs.iter().map(build).collect()
}

/// Translational and rotational projection tensors of a set of constraints.
pub fn projectors(constraints: &[Box<dyn Constraint>]) -> (Matrix3<f64>, Matrix3<f64>) {
    let mut translation = PointConstraint::free();
    let mut rotation = PointConstraint::free();
    for constraint in constraints {
        constraint.constrain_translation(&mut translation);
        constraint.constrain_rotation(&mut rotation);
    }
    (translation.transformation(), rotation.transformation())
}

/// Normalises a configured direction, rejecting zero-length or non-finite vectors.
pub(crate) fn unit_direction(key: String, v: [f64; 3]) -> Result<Vector3<f64>, ConfigError> {
    let v = Vector3::from(v);
    let norm = v.norm();
    if norm.is_finite() && norm > f64::EPSILON {
        Ok(v / norm)
    } else {
        Err(ConfigError::invalid(key, "must be a non-zero finite vector"))
    }
}
