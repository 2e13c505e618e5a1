//! # Restraints Module
//!
//! Restraints are additional force/torque sources coupled to the body's state, such as
//! mooring springs, dampers and the lumped stiffness/damping of a building model.
//!
//! ## Overview
//!
//! Each restraint implements [`Restraint`] and is built from a tagged configuration
//! entry through the [`RESTRAINT_TYPES`] registry. A restraint only holds its own
//! configuration; everything it needs about the body is passed in as a
//! [`BodyKinematics`] view, so repeated evaluation against the same state always gives
//! the same result.
//!
//! Forces and moments are returned in the global frame. Moments are taken about the
//! current centre of rotation.

pub mod angular;
pub mod linear_damper;
pub mod linear_spring;
pub mod lumped;

use crate::core::frame::BodyKinematics;
use crate::core::io::config::{ConfigError, ModelSpec};
use nalgebra::Vector3;
use phf::{Map, phf_map};
use std::fmt::Debug;

/// Global-frame force and moment (about the centre of rotation) produced by a restraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Restraining {
    pub force: Vector3<f64>,
    pub moment: Vector3<f64>,
}

impl Default for Restraining {
    fn default() -> Self {
        Self {
            force: Vector3::zeros(),
            moment: Vector3::zeros(),
        }
    }
}

impl std::ops::Add for Restraining {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            force: self.force + rhs.force,
            moment: self.moment + rhs.moment,
        }
    }
}

pub trait Restraint: Debug + Send + Sync {
    /// The user-facing name of this restraint instance.
    fn name(&self) -> &str;

    /// The registry tag this restraint was built from.
    fn type_name(&self) -> &'static str;

    fn restrain(&self, body: &BodyKinematics<'_>) -> Restraining;
}

pub type RestraintConstructor = fn(&ModelSpec) -> Result<Box<dyn Restraint>, ConfigError>;

pub static RESTRAINT_TYPES: Map<&'static str, RestraintConstructor> = phf_map! {
    "linear-spring" => linear_spring::LinearSpring::construct as RestraintConstructor,
    "linear-damper" => linear_damper::LinearDamper::construct as RestraintConstructor,
    "spherical-angular-spring" => angular::SphericalAngularSpring::construct as RestraintConstructor,
    "spherical-angular-damper" => angular::SphericalAngularDamper::construct as RestraintConstructor,
    "lumped" => lumped::LumpedStiffness::construct as RestraintConstructor,
};

fn known_types() -> String {
    let mut tags: Vec<&str> = RESTRAINT_TYPES.keys().copied().collect();
    tags.sort_unstable();
    tags.join(", ")
}

pub fn build(spec: &ModelSpec) -> Result<Box<dyn Restraint>, ConfigError> {
    let constructor =
        RESTRAINT_TYPES
            .get(spec.type_name.as_str())
            .ok_or_else(|| ConfigError::UnknownType {
                kind: "restraint",
                tag: spec.type_name.clone(),
                expected: known_types(),
            })?;
    constructor(spec)
}

pub fn build_all(specs: &[ModelSpec]) -> Result<Vec<Box<dyn Restraint>>, ConfigError> {
    specs.iter().map(build).collect()
}

/// Sums every restraint's contribution at the given kinematic state.
pub fn total(restraints: &[Box<dyn Restraint>], body: &BodyKinematics<'_>) -> Restraining {
    restraints
        .iter()
        .map(|r| r.restrain(body))
        .fold(Restraining::default(), |acc, r| acc + r)
}


#[cfg(test)]
mod tests {
    use super::test_support::spec;
    use super::*;
    use crate::core::frame::ReferenceFrame;
    use crate::core::state::MotionState;
    use nalgebra::{Matrix3, Point3};

    #[test]
    fn builds_every_registered_type_by_tag() {
        let damper = build(&spec("d", "linear-damper", "coeff = 2.0")).unwrap();
        assert_eq!(damper.type_name(), "linear-damper");
        assert_eq!(damper.name(), "d");

        let angular = build(&spec("a", "spherical-angular-damper", "coeff = 1.0")).unwrap();
        assert_eq!(angular.type_name(), "spherical-angular-damper");
    }

    #[test]
    fn unknown_tag_lists_the_known_types() {
        let err = build(&spec("x", "bungee", "")).unwrap_err();
        match err {
            ConfigError::UnknownType { kind, tag, expected } => {
                assert_eq!(kind, "restraint");
                assert_eq!(tag, "bungee");
                assert!(expected.contains("linear-spring"));
                assert!(expected.contains("lumped"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_coefficients_are_rejected() {
        let err = build(&spec("d", "linear-damper", "coef = 2.0")).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn total_sums_contributions_in_order() {
        let restraints = build_all(&[
            spec("d1", "linear-damper", "coeff = 1.0"),
            spec("d2", "linear-damper", "coeff = 3.0"),
        ])
        .unwrap();

        let reference = ReferenceFrame::new(Point3::origin(), Point3::origin(), Matrix3::identity());
        let mut state = MotionState::default();
        state.set_v(Vector3::new(0.5, 0.0, 0.0));
        let inertia = Vector3::new(1.0, 1.0, 1.0);
        let body = BodyKinematics::new(&reference, &state, &inertia);

        let sum = total(&restraints, &body);
        assert_eq!(sum.force, Vector3::new(-2.0, 0.0, 0.0));
        assert_eq!(sum.moment, Vector3::zeros());
    }
}
