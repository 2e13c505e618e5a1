use super::{Restraining, Restraint};
use crate::core::frame::BodyKinematics;
use crate::core::io::config::{ConfigError, ModelSpec, parse_coeffs, require_non_negative};
use crate::core::tensor;
use nalgebra::Vector3;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AngularSpringCoeffs {
    stiffness: f64,
    #[serde(default)]
    damping: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AngularDamperCoeffs {
    coeff: f64,
}

/// Isotropic torsional spring returning the body to its reference orientation.
///
/// The restoring moment is `M = −k·θ − c·ω`, where `θ` is the rotation vector of
/// `Q·Q₀ᵀ` and `ω` the global angular velocity.
#[derive(Debug, Clone)]
pub struct SphericalAngularSpring {
    name: String,
    stiffness: f64,
    damping: f64,
}

impl SphericalAngularSpring {
    pub fn new(name: impl Into<String>, stiffness: f64, damping: f64) -> Self {
        Self {
            name: name.into(),
            stiffness,
            damping,
        }
    }

    pub fn construct(spec: &ModelSpec) -> Result<Box<dyn Restraint>, ConfigError> {
        let c: AngularSpringCoeffs = parse_coeffs("restraint", &spec.name, &spec.coeffs)?;
        let key = |k: &str| format!("restraints.{}.{}", spec.name, k);
        Ok(Box::new(Self::new(
            spec.name.clone(),
            require_non_negative(&key("stiffness"), c.stiffness)?,
            require_non_negative(&key("damping"), c.damping)?,
        )))
    }
}

impl Restraint for SphericalAngularSpring {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        "spherical-angular-spring"
    }

    fn restrain(&self, body: &BodyKinematics<'_>) -> Restraining {
        let theta = tensor::rotation_vector(&body.rotation_from_reference());
        Restraining {
            force: Vector3::zeros(),
            moment: -self.stiffness * theta - self.damping * body.omega(),
        }
    }
}

/// Rotational damper, `M = −c·ω`.
#[derive(Debug, Clone)]
pub struct SphericalAngularDamper {
    name: String,
    coeff: f64,
}

impl SphericalAngularDamper {
    pub fn new(name: impl Into<String>, coeff: f64) -> Self {
        Self {
            name: name.into(),
            coeff,
        }
    }

    pub fn construct(spec: &ModelSpec) -> Result<Box<dyn Restraint>, ConfigError> {
        let c: AngularDamperCoeffs = parse_coeffs("restraint", &spec.name, &spec.coeffs)?;
        let coeff = require_non_negative(&format!("restraints.{}.coeff", spec.name), c.coeff)?;
        Ok(Box::new(Self::new(spec.name.clone(), coeff)))
    }
}

impl Restraint for SphericalAngularDamper {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        "spherical-angular-damper"
    }

    fn restrain(&self, body: &BodyKinematics<'_>) -> Restraining {
        Restraining {
            force: Vector3::zeros(),
            moment: -self.coeff * body.omega(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frame::ReferenceFrame;
    use crate::core::state::MotionState;
    use crate::core::tensor::rotation_y;
    use nalgebra::{Matrix3, Point3};

    #[test]
    fn angular_spring_restores_towards_reference_orientation() {
        let spring = SphericalAngularSpring::new("torsion", 5.0, 0.0);
        let reference = ReferenceFrame::new(Point3::origin(), Point3::origin(), Matrix3::identity());
        let state = MotionState::at_rest(Point3::origin(), rotation_y(0.2));
        let inertia = Vector3::new(1.0, 1.0, 1.0);

        let r = spring.restrain(&BodyKinematics::new(&reference, &state, &inertia));
        assert_eq!(r.force, Vector3::zeros());
        assert!((r.moment - Vector3::new(0.0, -1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn angular_damper_opposes_global_angular_velocity() {
        let damper = SphericalAngularDamper::new("drag", 2.0);
        let reference = ReferenceFrame::new(Point3::origin(), Point3::origin(), Matrix3::identity());
        let mut state = MotionState::default();
        state.set_pi(Vector3::new(0.0, 0.0, 3.0));
        let inertia = Vector3::new(1.0, 1.0, 1.5);

        let r = damper.restrain(&BodyKinematics::new(&reference, &state, &inertia));
        assert!((r.moment - Vector3::new(0.0, 0.0, -4.0)).norm() < 1e-12);
    }
}
