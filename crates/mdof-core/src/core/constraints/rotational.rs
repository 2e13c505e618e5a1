use super::{Constraint, PointConstraint, unit_direction};
use crate::core::io::config::{ConfigError, ModelSpec, parse_coeffs};
use nalgebra::Vector3;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AxisCoeffs {
    axis: [f64; 3],
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoCoeffs {}

/// Allows rotation only about a single body-frame axis.
#[derive(Debug, Clone)]
pub struct AxisConstraint {
    name: String,
    axis: Vector3<f64>,
}

impl AxisConstraint {
    pub fn construct(spec: &ModelSpec) -> Result<Box<dyn Constraint>, ConfigError> {
        let c: AxisCoeffs = parse_coeffs("constraint", &spec.name, &spec.coeffs)?;
        Ok(Box::new(Self {
            name: spec.name.clone(),
            axis: unit_direction(format!("constraints.{}.axis", spec.name), c.axis)?,
        }))
    }
}

impl Constraint for AxisConstraint {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        "axis"
    }

    fn constrain_rotation(&self, pc: &mut PointConstraint) {
        pc.combine(&PointConstraint::line(self.axis));
    }
}

/// Locks rotation entirely.
#[derive(Debug, Clone)]
pub struct OrientationLock {
    name: String,
}

impl OrientationLock {
    pub fn construct(spec: &ModelSpec) -> Result<Box<dyn Constraint>, ConfigError> {
        let _: NoCoeffs = parse_coeffs("constraint", &spec.name, &spec.coeffs)?;
        Ok(Box::new(Self {
            name: spec.name.clone(),
        }))
    }
}

impl Constraint for OrientationLock {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        "orientation"
    }

    fn constrain_rotation(&self, pc: &mut PointConstraint) {
        pc.combine(&PointConstraint::fixed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::restraints::test_support::spec;

    #[test]
    fn orientation_lock_zeroes_rotation_and_leaves_translation() {
        let lock = OrientationLock::construct(&spec("fixed", "orientation", "")).unwrap();
        let mut t = PointConstraint::free();
        let mut r = PointConstraint::free();
        lock.constrain_translation(&mut t);
        lock.constrain_rotation(&mut r);

        assert_eq!(t, PointConstraint::free());
        assert_eq!(r.locked(), 3);
    }

    #[test]
    fn orientation_lock_rejects_stray_coefficients() {
        let result = OrientationLock::construct(&spec("fixed", "orientation", "axis = [1.0, 0.0, 0.0]"));
        assert!(matches!(result, Err(ConfigError::Malformed { .. })));
    }
}
