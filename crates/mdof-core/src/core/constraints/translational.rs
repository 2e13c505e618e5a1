use super::{Constraint, PointConstraint, unit_direction};
use crate::core::io::config::{ConfigError, ModelSpec, parse_coeffs};
use nalgebra::Vector3;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlaneCoeffs {
    normal: [f64; 3],
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LineCoeffs {
    direction: [f64; 3],
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoCoeffs {}

/// Confines translation to the plane normal to `normal`.
#[derive(Debug, Clone)]
pub struct PlaneConstraint {
    name: String,
    normal: Vector3<f64>,
}

impl PlaneConstraint {
    pub fn construct(spec: &ModelSpec) -> Result<Box<dyn Constraint>, ConfigError> {
        let c: PlaneCoeffs = parse_coeffs("constraint", &spec.name, &spec.coeffs)?;
        Ok(Box::new(Self {
            name: spec.name.clone(),
            normal: unit_direction(format!("constraints.{}.normal", spec.name), c.normal)?,
        }))
    }
}

impl Constraint for PlaneConstraint {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        "plane"
    }

    fn constrain_translation(&self, pc: &mut PointConstraint) {
        pc.apply_constraint(&self.normal);
    }
}

/// Confines translation to a line.
#[derive(Debug, Clone)]
pub struct LineConstraint {
    name: String,
    direction: Vector3<f64>,
}

impl LineConstraint {
    pub fn construct(spec: &ModelSpec) -> Result<Box<dyn Constraint>, ConfigError> {
        let c: LineCoeffs = parse_coeffs("constraint", &spec.name, &spec.coeffs)?;
        Ok(Box::new(Self {
            name: spec.name.clone(),
            direction: unit_direction(format!("constraints.{}.direction", spec.name), c.direction)?,
        }))
    }
}

impl Constraint for LineConstraint {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        "line"
    }

    fn constrain_translation(&self, pc: &mut PointConstraint) {
        pc.combine(&PointConstraint::line(self.direction));
    }
}

/// Locks translation entirely; the centre of rotation stays put.
#[derive(Debug, Clone)]
pub struct PointLock {
    name: String,
}

impl PointLock {
    pub fn construct(spec: &ModelSpec) -> Result<Box<dyn Constraint>, ConfigError> {
        let _: NoCoeffs = parse_coeffs("constraint", &spec.name, &spec.coeffs)?;
        Ok(Box::new(Self {
            name: spec.name.clone(),
        }))
    }
}

impl Constraint for PointLock {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        "point"
    }

    fn constrain_translation(&self, pc: &mut PointConstraint) {
        pc.combine(&PointConstraint::fixed());
    }
}
