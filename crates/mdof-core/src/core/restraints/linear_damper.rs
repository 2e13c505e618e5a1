use super::{Restraining, Restraint};
use crate::core::frame::BodyKinematics;
use crate::core::io::config::{ConfigError, ModelSpec, parse_coeffs, require_non_negative};
use nalgebra::Vector3;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LinearDamperCoeffs {
    coeff: f64,
}

/// Linear damper acting on the velocity of the centre of rotation, `F = −c·v`.
#[derive(Debug, Clone)]
pub struct LinearDamper {
    name: String,
    coeff: f64,
}

impl LinearDamper {
    pub fn new(name: impl Into<String>, coeff: f64) -> Self {
        Self {
            name: name.into(),
            coeff,
        }
    }

    pub fn construct(spec: &ModelSpec) -> Result<Box<dyn Restraint>, ConfigError> {
        let c: LinearDamperCoeffs = parse_coeffs("restraint", &spec.name, &spec.coeffs)?;
        let coeff = require_non_negative(&format!("restraints.{}.coeff", spec.name), c.coeff)?;
        Ok(Box::new(Self::new(spec.name.clone(), coeff)))
    }
}

impl Restraint for LinearDamper {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        "linear-damper"
    }

    fn restrain(&self, body: &BodyKinematics<'_>) -> Restraining {
        Restraining {
            force: -self.coeff * *body.state().v(),
            moment: Vector3::zeros(),
        }
    }
}
