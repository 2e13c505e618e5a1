use super::{Restraining, Restraint};
use crate::core::frame::BodyKinematics;
use crate::core::io::config::{ConfigError, ModelSpec, parse_coeffs, require_non_negative};
use nalgebra::{Point3, Vector3};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct LinearSpringCoeffs {
    anchor: [f64; 3],
    ref_attachment_pt: [f64; 3],
    stiffness: f64,
    #[serde(default)]
    damping: f64,
    #[serde(default)]
    rest_length: f64,
}

/// A linear spring (with optional dashpot) between a fixed anchor and a point on the
/// body.
///
/// The attachment point is given in the reference configuration and moves with the
/// body. The spring acts along the anchor–attachment line: `F = −k(|r| − L)r̂ − c(r̂·v)r̂`.
/// With a zero rest length this is a point restraint pulling the attachment towards
/// the anchor with force `−k·r`.
#[derive(Debug, Clone)]
pub struct LinearSpring {
    name: String,
    anchor: Point3<f64>,
    ref_attachment_pt: Point3<f64>,
    stiffness: f64,
    damping: f64,
    rest_length: f64,
}

impl LinearSpring {
    pub fn new(
        name: impl Into<String>,
        anchor: Point3<f64>,
        ref_attachment_pt: Point3<f64>,
        stiffness: f64,
        damping: f64,
        rest_length: f64,
    ) -> Self {
        Self {
            name: name.into(),
            anchor,
            ref_attachment_pt,
            stiffness,
            damping,
            rest_length,
        }
    }

    pub fn construct(spec: &ModelSpec) -> Result<Box<dyn Restraint>, ConfigError> {
        let c: LinearSpringCoeffs = parse_coeffs("restraint", &spec.name, &spec.coeffs)?;
        let key = |k: &str| format!("restraints.{}.{}", spec.name, k);
        Ok(Box::new(Self::new(
            spec.name.clone(),
            Point3::from(c.anchor),
            Point3::from(c.ref_attachment_pt),
            require_non_negative(&key("stiffness"), c.stiffness)?,
            require_non_negative(&key("damping"), c.damping)?,
            require_non_negative(&key("rest-length"), c.rest_length)?,
        )))
    }
}

impl Restraint for LinearSpring {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        "linear-spring"
    }

    fn restrain(&self, body: &BodyKinematics<'_>) -> Restraining {
        let position = body.transform(&self.ref_attachment_pt);
        let r = position - self.anchor;
        let length = r.norm();
        let direction = if length > f64::EPSILON {
            r / length
        } else {
            Vector3::zeros()
        };
        let v = body.velocity(&position);

        let force = -self.stiffness * (length - self.rest_length) * direction
            - self.damping * direction.dot(&v) * direction;
        let moment = (position - body.state().centre_of_rotation()).cross(&force);

        Restraining { force, moment }
    }
}
