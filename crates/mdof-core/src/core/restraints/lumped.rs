use super::{Restraining, Restraint};
use crate::core::frame::BodyKinematics;
use crate::core::io::config::{ConfigError, ModelSpec, parse_coeffs, require_non_negative};
use crate::core::tensor;
use nalgebra::Vector3;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LumpedCoeffs {
    stiffness: [f64; 6],
    #[serde(default)]
    damping: [f64; 6],
}

/// Diagonal stiffness and damping matrices of a lumped-mass structural model.
///
/// The six degrees of freedom are the three global displacements of the centre of
/// rotation from its reference position followed by the three components of the
/// rotation vector of `Q·Q₀ᵀ`. Each degree of freedom is restored independently:
/// `F_i = −k_i·Δx_i − c_i·v_i` and `M_i = −k_{3+i}·θ_i − c_{3+i}·ω_i`.
#[derive(Debug, Clone)]
pub struct LumpedStiffness {
    name: String,
    translational_stiffness: Vector3<f64>,
    torsional_stiffness: Vector3<f64>,
    translational_damping: Vector3<f64>,
    torsional_damping: Vector3<f64>,
}

impl LumpedStiffness {
    pub fn new(name: impl Into<String>, stiffness: [f64; 6], damping: [f64; 6]) -> Self {
        Self {
            name: name.into(),
            translational_stiffness: Vector3::new(stiffness[0], stiffness[1], stiffness[2]),
            torsional_stiffness: Vector3::new(stiffness[3], stiffness[4], stiffness[5]),
            translational_damping: Vector3::new(damping[0], damping[1], damping[2]),
            torsional_damping: Vector3::new(damping[3], damping[4], damping[5]),
        }
    }

    pub fn construct(spec: &ModelSpec) -> Result<Box<dyn Restraint>, ConfigError> {
        let c: LumpedCoeffs = parse_coeffs("restraint", &spec.name, &spec.coeffs)?;
        for (i, k) in c.stiffness.iter().enumerate() {
            require_non_negative(&format!("restraints.{}.stiffness[{}]", spec.name, i), *k)?;
        }
        for (i, d) in c.damping.iter().enumerate() {
            require_non_negative(&format!("restraints.{}.damping[{}]", spec.name, i), *d)?;
        }
        Ok(Box::new(Self::new(spec.name.clone(), c.stiffness, c.damping)))
    }
}

impl Restraint for LumpedStiffness {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        "lumped"
    }

    fn restrain(&self, body: &BodyKinematics<'_>) -> Restraining {
        let state = body.state();
        let dx = state.centre_of_rotation() - body.reference().centre_of_rotation();
        let theta = tensor::rotation_vector(&body.rotation_from_reference());

        let force = -self.translational_stiffness.component_mul(&dx)
            - self.translational_damping.component_mul(state.v());
        let moment = -self.torsional_stiffness.component_mul(&theta)
            - self.torsional_damping.component_mul(&body.omega());

        Restraining { force, moment }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::spec;
    use super::*;
    use crate::core::frame::ReferenceFrame;
    use crate::core::state::MotionState;
    use crate::core::tensor::rotation_x;
    use nalgebra::{Matrix3, Point3};

    #[test]
    fn each_degree_of_freedom_is_restored_independently() {
        let lumped = LumpedStiffness::new(
            "storey",
            [10.0, 20.0, 30.0, 1.0, 2.0, 3.0],
            [0.5, 0.0, 0.0, 0.0, 0.0, 0.0],
        );
        let reference = ReferenceFrame::new(
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 1.0),
            Matrix3::identity(),
        );
        let mut state = MotionState::at_rest(Point3::new(0.1, -0.1, 1.0), rotation_x(0.05));
        state.set_v(Vector3::new(2.0, 0.0, 0.0));
        let inertia = Vector3::new(1.0, 1.0, 1.0);

        let r = lumped.restrain(&BodyKinematics::new(&reference, &state, &inertia));
        assert!((r.force - Vector3::new(-1.0 - 1.0, 2.0, 0.0)).norm() < 1e-12);
        assert!((r.moment - Vector3::new(-0.05, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn damping_defaults_to_zero() {
        let restraint = LumpedStiffness::construct(&spec(
            "storey",
            "lumped",
            "stiffness = [1.0, 1.0, 1.0, 0.0, 0.0, 0.0]",
        ))
        .unwrap();
        assert_eq!(restraint.type_name(), "lumped");
    }

    #[test]
    fn wrong_number_of_entries_is_malformed() {
        let result = LumpedStiffness::construct(&spec("storey", "lumped", "stiffness = [1.0, 1.0]"));
        assert!(matches!(result, Err(ConfigError::Malformed { .. })));
    }
}
