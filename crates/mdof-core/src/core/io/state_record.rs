use crate::core::frame::ReferenceFrame;
use crate::core::state::MotionState;
use crate::core::tensor;
use nalgebra::{Matrix3, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },

    #[error("TOML parsing error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write state record: {0}")]
    Write(#[from] std::io::Error),

    #[error("Invalid orientation '{field}': {reason}")]
    InvalidOrientation { field: &'static str, reason: String },
}

/// The serialized form of a body's kinematic state.
///
/// Missing fields describe a body at rest at the origin with identity orientation.
/// The initial centre of rotation and orientation default to the current ones, so a
/// fresh record starts in its own reference configuration while a written-back record
/// keeps the reference configuration of the run that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MotionStateRecord {
    #[serde(default)]
    pub centre_of_rotation: [f64; 3],
    #[serde(default = "identity_rows")]
    pub orientation: [[f64; 3]; 3],
    #[serde(default)]
    pub velocity: [f64; 3],
    #[serde(default)]
    pub acceleration: [f64; 3],
    #[serde(default)]
    pub angular_momentum: [f64; 3],
    #[serde(default)]
    pub torque: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_centre_of_rotation: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_orientation: Option<[[f64; 3]; 3]>,
}

fn identity_rows() -> [[f64; 3]; 3] {
    [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
}

impl Default for MotionStateRecord {
    fn default() -> Self {
        Self {
            centre_of_rotation: [0.0; 3],
            orientation: identity_rows(),
            velocity: [0.0; 3],
            acceleration: [0.0; 3],
            angular_momentum: [0.0; 3],
            torque: [0.0; 3],
            initial_centre_of_rotation: None,
            initial_orientation: None,
        }
    }
}

fn to_matrix(rows: &[[f64; 3]; 3]) -> Matrix3<f64> {
    Matrix3::from_fn(|i, j| rows[i][j])
}

fn to_rows(m: &Matrix3<f64>) -> [[f64; 3]; 3] {
    [
        [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
        [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
        [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
    ]
}

fn checked_rotation(field: &'static str, rows: &[[f64; 3]; 3]) -> Result<Matrix3<f64>, StateLoadError> {
    let m = to_matrix(rows);
    if tensor::orthonormality_error(&m) > 1e-6 {
        return Err(StateLoadError::InvalidOrientation {
            field,
            reason: format!(
                "not orthonormal (|QᵀQ - I| = {:.3e})",
                tensor::orthonormality_error(&m)
            ),
        });
    }
    tensor::correct_drift(&m).ok_or_else(|| StateLoadError::InvalidOrientation {
        field,
        reason: "not a proper rotation (determinant must be +1)".to_string(),
    })
}

impl MotionStateRecord {
    pub fn load(path: &Path) -> Result<Self, StateLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| StateLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| StateLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, StateLoadError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, StateLoadError> {
        Ok(toml::to_string(self)?)
    }

    pub fn write_to(&self, writer: &mut impl Write) -> Result<(), StateLoadError> {
        writer.write_all(self.to_toml_string()?.as_bytes())?;
        Ok(())
    }

    /// Builds the current motion state, re-orthonormalising the orientation.
    pub fn motion_state(&self) -> Result<MotionState, StateLoadError> {
        let q = checked_rotation("orientation", &self.orientation)?;
        Ok(MotionState::new(
            Point3::from(self.centre_of_rotation),
            q,
            Vector3::from(self.velocity),
            Vector3::from(self.acceleration),
            Vector3::from(self.angular_momentum),
            Vector3::from(self.torque),
        ))
    }

    /// The reference centre of rotation and orientation recorded for this state.
    pub fn initial_configuration(&self) -> Result<(Point3<f64>, Matrix3<f64>), StateLoadError> {
        let centre = Point3::from(
            self.initial_centre_of_rotation
                .unwrap_or(self.centre_of_rotation),
        );
        let q = match &self.initial_orientation {
            Some(rows) => checked_rotation("initial-orientation", rows)?,
            None => checked_rotation("orientation", &self.orientation)?,
        };
        Ok((centre, q))
    }

    pub fn from_state(state: &MotionState, reference: &ReferenceFrame) -> Self {
        Self {
            centre_of_rotation: state.centre_of_rotation().coords.into(),
            orientation: to_rows(state.q()),
            velocity: (*state.v()).into(),
            acceleration: (*state.a()).into(),
            angular_momentum: (*state.pi()).into(),
            torque: (*state.tau()).into(),
            initial_centre_of_rotation: Some(reference.centre_of_rotation().coords.into()),
            initial_orientation: Some(to_rows(reference.q())),
        }
    }
}
