use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
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

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Unknown {kind} type '{tag}' (expected one of: {expected})")]
    UnknownType {
        kind: &'static str,
        tag: String,
        expected: String,
    },

    #[error("Malformed coefficients for {kind} '{name}': {source}")]
    Malformed {
        kind: &'static str,
        name: String,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// A named, tagged entry selecting one restraint or constraint implementation.
///
/// Everything other than `name` and `type` is kept as a raw table and handed to the
/// constructor registered for the tag.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(flatten)]
    pub coeffs: toml::Table,
}

/// The `[solver]` table: a scheme tag plus its scheme-specific coefficients.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SolverSpec {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(flatten)]
    pub coeffs: toml::Table,
}

/// Constant parameters of a body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MotionConfig {
    pub mass: f64,
    /// Principal moments of inertia (diagonal of the inertia tensor in the body frame).
    pub moment_of_inertia: [f64; 3],
    /// Initial centre of mass; defaults to the initial centre of rotation.
    #[serde(default)]
    pub centre_of_mass: Option<[f64; 3]>,
    #[serde(default = "default_acceleration_relaxation")]
    pub acceleration_relaxation: f64,
    #[serde(default)]
    pub acceleration_damping: f64,
    #[serde(default)]
    pub report: bool,
    pub solver: SolverSpec,
    #[serde(default)]
    pub restraints: Vec<ModelSpec>,
    #[serde(default)]
    pub constraints: Vec<ModelSpec>,
}

fn default_acceleration_relaxation() -> f64 {
    1.0
}

impl MotionConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Deserializes the coefficient table of a tagged entry into a concrete type.
pub(crate) fn parse_coeffs<T>(
    kind: &'static str,
    name: &str,
    coeffs: &toml::Table,
) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    toml::Value::Table(coeffs.clone())
        .try_into()
        .map_err(|source| ConfigError::Malformed {
            kind,
            name: name.to_string(),
            source,
        })
}

pub(crate) fn require_positive(key: &str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::invalid(
            key,
            format!("must be positive and finite, got {}", value),
        ))
    }
}

pub(crate) fn require_non_negative(key: &str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::invalid(
            key,
            format!("must be non-negative and finite, got {}", value),
        ))
    }
}
