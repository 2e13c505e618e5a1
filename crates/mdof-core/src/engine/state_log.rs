use super::error::MotionError;
use super::motion::SystemMotion;
use crate::core::io::config::ConfigError;
use crate::core::tensor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleFormat {
    #[default]
    Radians,
    Degrees,
}

impl AngleFormat {
    pub fn convert(self, radians: f64) -> f64 {
        match self {
            AngleFormat::Radians => radians,
            AngleFormat::Degrees => radians.to_degrees(),
        }
    }
}

impl fmt::Display for AngleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AngleFormat::Radians => write!(f, "radians"),
            AngleFormat::Degrees => write!(f, "degrees"),
        }
    }
}

impl FromStr for AngleFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "radians" => Ok(AngleFormat::Radians),
            "degrees" => Ok(AngleFormat::Degrees),
            other => Err(ConfigError::invalid(
                "angle-format",
                format!("expected 'radians' or 'degrees', got '{}'", other),
            )),
        }
    }
}

/// One row of the state log. Orientation angles are the roll, pitch and yaw of the
/// current orientation tensor; the angular velocity is global.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateRow {
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
    pub wx: f64,
    pub wy: f64,
    pub wz: f64,
}

impl StateRow {
    pub fn sample(time: f64, motion: &SystemMotion, angle_format: AngleFormat) -> Self {
        let centre = motion.centre_of_rotation();
        let (roll, pitch, yaw) = tensor::euler_angles(motion.orientation());
        let v = motion.v();
        let omega = motion.omega();
        Self {
            time,
            x: centre.x,
            y: centre.y,
            z: centre.z,
            roll: angle_format.convert(roll),
            pitch: angle_format.convert(pitch),
            yaw: angle_format.convert(yaw),
            vx: v.x,
            vy: v.y,
            vz: v.z,
            wx: omega.x,
            wy: omega.y,
            wz: omega.z,
        }
    }
}

/// CSV time history of a body's motion; the header row is written with the first row.
pub struct StateLog<W: Write> {
    writer: csv::Writer<W>,
    angle_format: AngleFormat,
}

impl StateLog<File> {
    pub fn create(path: &Path, angle_format: AngleFormat) -> Result<Self, MotionError> {
        let writer = csv::Writer::from_path(path).map_err(|e| MotionError::LogFile {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Ok(Self {
            writer,
            angle_format,
        })
    }
}

impl<W: Write> StateLog<W> {
    pub fn from_writer(writer: W, angle_format: AngleFormat) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
            angle_format,
        }
    }

    pub fn angle_format(&self) -> AngleFormat {
        self.angle_format
    }

    pub fn write_row(&mut self, time: f64, motion: &SystemMotion) -> Result<(), MotionError> {
        let row = StateRow::sample(time, motion, self.angle_format);
        self.writer.serialize(row)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), MotionError> {
        self.writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, MotionError> {
        self.writer
            .into_inner()
            .map_err(|e| MotionError::from(csv::Error::from(e.into_error())))
    }
}
