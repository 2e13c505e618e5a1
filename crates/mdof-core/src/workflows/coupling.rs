use crate::core::io::config::{ConfigError, require_positive};
use crate::core::state::MotionState;
use crate::engine::dynamics::Load;
use crate::engine::error::MotionError;
use crate::engine::motion::SystemMotion;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state_log::StateLog;
use nalgebra::Vector3;
use serde::Deserialize;
use std::io::Write;
use std::path::Path;
use tracing::{info, instrument};

/// Time stepping of a coupling run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CouplingSchedule {
    pub delta_t: f64,
    pub steps: u64,
    /// Updates per time step: one predictor followed by `sub_iterations - 1` correctors.
    pub sub_iterations: u32,
    pub start_time: f64,
}

#[derive(Default)]
pub struct CouplingScheduleBuilder {
    delta_t: Option<f64>,
    steps: Option<u64>,
    sub_iterations: Option<u32>,
    start_time: Option<f64>,
}

impl CouplingScheduleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delta_t(mut self, delta_t: f64) -> Self {
        self.delta_t = Some(delta_t);
        self
    }
    pub fn steps(mut self, steps: u64) -> Self {
        self.steps = Some(steps);
        self
    }
    pub fn sub_iterations(mut self, n: u32) -> Self {
        self.sub_iterations = Some(n);
        self
    }
    pub fn start_time(mut self, time: f64) -> Self {
        self.start_time = Some(time);
        self
    }

    pub fn build(self) -> Result<CouplingSchedule, ConfigError> {
        let delta_t = self
            .delta_t
            .ok_or_else(|| ConfigError::invalid("delta-t", "is required"))?;
        let steps = self
            .steps
            .ok_or_else(|| ConfigError::invalid("steps", "is required"))?;
        let sub_iterations = self.sub_iterations.unwrap_or(1);
        if sub_iterations == 0 {
            return Err(ConfigError::invalid("sub-iterations", "must be at least 1"));
        }
        let start_time = self.start_time.unwrap_or(0.0);
        if !start_time.is_finite() {
            return Err(ConfigError::invalid("start-time", "must be finite"));
        }

        Ok(CouplingSchedule {
            delta_t: require_positive("delta-t", delta_t)?,
            steps,
            sub_iterations,
            start_time,
        })
    }
}

/// Supplies the global force and torque acting on the body before each update.
pub trait LoadModel {
    fn sample(&self, time: f64, motion: &SystemMotion) -> Load;
}

/// A time-invariant load plus the weight of the body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConstantLoad {
    #[serde(default)]
    pub force: [f64; 3],
    #[serde(default)]
    pub torque: [f64; 3],
    #[serde(default)]
    pub gravity: [f64; 3],
}

impl ConstantLoad {
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
}

impl LoadModel for ConstantLoad {
    fn sample(&self, _time: f64, motion: &SystemMotion) -> Load {
        let weight = motion.mass() * Vector3::from(self.gravity);
        Load::new(Vector3::from(self.force) + weight, Vector3::from(self.torque))
    }
}

/// Called once with the initial state (step 0) and after the last update of each
/// time step.
pub trait StepObserver {
    fn observe(&mut self, step: u64, time: f64, motion: &SystemMotion) -> Result<(), MotionError>;
}

impl<W: Write> StepObserver for StateLog<W> {
    fn observe(&mut self, _step: u64, time: f64, motion: &SystemMotion) -> Result<(), MotionError> {
        self.write_row(time, motion)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CouplingSummary {
    pub steps: u64,
    pub updates: u64,
    pub end_time: f64,
    pub final_state: MotionState,
}

#[instrument(skip_all, name = "coupling_workflow", fields(steps = schedule.steps, delta_t = schedule.delta_t))]
pub fn run(
    motion: &mut SystemMotion,
    schedule: &CouplingSchedule,
    loads: &dyn LoadModel,
    mut observer: Option<&mut dyn StepObserver>,
    reporter: &ProgressReporter,
) -> Result<CouplingSummary, MotionError> {
    info!(
        solver = motion.solver_name(),
        sub_iterations = schedule.sub_iterations,
        "Starting coupling run."
    );
    reporter.report(Progress::RunStart {
        total_steps: schedule.steps,
    });

    let mut time = schedule.start_time;
    if let Some(obs) = observer.as_deref_mut() {
        obs.observe(0, time, motion)?;
    }

    let delta_t = schedule.delta_t;
    let mut updates = 0;
    for step in 1..=schedule.steps {
        motion.new_time();
        time = schedule.start_time + step as f64 * delta_t;

        for iteration in 0..schedule.sub_iterations {
            let load = loads.sample(time, motion);
            motion.update(iteration == 0, load.force, load.torque, delta_t, delta_t)?;
            updates += 1;
        }

        motion.status();
        if let Some(obs) = observer.as_deref_mut() {
            obs.observe(step, time, motion)?;
        }
        reporter.report(Progress::StepFinish { step, time });
    }

    reporter.report(Progress::RunFinish);
    info!(
        updates,
        end_time = time,
        "Coupling run complete."
    );

    Ok(CouplingSummary {
        steps: schedule.steps,
        updates,
        end_time: time,
        final_state: *motion.state(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::config::MotionConfig;
    use crate::core::io::state_record::MotionStateRecord;
    use crate::engine::state_log::AngleFormat;
    use std::sync::Mutex;

    fn falling_body() -> SystemMotion {
        let config = MotionConfig::from_toml_str(
            "mass = 10.0\nmoment-of-inertia = [1.0, 1.0, 1.0]\n[solver]\ntype = \"newmark\"",
        )
        .unwrap();
        SystemMotion::new(&config, &MotionStateRecord::default()).unwrap()
    }

    struct Recorder(Vec<(u64, f64)>);

    impl StepObserver for Recorder {
        fn observe(&mut self, step: u64, time: f64, _motion: &SystemMotion) -> Result<(), MotionError> {
            self.0.push((step, time));
            Ok(())
        }
    }

    #[test]
    fn builder_requires_step_size_and_count() {
        assert!(CouplingScheduleBuilder::new().steps(10).build().is_err());
        assert!(CouplingScheduleBuilder::new().delta_t(0.1).build().is_err());
        assert!(
            CouplingScheduleBuilder::new()
                .delta_t(-0.1)
                .steps(10)
                .build()
                .is_err()
        );
        assert!(
            CouplingScheduleBuilder::new()
                .delta_t(0.1)
                .steps(10)
                .sub_iterations(0)
                .build()
                .is_err()
        );

        let schedule = CouplingScheduleBuilder::new()
            .delta_t(0.1)
            .steps(10)
            .build()
            .unwrap();
        assert_eq!(schedule.sub_iterations, 1);
        assert_eq!(schedule.start_time, 0.0);
    }

    #[test]
    fn constant_load_adds_body_weight() {
        let motion = falling_body();
        let load = ConstantLoad {
            force: [1.0, 0.0, 0.0],
            torque: [0.0, 2.0, 0.0],
            gravity: [0.0, 0.0, -9.81],
        }
        .sample(0.0, &motion);
        assert!((load.force - Vector3::new(1.0, 0.0, -98.1)).norm() < 1e-12);
        assert_eq!(load.torque, Vector3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn constant_load_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("load.toml");
        std::fs::write(&path, "gravity = [0.0, 0.0, -9.81]\n").unwrap();
        let load = ConstantLoad::load(&path).unwrap();
        assert_eq!(load.gravity, [0.0, 0.0, -9.81]);
        assert_eq!(load.force, [0.0; 3]);
    }

    #[test]
    fn run_counts_updates_and_notifies_observer_and_reporter() {
        let mut motion = falling_body();
        let schedule = CouplingScheduleBuilder::new()
            .delta_t(0.01)
            .steps(5)
            .sub_iterations(3)
            .start_time(1.0)
            .build()
            .unwrap();
        let mut recorder = Recorder(Vec::new());
        let finished = Mutex::new(0u64);
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::StepFinish { .. } = event {
                *finished.lock().unwrap() += 1;
            }
        }));

        let summary = run(
            &mut motion,
            &schedule,
            &ConstantLoad::default(),
            Some(&mut recorder),
            &reporter,
        )
        .unwrap();
        drop(reporter);

        assert_eq!(summary.steps, 5);
        assert_eq!(summary.updates, 15);
        assert!((summary.end_time - 1.05).abs() < 1e-12);
        assert_eq!(recorder.0.len(), 6);
        assert_eq!(recorder.0[0], (0, 1.0));
        assert_eq!(*finished.lock().unwrap(), 5);
        assert_eq!(summary.final_state, MotionState::default());
    }

    #[test]
    fn run_streams_rows_into_a_state_log() {
        let mut motion = falling_body();
        let schedule = CouplingScheduleBuilder::new()
            .delta_t(0.1)
            .steps(3)
            .build()
            .unwrap();
        let mut log = StateLog::from_writer(Vec::new(), AngleFormat::Radians);
        let load = ConstantLoad {
            gravity: [0.0, 0.0, -9.81],
            ..Default::default()
        };

        run(
            &mut motion,
            &schedule,
            &load,
            Some(&mut log),
            &ProgressReporter::new(),
        )
        .unwrap();

        let text = String::from_utf8(log.into_inner().unwrap()).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(motion.v().z < 0.0);
    }
}
