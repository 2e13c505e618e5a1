use crate::cli::RunArgs;
use crate::config::{PartialRunConfig, RunPlan};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use mdof::engine::motion::SystemMotion;
use mdof::engine::progress::ProgressReporter;
use mdof::engine::state_log::StateLog;
use mdof::workflows::coupling::{self, CouplingSummary, StepObserver};
use std::fs::File;
use tracing::info;

pub fn run(args: RunArgs) -> Result<()> {
    let partial_config = match &args.run_config {
        Some(path) => PartialRunConfig::from_file(path)?,
        None => PartialRunConfig::default(),
    };
    info!("Merging run configuration from file and CLI arguments...");
    let plan = partial_config.merge_with_cli(&args)?;

    info!("Loading body configuration from {:?}", &args.config);
    let mut motion = SystemMotion::from_files(&args.config, args.state.as_deref())?;

    let summary = execute(&mut motion, &plan)?;

    println!(
        "Run complete: {} step(s), {} update(s), t = {}.",
        summary.steps, summary.updates, summary.end_time
    );
    let c = motion.centre_of_rotation();
    println!("Centre of rotation: ({}, {}, {})", c.x, c.y, c.z);

    if let Some(path) = &plan.output {
        info!("Writing final state record to {:?}", path);
        motion.write_to(&mut File::create(path)?)?;
        println!("✓ Final state written to: {}", path.display());
    }
    Ok(())
}

/// Runs the coupling loop for a resolved plan, streaming the state log if requested.
pub fn execute(motion: &mut SystemMotion, plan: &RunPlan) -> Result<CouplingSummary> {
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let mut state_log = match &plan.state_log {
        Some(path) => {
            info!("Writing state log to {:?} ({})", path, plan.angle_format);
            Some(StateLog::create(path, plan.angle_format)?)
        }
        None => None,
    };

    let summary = coupling::run(
        motion,
        &plan.schedule,
        &plan.load,
        state_log.as_mut().map(|log| log as &mut dyn StepObserver),
        &reporter,
    )?;

    if let Some(log) = state_log.as_mut() {
        log.flush()?;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdof::core::io::state_record::MotionStateRecord;
    use mdof::engine::state_log::AngleFormat;
    use mdof::workflows::coupling::{ConstantLoad, CouplingScheduleBuilder};
    use std::fs;
    use tempfile::tempdir;

    const BODY: &str = r#"
mass = 10.0
moment-of-inertia = [1.0, 1.0, 1.0]
[solver]
type = "crank-nicolson"
"#;

    #[test]
    fn execute_runs_the_plan_and_writes_the_log() {
        let dir = tempdir().unwrap();
        let body_path = dir.path().join("body.toml");
        fs::write(&body_path, BODY).unwrap();
        let log_path = dir.path().join("history.csv");

        let mut motion = SystemMotion::from_files(&body_path, None).unwrap();
        let plan = RunPlan {
            schedule: CouplingScheduleBuilder::new()
                .delta_t(0.01)
                .steps(10)
                .sub_iterations(2)
                .build()
                .unwrap(),
            load: ConstantLoad {
                gravity: [0.0, 0.0, -9.81],
                ..Default::default()
            },
            output: None,
            state_log: Some(log_path.clone()),
            angle_format: AngleFormat::Degrees,
        };

        let summary = execute(&mut motion, &plan).unwrap();
        assert_eq!(summary.updates, 20);
        assert!(motion.v().z < 0.0);

        let log = fs::read_to_string(&log_path).unwrap();
        assert_eq!(log.lines().count(), 12);
    }

    #[test]
    fn run_writes_a_restartable_state_record() {
        let dir = tempdir().unwrap();
        let body_path = dir.path().join("body.toml");
        fs::write(&body_path, BODY).unwrap();
        let run_path = dir.path().join("run.toml");
        fs::write(
            &run_path,
            "[schedule]\ndelta-t = 0.01\nsteps = 5\n[load]\nforce = [0.0, 0.0, -98.1]\n",
        )
        .unwrap();
        let out_path = dir.path().join("final.toml");

        let args = RunArgs {
            config: body_path.clone(),
            state: None,
            run_config: Some(run_path),
            delta_t: None,
            steps: None,
            sub_iterations: None,
            start_time: None,
            load: None,
            output: Some(out_path.clone()),
            state_log: None,
            angle_format: None,
        };
        run(args).unwrap();

        let record = MotionStateRecord::load(&out_path).unwrap();
        assert!(record.velocity[2] < 0.0);
        let restarted = SystemMotion::from_files(&body_path, Some(&out_path)).unwrap();
        assert_eq!(restarted.v().z, record.velocity[2]);
    }
}
