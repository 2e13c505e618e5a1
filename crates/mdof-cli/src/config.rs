use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use mdof::engine::state_log::AngleFormat;
use mdof::workflows::coupling::{ConstantLoad, CouplingSchedule, CouplingScheduleBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialScheduleConfig {
    delta_t: Option<f64>,
    steps: Option<u64>,
    sub_iterations: Option<u32>,
    start_time: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialOutputConfig {
    state: Option<PathBuf>,
    state_log: Option<PathBuf>,
    angle_format: Option<AngleFormat>,
}

/// The run configuration file; every value can also come from the command line.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRunConfig {
    schedule: Option<PartialScheduleConfig>,
    load: Option<ConstantLoad>,
    output: Option<PartialOutputConfig>,
}

/// A fully resolved run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPlan {
    pub schedule: CouplingSchedule,
    pub load: ConstantLoad,
    pub output: Option<PathBuf>,
    pub state_log: Option<PathBuf>,
    pub angle_format: AngleFormat,
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading run configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(self, args: &RunArgs) -> Result<RunPlan> {
        let schedule_config = self.schedule.unwrap_or_default();
        let output_config = self.output.unwrap_or_default();

        let delta_t = args.delta_t.or(schedule_config.delta_t).ok_or_else(|| {
            CliError::Config(
                "A value for 'delta-t' is required either in the run configuration or via --delta-t."
                    .to_string(),
            )
        })?;
        let steps = args.steps.or(schedule_config.steps).ok_or_else(|| {
            CliError::Config(
                "A value for 'steps' is required either in the run configuration or via --steps."
                    .to_string(),
            )
        })?;

        let mut builder = CouplingScheduleBuilder::new().delta_t(delta_t).steps(steps);
        if let Some(n) = args.sub_iterations.or(schedule_config.sub_iterations) {
            builder = builder.sub_iterations(n);
        }
        if let Some(t) = args.start_time.or(schedule_config.start_time) {
            builder = builder.start_time(t);
        }
        let schedule = builder.build()?;

        let load = match &args.load {
            Some(path) => ConstantLoad::load(path)?,
            None => self.load.unwrap_or_default(),
        };

        Ok(RunPlan {
            schedule,
            load,
            output: args.output.clone().or(output_config.state),
            state_log: args.state_log.clone().or(output_config.state_log),
            angle_format: args
                .angle_format
                .or(output_config.angle_format)
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    const RUN_CONFIG: &str = r#"
[schedule]
delta-t = 0.01
steps = 100
sub-iterations = 3

[load]
gravity = [0.0, 0.0, -9.81]

[output]
state = "final.toml"
angle-format = "degrees"
"#;

    fn run_args(extra: &[&str]) -> RunArgs {
        let mut argv = vec!["mdof", "run", "-c", "body.toml"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Run(args) => args,
            other => panic!("expected 'run', got {other:?}"),
        }
    }

    #[test]
    fn file_values_fill_the_plan() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(&path, RUN_CONFIG).unwrap();

        let plan = PartialRunConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&run_args(&[]))
            .unwrap();

        assert_eq!(plan.schedule.delta_t, 0.01);
        assert_eq!(plan.schedule.steps, 100);
        assert_eq!(plan.schedule.sub_iterations, 3);
        assert_eq!(plan.schedule.start_time, 0.0);
        assert_eq!(plan.load.gravity, [0.0, 0.0, -9.81]);
        assert_eq!(plan.output, Some(PathBuf::from("final.toml")));
        assert_eq!(plan.state_log, None);
        assert_eq!(plan.angle_format, AngleFormat::Degrees);
    }

    #[test]
    fn cli_arguments_override_file_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(&path, RUN_CONFIG).unwrap();
        let load_path = dir.path().join("load.toml");
        fs::write(&load_path, "force = [1.0, 0.0, 0.0]\n").unwrap();

        let args = run_args(&[
            "--delta-t",
            "0.05",
            "-k",
            "1",
            "--angle-format",
            "radians",
            "--state-log",
            "log.csv",
            "-l",
            load_path.to_str().unwrap(),
        ]);
        let plan = PartialRunConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(plan.schedule.delta_t, 0.05);
        assert_eq!(plan.schedule.steps, 100);
        assert_eq!(plan.schedule.sub_iterations, 1);
        assert_eq!(plan.load.force, [1.0, 0.0, 0.0]);
        assert_eq!(plan.load.gravity, [0.0; 3]);
        assert_eq!(plan.state_log, Some(PathBuf::from("log.csv")));
        assert_eq!(plan.angle_format, AngleFormat::Radians);
    }

    #[test]
    fn missing_schedule_values_are_reported() {
        let result = PartialRunConfig::default().merge_with_cli(&run_args(&["-n", "10"]));
        match result {
            Err(CliError::Config(msg)) => assert!(msg.contains("delta-t")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn invalid_schedule_values_are_rejected() {
        let result = PartialRunConfig::default()
            .merge_with_cli(&run_args(&["--delta-t", "0.1", "-n", "10", "-k", "0"]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn unknown_keys_are_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(&path, "[schedule]\ndeltaT = 0.1\n").unwrap();
        assert!(matches!(
            PartialRunConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }
}
