use clap::{Args, Parser, Subcommand};
use mdof::engine::state_log::AngleFormat;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "mdof CLI - Drives a rigid-body motion model through a fixed-step coupling loop.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v for status reports, -vv adds every integrator update, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Explicit per-target log filter, e.g. `mdof=debug,mdof_cli=warn`. Overrides -v/-q.
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Advance a body through a number of time steps under a constant load.
    Run(RunArgs),
    /// Validate a body configuration (and optional state record) without running.
    Check(CheckArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    // --- Body ---
    /// Path to the body configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Path to the initial state record. Defaults to rest at the origin.
    #[arg(short, long, value_name = "PATH")]
    pub state: Option<PathBuf>,

    /// Path to the run configuration file (schedule, load and state log settings).
    #[arg(short, long, value_name = "PATH")]
    pub run_config: Option<PathBuf>,

    // --- Schedule Overrides ---
    /// Override the time-step size.
    #[arg(long, value_name = "FLOAT")]
    pub delta_t: Option<f64>,

    /// Override the number of time steps.
    #[arg(short = 'n', long, value_name = "INT")]
    pub steps: Option<u64>,

    /// Override the number of updates per time step.
    #[arg(short = 'k', long, value_name = "INT")]
    pub sub_iterations: Option<u32>,

    /// Override the start time.
    #[arg(long, value_name = "FLOAT")]
    pub start_time: Option<f64>,

    // --- Load Override ---
    /// Path to a load file (force, torque, gravity), replacing the `[load]` table.
    #[arg(short, long, value_name = "PATH")]
    pub load: Option<PathBuf>,

    // --- Output ---
    /// Path for the final state record.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path for the CSV state log.
    #[arg(long, value_name = "PATH")]
    pub state_log: Option<PathBuf>,

    /// Angle format of the state log ('radians' or 'degrees').
    #[arg(long, value_name = "FORMAT")]
    pub angle_format: Option<AngleFormat>,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the body configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Path to a state record to validate alongside the configuration.
    #[arg(short, long, value_name = "PATH")]
    pub state: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_arguments_parse_with_overrides() {
        let cli = Cli::parse_from([
            "mdof",
            "-vv",
            "run",
            "-c",
            "body.toml",
            "--delta-t",
            "0.01",
            "-n",
            "100",
            "-k",
            "3",
            "--angle-format",
            "degrees",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.config, PathBuf::from("body.toml"));
                assert_eq!(args.delta_t, Some(0.01));
                assert_eq!(args.steps, Some(100));
                assert_eq!(args.sub_iterations, Some(3));
                assert_eq!(args.angle_format, Some(AngleFormat::Degrees));
                assert!(args.state.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_angle_format_is_rejected() {
        let result = Cli::try_parse_from([
            "mdof",
            "run",
            "-c",
            "body.toml",
            "--angle-format",
            "gradians",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn log_filter_is_a_global_option() {
        let cli = Cli::parse_from(["mdof", "check", "-c", "body.toml", "--log-filter", "mdof=debug"]);
        assert_eq!(cli.log_filter.as_deref(), Some("mdof=debug"));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["mdof", "-q", "-v", "check", "-c", "body.toml"]);
        assert!(result.is_err());
    }
}
