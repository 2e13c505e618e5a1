use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    fmt,
    prelude::*,
};

/// Target of events emitted by the motion library.
const CORE_TARGET: &str = "mdof";
/// Target of events emitted by this binary.
const CLI_TARGET: &str = "mdof_cli";

/// Maps the `-v`/`-q` flags to per-crate levels.
///
/// The integrator logs one `debug` event per `update()`, which floods the console on
/// long runs. A single `-v` therefore only shows `info` status reports from both
/// crates; `-vv` opens the library up to `debug` while the CLI stays at `info`.
pub fn verbosity_filter(verbosity: u8, quiet: bool) -> Targets {
    let (cli, core) = if quiet {
        (LevelFilter::ERROR, LevelFilter::ERROR)
    } else {
        match verbosity {
            0 => (LevelFilter::WARN, LevelFilter::WARN),
            1 => (LevelFilter::INFO, LevelFilter::INFO),
            2 => (LevelFilter::INFO, LevelFilter::DEBUG),
            _ => (LevelFilter::TRACE, LevelFilter::TRACE),
        }
    };
    Targets::new()
        .with_default(cli)
        .with_target(CORE_TARGET, core)
        .with_target(CLI_TARGET, cli)
}

pub fn parse_filter(directives: &str) -> Result<Targets> {
    directives
        .parse()
        .map_err(|e| CliError::Config(format!("invalid log filter '{}': {}", directives, e)))
}

pub fn setup_logging(
    verbosity: u8,
    quiet: bool,
    log_filter: Option<&str>,
    log_file: Option<PathBuf>,
) -> Result<()> {
    let filter = match log_filter {
        Some(directives) => parse_filter(directives)?,
        None => verbosity_filter(verbosity, quiet),
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(filter.clone());

    // The file keeps targets so library and CLI events can be told apart afterwards.
    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(&path)?;
            Some(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true)
                    .with_filter(filter),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(())
}
