use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use mdof::engine::progress::{Progress, ProgressCallback};

const TEMPLATE: &str = "{spinner} t = {msg:<10} [{bar:40.cyan/blue}] step {pos}/{len} ({per_sec}, {eta})";

/// Renders coupling-loop progress as a step bar labelled with the simulated time.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: ProgressBar,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target);
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = self.bar.clone();
        Box::new(move |progress| apply(&bar, progress))
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn apply(bar: &ProgressBar, progress: Progress) {
    match progress {
        Progress::RunStart { total_steps } => {
            bar.reset();
            bar.set_length(total_steps);
            bar.set_message(format_time(0.0));
        }
        Progress::StepFinish { step, time } => {
            bar.set_position(step);
            bar.set_message(format_time(time));
        }
        Progress::RunFinish => {
            if let Some(len) = bar.length() {
                bar.set_position(len);
            }
            bar.finish();
        }
        Progress::Message(msg) => bar.println(format!("  {}", msg)),
    }
}

fn format_time(time: f64) -> String {
    format!("{:.4}", time)
}
