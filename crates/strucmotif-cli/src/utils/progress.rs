use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;
use strucmotif::engine::progress::{Progress, ProgressCallback};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Renders search progress on stderr.
///
/// Every phase opens as a spinner labelled with the phase name. A task inside the phase turns
/// the spinner into a bar that counts query edges during assembly and structures during scoring.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: ProgressBar,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(spinner_style());
        bar.finish_and_clear();
        Self { bar }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = self.bar.clone();
        Box::new(move |event: Progress| apply(&bar, event))
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn apply(bar: &ProgressBar, event: Progress) {
    match event {
        Progress::PhaseStart { name } => {
            bar.reset();
            bar.set_length(0);
            bar.set_style(spinner_style());
            bar.set_prefix(name);
            bar.set_message("");
            bar.enable_steady_tick(TICK_INTERVAL);
        }
        Progress::TaskStart { total_steps } => {
            bar.disable_steady_tick();
            bar.set_style(bar_style());
            bar.set_length(total_steps);
            bar.set_position(0);
        }
        Progress::TaskIncrement => bar.inc(1),
        Progress::TaskFinish => {
            if let Some(len) = bar.length() {
                bar.set_position(len);
            }
        }
        Progress::PhaseFinish => {
            bar.disable_steady_tick();
            bar.finish_with_message("done");
        }
        Progress::Message(msg) => bar.set_message(msg),
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {prefix:.bold} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix:.bold:<11} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed}) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}
