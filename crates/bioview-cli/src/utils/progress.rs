use bioview::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

const SPINNER_TICK_MS: u64 = 80;

struct DisplayState {
    bar: ProgressBar,
    phase: &'static str,
    warnings: usize,
}

impl DisplayState {
    fn warning_summary(&self) -> String {
        match self.warnings {
            0 => String::new(),
            1 => "1 warning".to_string(),
            n => format!("{n} warnings"),
        }
    }

    fn finished_message(&self) -> String {
        match self.warnings {
            0 => format!("✓ {} done", self.phase),
            _ => format!("✓ {} done, {}", self.phase, self.warning_summary()),
        }
    }
}

/// Renders import progress on stderr: the phase name as the bar prefix and a
/// running count of recovered line problems as its message.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<DisplayState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// A handler that draws nothing, for `--quiet` runs.
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(Self::spinner_style());
        bar.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(DisplayState {
                bar,
                phase: "",
                warnings: 0,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress display mutex was poisoned; dropping update.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    state.phase = name;
                    state.warnings = 0;
                    let bar = &state.bar;
                    bar.reset();
                    bar.set_length(0);
                    bar.set_style(Self::spinner_style());
                    bar.set_prefix(name);
                    bar.set_message("");
                    bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                }
                Progress::TaskStart { total_steps } => {
                    let bar = &state.bar;
                    bar.disable_steady_tick();
                    bar.reset();
                    bar.set_length(total_steps);
                    bar.set_style(Self::bar_style());
                }
                Progress::TaskIncrement { amount } => state.bar.inc(amount),
                Progress::TaskFinish => {
                    let bar = &state.bar;
                    if let Some(length) = bar.length() {
                        bar.set_position(length);
                    }
                    bar.finish();
                }
                Progress::Warning { line, message } => {
                    debug!(line, %message, "Recovered line problem.");
                    state.warnings += 1;
                    let summary = state.warning_summary();
                    state.bar.set_message(summary);
                }
                Progress::PhaseFinish => {
                    let message = state.finished_message();
                    state.bar.disable_steady_tick();
                    state.bar.finish_with_message(message);
                }
                Progress::Message(text) => {
                    if state.bar.is_finished() {
                        state.bar.set_message(text);
                    } else {
                        state.bar.println(format!("  {}", text));
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {prefix:.bold} {msg:.yellow}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{prefix:<12.bold} [{bar:40.cyan/blue}] {pos}/{len} {percent:>3}% {msg:.yellow}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
