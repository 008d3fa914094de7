use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement { amount: u64 },
    TaskFinish,

    /// A recoverable input problem, keyed by its 1-based source line.
    Warning { line: usize, message: String },
    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

/// A shared flag polled by long-running work to stop early.
///
/// Clones observe the same flag, so one clone can be handed to a UI thread
/// while another is passed into the parser or connectivity generator.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Default)]
struct FractionState {
    total: u64,
    completed: u64,
    last_reported: f64,
}

/// Adapts task events into a `0.0..=1.0` completion value.
///
/// Within one task the reported value never decreases, even when increments
/// arrive from several threads. A new `TaskStart` resets it to `0.0`. Events
/// other than task events are ignored.
pub fn fraction_callback<'a>(sink: impl Fn(f64) + Send + Sync + 'a) -> ProgressCallback<'a> {
    let state = Mutex::new(FractionState::default());
    Box::new(move |event: Progress| {
        let Ok(mut state) = state.lock() else {
            return;
        };
        let fraction = match event {
            Progress::TaskStart { total_steps } => {
                *state = FractionState {
                    total: total_steps,
                    ..FractionState::default()
                };
                0.0
            }
            Progress::TaskIncrement { amount } => {
                state.completed = state.completed.saturating_add(amount);
                if state.total == 0 {
                    1.0
                } else {
                    (state.completed as f64 / state.total as f64).min(1.0)
                }
            }
            Progress::TaskFinish => 1.0,
            _ => return,
        };
        let fraction = fraction.max(state.last_reported);
        state.last_reported = fraction;
        sink(fraction);
    })
}
