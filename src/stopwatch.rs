use std::time::{Duration, Instant};

/// Current phase of the stopwatch.
///
/// The start instant only exists while running, so an idle stopwatch can
/// never carry a stale start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopwatchState {
    #[default]
    Idle,
    Running { start: Instant },
}

/// Outcome of a single [`Stopwatch::toggle_at`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Started,
    Stopped { elapsed: Duration, record: String },
}

#[derive(Debug, Default)]
pub struct Stopwatch {
    state: StopwatchState,
    history: Vec<String>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> StopwatchState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, StopwatchState::Running { .. })
    }

    /// Recorded intervals, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn last_record(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    pub fn toggle(&mut self) -> Transition {
        self.toggle_at(Instant::now())
    }

    /// Flip between idle and running using `now` as the current time.
    ///
    /// Stopping appends the formatted interval to the history and resets the
    /// stopwatch so the next display reads zero.
    pub fn toggle_at(&mut self, now: Instant) -> Transition {
        match self.state {
            StopwatchState::Idle => {
                self.state = StopwatchState::Running { start: now };
                tracing::debug!("stopwatch started");
                Transition::Started
            }
            StopwatchState::Running { start } => {
                let elapsed = now.saturating_duration_since(start);
                let record = format_duration(elapsed);
                self.history.push(record.clone());
                self.state = StopwatchState::Idle;
                tracing::info!(record = %record, "stopwatch stopped");
                Transition::Stopped { elapsed, record }
            }
        }
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match self.state {
            StopwatchState::Idle => Duration::ZERO,
            StopwatchState::Running { start } => now.saturating_duration_since(start),
        }
    }

    pub fn display_at(&self, now: Instant) -> String {
        format_duration(self.elapsed_at(now))
    }
}

/// Format a duration as `HH:MM:SS.mmm`.
///
/// Milliseconds are truncated, and hours keep growing past two digits.
pub fn format_duration(dur: Duration) -> String {
    format_millis(dur.as_millis())
}

/// Same as [`format_duration`] for a fractional number of seconds.
pub fn format_seconds(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return format_millis(0);
    }
    format_millis((seconds * 1000.0).floor() as u128)
}

fn format_millis(total_ms: u128) -> String {
    let millis = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}
