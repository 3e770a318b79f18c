//! Wall-clock budget polled by the searches.

use std::fmt;
use std::time::{Duration, Instant};

/// A started stopwatch with a budget in seconds.
#[derive(Clone, Copy, Debug)]
pub struct Timer {
    start: Instant,
    budget: Duration,
}

impl Timer {
    /// Start a timer with `seconds` of budget. Non-finite or huge budgets never expire.
    pub fn start(seconds: f64) -> Self {
        let budget = Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::MAX);
        Self {
            start: Instant::now(),
            budget,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn seconds_elapsed(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// True once the budget has been used up.
    #[inline]
    pub fn exceeded(&self) -> bool {
        self.start.elapsed() > self.budget
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}s", self.seconds_elapsed())
    }
}
