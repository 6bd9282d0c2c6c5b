//! A pausable stopwatch.

use std::time::{Duration, Instant};

/// Wall-clock stopwatch that can be paused and resumed.
///
/// Time spent while paused is not counted. The annealer pauses it around
/// incumbent callbacks so that slow consumers do not eat into the budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stopwatch {
    running_since: Option<Instant>,
    accumulated: Duration,
}

impl Stopwatch {
    /// A stopped stopwatch reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A stopwatch that is already running.
    pub fn started() -> Self {
        let mut watch = Self::new();
        watch.start();
        watch
    }

    /// Starts or resumes counting. No-op while running.
    pub fn start(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    /// Pauses counting. No-op while paused.
    pub fn stop(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    /// Total counted time.
    pub fn elapsed(&self) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + since.elapsed(),
            None => self.accumulated,
        }
    }
}
