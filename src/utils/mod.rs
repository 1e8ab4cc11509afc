use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Wall-clock timer for a snapshot run or one of its phases.
pub struct Timer {
    phase: String,
    start: Instant,
}

impl Timer {
    pub fn start(phase: impl Into<String>) -> Self {
        let phase = phase.into();
        debug!("⏱  {}: started", phase);
        Self {
            phase,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and log how long the phase took.
    pub fn finish(self) -> Duration {
        let took = self.start.elapsed();
        info!("⏱  {}: {:.2}s", self.phase, took.as_secs_f64());
        took
    }
}
