use std::time::{Duration, Instant};

/// Wall-clock timer for one unit of work, reported through `tracing`.
pub struct Telemetry {
    label: &'static str,
    start: Instant,
}

impl Telemetry {
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Emits a debug event with the elapsed time and returns it.
    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        tracing::debug!(
            label = self.label,
            elapsed_ms = elapsed.as_millis() as u64,
            "finished"
        );
        elapsed
    }
}
