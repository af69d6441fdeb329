// segworld_core/src/simulation/progress.rs

use std::time::{Duration, Instant};
use tracing::info;

/// Logs a status line each time a batch crosses another tenth of its horizon,
/// with a wall-clock estimate of what is left.
#[derive(Debug)]
pub struct ProgressReporter {
    ticks: usize,
    next_tick: usize,
    started: Instant,
}

impl ProgressReporter {
    pub fn new(ticks: usize) -> Self {
        Self {
            ticks: ticks.max(1),
            next_tick: 1,
            started: Instant::now(),
        }
    }

    /// Reports progress at `fraction` of the batch. Returns the tick that was
    /// logged, if a new one was reached.
    pub fn update(&mut self, fraction: f64) -> Option<usize> {
        let reached = (fraction.clamp(0.0, 1.0) * self.ticks as f64).floor() as usize;
        if reached < self.next_tick {
            return None;
        }
        self.next_tick = reached + 1;

        let elapsed = self.started.elapsed();
        let remaining = estimate_remaining(elapsed, fraction);
        info!(
            "[{}{}] {:>3.0}% done, about {:.1} min left",
            "#".repeat(reached),
            ".".repeat(self.ticks - reached),
            fraction * 100.0,
            remaining.as_secs_f64() / 60.0
        );
        Some(reached)
    }
}

fn estimate_remaining(elapsed: Duration, fraction: f64) -> Duration {
    if fraction <= 0.0 {
        return Duration::ZERO;
    }
    elapsed.mul_f64(((1.0 - fraction) / fraction).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_tick_is_reported_once() {
        let mut progress = ProgressReporter::new(10);
        assert_eq!(progress.update(0.05), None);
        assert_eq!(progress.update(0.1), Some(1));
        assert_eq!(progress.update(0.15), None);
        assert_eq!(progress.update(0.42), Some(4));
        assert_eq!(progress.update(0.45), None);
        assert_eq!(progress.update(1.0), Some(10));
    }

    #[test]
    fn estimate_scales_with_the_unfinished_part() {
        let elapsed = Duration::from_secs(10);
        assert_eq!(estimate_remaining(elapsed, 0.0), Duration::ZERO);
        assert_eq!(estimate_remaining(elapsed, 1.0), Duration::ZERO);
        assert_eq!(estimate_remaining(elapsed, 0.5), Duration::from_secs(10));
    }
}
