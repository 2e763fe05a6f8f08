//! Rolling frame-time average for pacing and fast-forward decisions.

use std::time::Duration;

use tracing::warn;

/// Weight of the newest sample in the exponential average.
const SMOOTHING: f64 = 0.05;

/// Ticks longer than this are clamped before averaging, so a debugger
/// stop or window drag does not poison the average for seconds.
const MAX_TICK: Duration = Duration::from_millis(100);

/// Exponentially-smoothed average of the measured host tick duration.
#[derive(Debug, Clone, Default)]
pub struct TimingAccumulator {
    avg_secs: f64,
    seeded: bool,
}

impl TimingAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one measured tick duration into the average.
    pub fn record(&mut self, dt: Duration) {
        let dt = if dt > MAX_TICK {
            warn!("Tick took {:?}, clamping to {:?} for pacing", dt, MAX_TICK);
            MAX_TICK
        } else {
            dt
        };
        let secs = dt.as_secs_f64();
        if self.seeded {
            self.avg_secs += (secs - self.avg_secs) * SMOOTHING;
        } else {
            self.avg_secs = secs;
            self.seeded = true;
        }
    }

    pub fn average(&self) -> Duration {
        Duration::from_secs_f64(self.avg_secs)
    }

    /// Ratio of the target frame period to the measured average.
    ///
    /// Above 1.0 there is headroom (a fast-forward multiplier can grow up
    /// to roughly this factor); below 1.0 the emulation is falling behind
    /// real time. Returns 1.0 until a sample has been recorded.
    pub fn speed_ratio(&self, target: Duration) -> f64 {
        if !self.seeded || self.avg_secs <= 0.0 {
            return 1.0;
        }
        target.as_secs_f64() / self.avg_secs
    }
}
