//! Checkpoint-capture cadence.
//!
//! Checkpoint storage itself is an external collaborator keyed by frame
//! index; this clock only decides when a capture signal fires. Captures
//! happen every `cadence` frames of free-running execution and are
//! suppressed while stepping or rewinding, so scrubbing never floods the
//! store with checkpoints.

/// Default capture interval in frames (one checkpoint per second at 60 Hz).
pub const DEFAULT_REWIND_CADENCE: u32 = 60;

/// Counts frames since the last checkpoint capture.
///
/// The counter is always in `[0, cadence)` and resets to 0 exactly when
/// a capture signal fires.
#[derive(Debug, Clone)]
pub struct RewindClock {
    frames_since_push: u32,
    cadence: u32,
}

impl RewindClock {
    pub fn new(cadence: u32) -> Self {
        assert!(cadence > 0, "rewind cadence must be non-zero");
        Self {
            frames_since_push: 0,
            cadence,
        }
    }

    pub fn cadence(&self) -> u32 {
        self.cadence
    }

    pub fn frames_since_push(&self) -> u32 {
        self.frames_since_push
    }

    /// Count one executed frame. Returns `true` when a checkpoint capture
    /// signal fires, which is exactly when the counter would otherwise
    /// reach the cadence.
    pub fn advance(&mut self) -> bool {
        self.frames_since_push += 1;
        if self.frames_since_push == self.cadence {
            self.frames_since_push = 0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.frames_since_push = 0;
    }
}

impl Default for RewindClock {
    fn default() -> Self {
        Self::new(DEFAULT_REWIND_CADENCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_every_cadence_frames() {
        // Reference scenario: cadence 60, 185 frames.
        let mut clock = RewindClock::new(60);
        let mut signals = 0;
        for _ in 0..185 {
            if clock.advance() {
                signals += 1;
            }
            assert!(clock.frames_since_push() < clock.cadence());
        }
        assert_eq!(signals, 3);
        assert_eq!(clock.frames_since_push(), 5);
    }

    #[test]
    fn reset_restarts_the_interval() {
        let mut clock = RewindClock::new(4);
        clock.advance();
        clock.advance();
        clock.reset();
        assert_eq!(clock.frames_since_push(), 0);
        assert!(!clock.advance());
        assert!(!clock.advance());
        assert!(!clock.advance());
        assert!(clock.advance());
    }

    #[test]
    fn cadence_of_one_fires_every_frame() {
        let mut clock = RewindClock::new(1);
        assert!(clock.advance());
        assert!(clock.advance());
        assert_eq!(clock.frames_since_push(), 0);
    }
}
