//! Lock-free SPSC sample ring shared with the audio callback.
//!
//! The emulation thread pushes one `i16` sample per emulated audio tick;
//! the real-time output callback drains at playback rate. Both pointers
//! are free-running `u32` counters whose wraparound is ordinary modular
//! arithmetic; indexing masks by `capacity - 1`, so the occupied count is
//! always `write.wrapping_sub(read)` with no normalization step.
//!
//! Overflow policy is drop-on-full: the control loop must never stall on
//! audio, so excess samples are discarded and counted. Underrun produces
//! silence; the callback never blocks.

use std::sync::atomic::{AtomicI16, AtomicU32, Ordering};

use tracing::debug;

/// Default ring capacity in samples. Power of two; 8192 samples bound
/// worst-case latency at roughly 85 ms for 48 kHz output.
pub const DEFAULT_RING_CAPACITY: u32 = 8192;

/// How many dropped samples accumulate between overflow log lines.
const DROP_LOG_INTERVAL: u32 = 4096;

/// Fixed-capacity circular buffer of `i16` samples.
///
/// Wait-free for one producer and one consumer: each side stores only its
/// own pointer (`Release`) and loads the other's (`Acquire`). Share it as
/// `Arc<AudioRing>`, producer on the emulation thread, consumer in the
/// audio callback.
pub struct AudioRing {
    samples: Box<[AtomicI16]>,
    mask: u32,
    read_ptr: AtomicU32,
    write_ptr: AtomicU32,
    dropped: AtomicU32,
}

impl AudioRing {
    /// Create a ring with the given capacity, which must be a power of two.
    pub fn with_capacity(capacity: u32) -> Self {
        assert!(
            capacity.is_power_of_two() && capacity > 1,
            "ring capacity must be a power of two, got {capacity}"
        );
        let samples = (0..capacity).map(|_| AtomicI16::new(0)).collect();
        Self {
            samples,
            mask: capacity - 1,
            read_ptr: AtomicU32::new(0),
            write_ptr: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.mask + 1
    }

    /// Number of unread samples, always in `[0, capacity)`.
    ///
    /// The pointers wrap independently, but their modular difference stays
    /// well-defined as long as both advance monotonically.
    pub fn occupied_count(&self) -> u32 {
        let write = self.write_ptr.load(Ordering::Acquire);
        let read = self.read_ptr.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }

    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }

    /// Total samples discarded by `push` since construction.
    pub fn dropped_samples(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Append one sample. Producer side only.
    ///
    /// Returns `false` when the ring was full and the sample was dropped.
    /// One slot is kept free so a full ring holds `capacity - 1` samples.
    pub fn push(&self, sample: i16) -> bool {
        let write = self.write_ptr.load(Ordering::Relaxed);
        let read = self.read_ptr.load(Ordering::Acquire);
        if write.wrapping_sub(read) >= self.mask {
            let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            if dropped % DROP_LOG_INTERVAL == 0 {
                debug!("Audio ring overflow: {} samples dropped so far", dropped);
            }
            return false;
        }
        self.samples[(write & self.mask) as usize].store(sample, Ordering::Relaxed);
        self.write_ptr.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Remove one sample, or silence when empty. Consumer side only.
    pub fn pop(&self) -> i16 {
        let read = self.read_ptr.load(Ordering::Relaxed);
        let write = self.write_ptr.load(Ordering::Acquire);
        if write == read {
            return 0;
        }
        let sample = self.samples[(read & self.mask) as usize].load(Ordering::Relaxed);
        self.read_ptr.store(read.wrapping_add(1), Ordering::Release);
        sample
    }

    /// Drain into `out`, filling the unfilled tail with silence.
    ///
    /// Returns how many real samples were popped. Never blocks; the audio
    /// callback runs on a fixed real-time schedule.
    pub fn pop_slice(&self, out: &mut [i16]) -> usize {
        let read = self.read_ptr.load(Ordering::Relaxed);
        let write = self.write_ptr.load(Ordering::Acquire);
        let available = write.wrapping_sub(read) as usize;
        let take = available.min(out.len());
        for (i, slot) in out.iter_mut().take(take).enumerate() {
            let idx = (read.wrapping_add(i as u32) & self.mask) as usize;
            *slot = self.samples[idx].load(Ordering::Relaxed);
        }
        out[take..].fill(0);
        self.read_ptr
            .store(read.wrapping_add(take as u32), Ordering::Release);
        take
    }

    /// Discard all buffered samples (hard reset, or recovery from a large
    /// detected desync). Control-loop only. Not synchronized against the
    /// consumer: a pop racing the flush can store a pre-flush read
    /// pointer afterwards, un-discarding up to a full buffer of stale
    /// samples until the consumer drains them. Tolerated because flush
    /// happens only on reset, where a momentary replay of old audio is
    /// inaudible next to the reset itself.
    pub fn flush(&self) {
        let write = self.write_ptr.load(Ordering::Acquire);
        self.read_ptr.store(write, Ordering::Release);
    }

    /// Rebase both pointers for wraparound tests.
    #[cfg(test)]
    fn set_origin(&self, origin: u32) {
        self.read_ptr.store(origin, Ordering::Relaxed);
        self.write_ptr.store(origin, Ordering::Relaxed);
    }
}

impl Default for AudioRing {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RING_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_fifo_order() {
        let ring = AudioRing::with_capacity(8);
        for s in [10i16, -20, 30] {
            assert!(ring.push(s));
        }
        assert_eq!(ring.occupied_count(), 3);
        assert_eq!(ring.pop(), 10);
        assert_eq!(ring.pop(), -20);
        assert_eq!(ring.pop(), 30);
        assert_eq!(ring.occupied_count(), 0);
    }

    #[test]
    fn pop_when_empty_is_silence() {
        let ring = AudioRing::with_capacity(8);
        assert_eq!(ring.pop(), 0);
        assert_eq!(ring.occupied_count(), 0);

        let mut out = [77i16; 4];
        assert_eq!(ring.pop_slice(&mut out), 0);
        assert_eq!(out, [0i16; 4]);
    }

    #[test]
    fn full_ring_drops_and_counts() {
        // Reference scenario: 8192-sample ring, 9000 pushes.
        let ring = AudioRing::with_capacity(8192);
        for i in 0..9000 {
            ring.push(i as i16);
        }
        assert_eq!(ring.occupied_count(), 8191);
        assert_eq!(ring.dropped_samples(), 809);
    }

    #[test]
    fn occupied_count_stays_in_range() {
        let ring = AudioRing::with_capacity(16);
        for i in 0..200 {
            if i % 3 == 0 {
                ring.pop();
            } else {
                ring.push(i as i16);
            }
            assert!(ring.occupied_count() < ring.capacity());
        }
    }

    #[test]
    fn pointer_wraparound_preserves_count_and_order() {
        let ring = AudioRing::with_capacity(16);
        // Wind both pointers to just below u32::MAX so pushes wrap them.
        ring.set_origin(u32::MAX - 5);
        for s in 0..12i16 {
            assert!(ring.push(s));
        }
        assert_eq!(ring.occupied_count(), 12);
        for expected in 0..12i16 {
            assert_eq!(ring.pop(), expected);
        }
        assert_eq!(ring.occupied_count(), 0);
    }

    #[test]
    fn pop_slice_drains_then_pads_silence() {
        let ring = AudioRing::with_capacity(8);
        ring.push(1);
        ring.push(2);
        let mut out = [99i16; 5];
        assert_eq!(ring.pop_slice(&mut out), 2);
        assert_eq!(out, [1, 2, 0, 0, 0]);
    }

    #[test]
    fn flush_empties_the_ring() {
        let ring = AudioRing::with_capacity(8);
        for s in 0..5i16 {
            ring.push(s);
        }
        ring.flush();
        assert_eq!(ring.occupied_count(), 0);
        assert_eq!(ring.pop(), 0);
        // Still usable after flush.
        ring.push(42);
        assert_eq!(ring.pop(), 42);
    }
}
