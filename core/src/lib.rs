//! Kiln Core - runtime-state and audio-streaming core
//!
//! The pieces of a multi-system retro emulator with real temporal and
//! concurrency contracts:
//!
//! - [`EmuContext`] - the owned runtime-state object driving the
//!   execution-control state machine (reset, pause, run, step, rewind)
//! - [`AudioRing`] - wait-free SPSC ring decoupling sample production
//!   from the real-time output callback
//! - [`InputLatch`] - double-buffered joystick state with edge detection
//! - [`TimingAccumulator`] - rolling frame-time average for pacing
//!
//! CPU cores, video pipelines, and cartridge mappers live elsewhere and
//! plug in through the [`Machine`] and [`CheckpointStore`] traits.

pub mod audio;
pub mod config;
pub mod input;
pub mod runtime;
pub mod savefile;

pub use audio::{AudioError, AudioMixer, AudioOutput, AudioRing, DEFAULT_RING_CAPACITY};
pub use config::Config;
pub use input::{ACTIVATION_THRESHOLD, InputLatch, JoyState, Key};
pub use runtime::{
    CheckpointStore, DEFAULT_REWIND_CADENCE, EmuContext, Machine, RewindClock, RunMode, System,
    TickOutcome, TimingAccumulator,
};
pub use savefile::SavePaths;

// Re-export the shared helpers consumers need alongside the core.
pub use kiln_shared::fs::FileError;
