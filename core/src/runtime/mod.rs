//! Runtime state: execution control, frame timing, and rewind cadence.

mod context;
pub mod rewind;
pub mod timing;

pub use context::{CheckpointStore, EmuContext, Machine, RunMode, System, TickOutcome};
pub use rewind::{DEFAULT_REWIND_CADENCE, RewindClock};
pub use timing::TimingAccumulator;
