//! The emulator context: execution-control state machine and per-tick
//! orchestration.
//!
//! `EmuContext` is the single owned runtime-state object. The control
//! loop constructs it once at startup, calls [`EmuContext::tick`] once
//! per host tick, and drops it at shutdown; nothing here is global. The
//! audio ring inside the mixer is the only state shared with another
//! schedule (the real-time audio callback).

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::audio::AudioMixer;
use crate::config::Config;
use crate::input::InputLatch;
use crate::savefile::SavePaths;

use super::rewind::{DEFAULT_REWIND_CADENCE, RewindClock};
use super::timing::TimingAccumulator;

/// Execution-control state of the emulated machine. Exactly one mode is
/// active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Waiting for assets; transitions to Run (or Pause without a ROM) on
    /// the next tick after performing the hardware reset.
    #[default]
    Reset,
    Pause,
    Run,
    /// Advancing a bounded number of instructions/frames, then pausing.
    Step,
    /// Replaying captured checkpoints backward instead of advancing.
    Rewind,
}

/// Which hardware family the loaded ROM targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum System {
    #[default]
    Unknown,
    GameBoy,
    Gba,
    Nds,
}

/// The emulated machine, driven one unit at a time.
///
/// Each advance call is atomic from the runtime's point of view: mode
/// switches take effect at tick boundaries, never mid-unit.
pub trait Machine {
    fn reset(&mut self);
    /// Advance by a single instruction (Step granularity).
    fn step_instruction(&mut self);
    /// Advance by one full video frame (Run granularity).
    fn run_frame(&mut self);
    /// Current program counter, compared against the breakpoint.
    fn pc(&self) -> u32;
}

/// External checkpoint storage, keyed by frame index. Captures are opaque
/// to the runtime; it only signals when to take one and asks for the most
/// recent one while rewinding.
pub trait CheckpointStore {
    fn capture(&mut self, frame: u64);
    /// Restore the most recent checkpoint, returning its frame index, or
    /// `None` when the history is empty.
    fn restore_latest(&mut self) -> Option<u64>;
}

/// What a single host tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// The machine advanced by one unit (instruction or frame).
    pub advanced: bool,
    /// A checkpoint-capture signal fired this tick.
    pub captured_checkpoint: bool,
    /// A checkpoint was restored; holds its frame index.
    pub rewound_to: Option<u64>,
    /// Run mode hit the PC breakpoint and paused.
    pub hit_breakpoint: bool,
}

/// Emulator-wide runtime state.
pub struct EmuContext {
    run_mode: RunMode,
    /// Remaining units while in Step mode. Instructions are consumed
    /// before frames.
    step_instructions: u32,
    step_frames: u32,
    /// `None` disables breakpoint-triggered pause.
    pc_breakpoint: Option<u32>,
    /// Monotonic count of executed frames since the last reset.
    frame: u64,
    /// A presentation is due for the most recent tick.
    render_frame: bool,
    rom_loaded: bool,
    system: System,
    pub timing: TimingAccumulator,
    pub rewind: RewindClock,
    pub input: InputLatch,
    pub mixer: AudioMixer,
    pub paths: SavePaths,
}

impl EmuContext {
    pub fn new(config: &Config) -> Self {
        let mut mixer = AudioMixer::new();
        mixer.set_master_volume(config.audio.master_volume);
        // config.toml is user-edited; a bad cadence degrades to the
        // default instead of aborting.
        let cadence = if config.rewind.cadence_frames == 0 {
            warn!(
                "Invalid rewind cadence_frames of 0, using default {}",
                DEFAULT_REWIND_CADENCE
            );
            DEFAULT_REWIND_CADENCE
        } else {
            config.rewind.cadence_frames
        };
        Self {
            run_mode: RunMode::Reset,
            step_instructions: 0,
            step_frames: 0,
            pc_breakpoint: None,
            frame: 0,
            render_frame: false,
            rom_loaded: false,
            system: System::Unknown,
            timing: TimingAccumulator::new(),
            rewind: RewindClock::new(cadence),
            input: InputLatch::new(),
            mixer,
            paths: SavePaths::new(config.storage.save_data_dir.clone()),
        }
    }

    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn system(&self) -> System {
        self.system
    }

    pub fn rom_loaded(&self) -> bool {
        self.rom_loaded
    }

    /// Take the presentation-due flag, clearing it.
    pub fn take_render_frame(&mut self) -> bool {
        std::mem::take(&mut self.render_frame)
    }

    pub fn step_instructions_remaining(&self) -> u32 {
        self.step_instructions
    }

    pub fn step_frames_remaining(&self) -> u32 {
        self.step_frames
    }

    pub fn breakpoint(&self) -> Option<u32> {
        self.pc_breakpoint
    }

    /// Arm or disarm the PC breakpoint. `None` disables it entirely.
    pub fn set_breakpoint(&mut self, pc: Option<u32>) {
        self.pc_breakpoint = pc;
    }

    /// Record that a ROM for `system` was loaded from `rom_path`. Save and
    /// BIOS paths re-derive from the new ROM identity.
    pub fn set_rom(&mut self, system: System, rom_path: &str) {
        self.system = system;
        self.rom_loaded = true;
        self.paths.set_rom(rom_path);
        debug!("ROM attached ({:?}): {}", system, rom_path);
    }

    /// Read a ROM image and attach it to the context.
    ///
    /// Failure leaves the context unchanged (still in Reset/Pause, no ROM
    /// marked loaded) so the caller can surface the message and retry.
    pub fn load_rom(&mut self, system: System, rom_path: &str) -> Result<Vec<u8>> {
        let bytes = kiln_shared::fs::read_file(rom_path.as_ref())
            .with_context(|| format!("failed to load ROM {rom_path}"))?;
        self.set_rom(system, rom_path);
        Ok(bytes)
    }

    pub fn request_run(&mut self) {
        self.run_mode = RunMode::Run;
    }

    pub fn request_pause(&mut self) {
        self.run_mode = RunMode::Pause;
        self.step_instructions = 0;
        self.step_frames = 0;
    }

    /// Hard reset, honored from any mode on the next tick.
    pub fn request_reset(&mut self) {
        self.run_mode = RunMode::Reset;
        self.step_instructions = 0;
        self.step_frames = 0;
    }

    /// Enter Step mode for the requested unit counts. Requesting zero of
    /// both is a no-op that lands in Pause.
    pub fn request_step(&mut self, instructions: u32, frames: u32) {
        if instructions == 0 && frames == 0 {
            self.run_mode = RunMode::Pause;
            return;
        }
        self.step_instructions = instructions;
        self.step_frames = frames;
        self.run_mode = RunMode::Step;
    }

    pub fn request_rewind(&mut self) {
        self.run_mode = RunMode::Rewind;
    }

    /// Leave Rewind mode, resuming either free-run or pause.
    pub fn release_rewind(&mut self, resume_running: bool) {
        if self.run_mode == RunMode::Rewind {
            self.run_mode = if resume_running {
                RunMode::Run
            } else {
                RunMode::Pause
            };
        }
    }

    /// Drive one host tick.
    ///
    /// `dt` is the measured duration of the previous tick; it feeds the
    /// rolling frame-time average regardless of mode.
    pub fn tick(
        &mut self,
        machine: &mut dyn Machine,
        checkpoints: &mut dyn CheckpointStore,
        dt: Duration,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        match self.run_mode {
            RunMode::Reset => {
                machine.reset();
                self.frame = 0;
                self.rewind.reset();
                self.mixer.ring().flush();
                self.render_frame = true;
                self.run_mode = if self.rom_loaded {
                    RunMode::Run
                } else {
                    RunMode::Pause
                };
                debug!("Reset complete, entering {:?}", self.run_mode);
            }
            RunMode::Run => {
                machine.run_frame();
                // Frame boundary: current input becomes previous before
                // the host writes the next raw snapshot.
                self.input.latch_frame();
                self.frame += 1;
                self.render_frame = true;
                outcome.advanced = true;

                if self.rewind.advance() {
                    checkpoints.capture(self.frame);
                    outcome.captured_checkpoint = true;
                }

                if self.pc_breakpoint == Some(machine.pc()) {
                    self.run_mode = RunMode::Pause;
                    outcome.hit_breakpoint = true;
                    debug!("Breakpoint hit at {:#06x}, pausing", machine.pc());
                }
            }
            RunMode::Step => {
                // Capture is suppressed here; scrubbing must not flood
                // the checkpoint store.
                if self.step_instructions > 0 {
                    machine.step_instruction();
                    self.step_instructions -= 1;
                    outcome.advanced = true;
                } else if self.step_frames > 0 {
                    machine.run_frame();
                    self.input.latch_frame();
                    self.frame += 1;
                    self.render_frame = true;
                    self.step_frames -= 1;
                    outcome.advanced = true;
                }
                if self.step_instructions == 0 && self.step_frames == 0 {
                    self.run_mode = RunMode::Pause;
                }
            }
            RunMode::Rewind => {
                // Empty history is a no-op; the mode persists until
                // released.
                if let Some(frame) = checkpoints.restore_latest() {
                    self.frame = frame;
                    self.render_frame = true;
                    outcome.rewound_to = Some(frame);
                }
            }
            RunMode::Pause => {}
        }

        self.timing.record(dt);
        outcome
    }
}
