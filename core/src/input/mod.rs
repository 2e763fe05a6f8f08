//! Input latch and edge detection.
//!
//! Two joystick snapshots are kept, current and previous. The control
//! loop writes raw activation values into the current snapshot, and at
//! each frame boundary `latch_frame` copies current into previous; press
//! and release edges fall out of comparing the two. The derivation is
//! pure, so identical snapshot sequences always produce identical edge
//! sequences (required for deterministic replay and rewind).

/// Logical input channels, shared across all emulated systems. Systems
/// with fewer physical buttons simply never activate the extras.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Key {
    A,
    B,
    X,
    Y,
    Up,
    Down,
    Left,
    Right,
    L,
    R,
    Start,
    Select,
    FoldScreen,
    PenDown,
    EmuPause,
    EmuRewind,
    EmuFf2x,
    EmuFfMax,
}

impl Key {
    pub const COUNT: usize = 18;

    pub const ALL: [Key; Key::COUNT] = [
        Key::A,
        Key::B,
        Key::X,
        Key::Y,
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::L,
        Key::R,
        Key::Start,
        Key::Select,
        Key::FoldScreen,
        Key::PenDown,
        Key::EmuPause,
        Key::EmuRewind,
        Key::EmuFf2x,
        Key::EmuFfMax,
    ];
}

/// Activation level above which a digital channel counts as pressed.
pub const ACTIVATION_THRESHOLD: f32 = 0.5;

/// One generation of joystick state: an activation value per channel
/// (digital in [0, 1], analog in [-1, 1]) plus the rumble output level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoyState {
    pub inputs: [f32; Key::COUNT],
    pub rumble: f32,
}

impl Default for JoyState {
    fn default() -> Self {
        Self {
            inputs: [0.0; Key::COUNT],
            rumble: 0.0,
        }
    }
}

/// Double-buffered joystick state with edge queries.
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    current: JoyState,
    previous: JoyState,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch the frame boundary: current becomes previous, and the next
    /// raw input writes start a fresh generation.
    pub fn latch_frame(&mut self) {
        self.previous = self.current;
    }

    /// Write a raw activation value into the current snapshot.
    pub fn set(&mut self, key: Key, value: f32) {
        self.current.inputs[key as usize] = value;
    }

    /// Raw activation value; analog channels pass through untouched.
    pub fn value(&self, key: Key) -> f32 {
        self.current.inputs[key as usize]
    }

    pub fn set_rumble(&mut self, level: f32) {
        self.current.rumble = level;
    }

    pub fn rumble(&self) -> f32 {
        self.current.rumble
    }

    /// Level query against the activation threshold.
    pub fn pressed(&self, key: Key) -> bool {
        self.current.inputs[key as usize] > ACTIVATION_THRESHOLD
    }

    /// Channel crossed above the threshold this frame.
    pub fn just_pressed(&self, key: Key) -> bool {
        self.current.inputs[key as usize] > ACTIVATION_THRESHOLD
            && self.previous.inputs[key as usize] <= ACTIVATION_THRESHOLD
    }

    /// Channel crossed back below the threshold this frame.
    pub fn just_released(&self, key: Key) -> bool {
        self.current.inputs[key as usize] <= ACTIVATION_THRESHOLD
            && self.previous.inputs[key as usize] > ACTIVATION_THRESHOLD
    }

    pub fn current(&self) -> &JoyState {
        &self.current
    }

    pub fn previous(&self) -> &JoyState {
        &self.previous
    }
}
