//! Audio streaming: sample ring, mixer, and the cpal output stage.

mod output;
mod ring;

pub use output::{AudioError, AudioOutput};
pub use ring::{AudioRing, DEFAULT_RING_CAPACITY};

use std::sync::Arc;

use tracing::warn;

/// Number of emulated channels whose last mixed level is kept for debug
/// display (four tone/noise channels plus the stereo mix).
pub const MIX_CHANNELS: usize = 6;

/// Producer-side mixer: scales channel output by the configured volumes
/// and pushes interleaved stereo samples into the shared ring.
pub struct AudioMixer {
    ring: Arc<AudioRing>,
    output: Option<AudioOutput>,
    master_volume: f32,
    mix_l_volume: f32,
    mix_r_volume: f32,
    /// Last raw level per channel, for debug/UI readouts.
    channel_output: [f32; MIX_CHANNELS],
}

impl AudioMixer {
    pub fn new() -> Self {
        Self {
            ring: Arc::new(AudioRing::default()),
            output: None,
            master_volume: 1.0,
            mix_l_volume: 1.0,
            mix_r_volume: 1.0,
            channel_output: [0.0; MIX_CHANNELS],
        }
    }

    /// Start the host audio stream. Failure is non-fatal: the mixer keeps
    /// accepting samples (the ring simply fills and drops) and the machine
    /// runs silent.
    pub fn start_output(&mut self) {
        match AudioOutput::start(Arc::clone(&self.ring)) {
            Ok(output) => self.output = Some(output),
            Err(e) => warn!("Failed to start audio output: {}. Audio disabled.", e),
        }
    }

    pub fn ring(&self) -> &Arc<AudioRing> {
        &self.ring
    }

    pub fn sample_rate(&self) -> Option<u32> {
        self.output.as_ref().map(AudioOutput::sample_rate)
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn set_mix_volumes(&mut self, left: f32, right: f32) {
        self.mix_l_volume = left.clamp(0.0, 1.0);
        self.mix_r_volume = right.clamp(0.0, 1.0);
    }

    pub fn set_channel_output(&mut self, channel: usize, level: f32) {
        if let Some(slot) = self.channel_output.get_mut(channel) {
            *slot = level;
        }
    }

    pub fn channel_output(&self) -> &[f32; MIX_CHANNELS] {
        &self.channel_output
    }

    /// Push one stereo frame of mixed output, levels in [-1, 1].
    pub fn push_frame(&mut self, left: f32, right: f32) {
        self.ring.push(to_sample(left * self.mix_l_volume * self.master_volume));
        self.ring.push(to_sample(right * self.mix_r_volume * self.master_volume));
    }
}

impl Default for AudioMixer {
    fn default() -> Self {
        Self::new()
    }
}

fn to_sample(level: f32) -> i16 {
    (level * 32767.0).clamp(-32768.0, 32767.0) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_frame_scales_by_volumes() {
        let mut mixer = AudioMixer::new();
        mixer.set_master_volume(0.5);
        mixer.push_frame(1.0, -1.0);
        assert_eq!(mixer.ring().pop(), 16383);
        assert_eq!(mixer.ring().pop(), -16383);
    }

    #[test]
    fn master_volume_is_clamped() {
        let mut mixer = AudioMixer::new();
        mixer.set_master_volume(2.5);
        assert_eq!(mixer.master_volume(), 1.0);
        mixer.set_master_volume(-1.0);
        assert_eq!(mixer.master_volume(), 0.0);
    }

    #[test]
    fn levels_clip_instead_of_wrapping() {
        let mut mixer = AudioMixer::new();
        mixer.push_frame(4.0, -4.0);
        assert_eq!(mixer.ring().pop(), 32767);
        assert_eq!(mixer.ring().pop(), -32768);
    }
}
