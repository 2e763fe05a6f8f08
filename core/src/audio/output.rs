//! Audio output: cpal stream draining the shared sample ring.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;
use tracing::{debug, error};

use super::ring::AudioRing;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device available")]
    NoDevice,
    #[error("failed to query output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error("unsupported sample format: {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),
}

/// Owns the cpal stream consuming the ring.
///
/// The stream callback is the single consumer; it batch-drains the ring
/// and the ring itself pads any shortfall with silence, so the callback
/// never waits on the emulation thread.
pub struct AudioOutput {
    _stream: cpal::Stream,
    sample_rate: u32,
}

impl AudioOutput {
    /// Open the default output device and start draining `ring`.
    pub fn start(ring: Arc<AudioRing>) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        let config = device.default_output_config()?;
        let sample_rate = config.sample_rate().0;

        let err_fn = |err| error!("Audio stream error: {}", err);

        let stream = match config.sample_format() {
            cpal::SampleFormat::I16 => {
                let config = config.into();
                device.build_output_stream(
                    &config,
                    move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                        // Batch drain; the ring pads the tail with silence.
                        ring.pop_slice(data);
                    },
                    err_fn,
                    None,
                )?
            }
            cpal::SampleFormat::F32 => {
                let config = config.into();
                let mut scratch: Vec<i16> = vec![0; 4096];
                device.build_output_stream(
                    &config,
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        if scratch.len() < data.len() {
                            scratch.resize(data.len(), 0);
                        }
                        ring.pop_slice(&mut scratch[..data.len()]);
                        for (out, &s) in data.iter_mut().zip(&scratch) {
                            *out = f32::from(s) / 32768.0;
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            cpal::SampleFormat::U16 => {
                let config = config.into();
                let mut scratch: Vec<i16> = vec![0; 4096];
                device.build_output_stream(
                    &config,
                    move |data: &mut [u16], _: &cpal::OutputCallbackInfo| {
                        if scratch.len() < data.len() {
                            scratch.resize(data.len(), 0);
                        }
                        ring.pop_slice(&mut scratch[..data.len()]);
                        for (out, &s) in data.iter_mut().zip(&scratch) {
                            *out = (i32::from(s) + 32768) as u16;
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            other => return Err(AudioError::UnsupportedFormat(other)),
        };

        stream.play()?;
        debug!("Audio stream started at {} Hz", sample_rate);

        Ok(Self {
            _stream: stream,
            sample_rate,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
