//! Microphone capture as timestamped PCM frames
//!
//! # Spell: MicCapturePCM
//! ^ Intent: capture microphone audio as position-stamped PCM frames with bounded memory
//!
//! @MicCapture
//!   : (device_id, sample_rate, channels) -> MicCapture
//!   ! produces_interleaved_f32_pcm
//!   ! bounded_buffer
//!   ! start_is_idempotent
//!   ! stop_is_idempotent
//!   ! joins_capture_stream_on_drop
//!   - unbounded_memory_growth
//!   - blocking_callback

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};

use super::device::find_input_device;
use crate::errors::RecorderError;
use crate::timing::SessionClock;

/// Maximum number of audio frames to buffer before dropping newest.
/// At 48kHz with typical ~10ms callbacks this allows several seconds of
/// buffering between drains without unbounded growth.
const MAX_BUFFER_FRAMES: usize = 512;

/// A single audio frame with PCM samples and the session position it was
/// captured at
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Interleaved f32 PCM samples
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Session position in milliseconds (from SessionClock)
    pub position_ms: u64,
}

/// Microphone capture stream feeding a bounded frame channel
pub struct MicCapture {
    stream: Option<Stream>,
    receiver: crossbeam_channel::Receiver<AudioFrame>,
    is_running: Arc<AtomicBool>,
    sample_rate: u32,
    channels: u16,
    clock: SessionClock,
}

impl MicCapture {
    /// Create a capture stream for the specified device.
    ///
    /// If `device_id` is None or empty, uses the system default input.
    /// The `clock` should be shared with the position pump so display
    /// positions and frame stamps agree.
    pub fn new(
        device_id: Option<&str>,
        sample_rate: u32,
        channels: u16,
        clock: SessionClock,
    ) -> Result<Self, RecorderError> {
        let device_id = device_id.unwrap_or("default");
        let device_info = find_input_device(device_id)?;

        let host = cpal::default_host();
        let device = if device_id.is_empty() || device_id == "default" {
            host.default_input_device().ok_or_else(|| {
                RecorderError::DeviceError("No default audio input device".to_string())
            })?
        } else {
            host.input_devices()
                .map_err(|e| {
                    RecorderError::DeviceError(format!("Failed to enumerate devices: {}", e))
                })?
                .find(|d| d.name().ok().as_ref() == Some(&device_info.name))
                .ok_or_else(|| {
                    RecorderError::DeviceError(format!("Device not found: {}", device_id))
                })?
        };

        // Use the requested rate/layout when the device can't tell us better
        let supported_config = device
            .default_input_config()
            .map_err(|e| RecorderError::DeviceError(format!("No supported config: {}", e)))?;

        let actual_sample_rate = if sample_rate == 48000 || sample_rate == 44100 {
            sample_rate
        } else {
            supported_config.sample_rate().0
        };

        let actual_channels = if channels == 1 || channels == 2 {
            channels
        } else {
            supported_config.channels()
        };

        let config = StreamConfig {
            channels: actual_channels,
            sample_rate: cpal::SampleRate(actual_sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        // Bounded channel to prevent unbounded memory growth
        let (sender, receiver) = crossbeam_channel::bounded(MAX_BUFFER_FRAMES);
        let is_running = Arc::new(AtomicBool::new(false));
        let is_running_cb = is_running.clone();
        let clock_cb = clock.clone();
        let config_sample_rate = config.sample_rate.0;
        let config_channels = config.channels;

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !is_running_cb.load(Ordering::Relaxed) {
                        return;
                    }

                    let frame = AudioFrame {
                        samples: data.to_vec(),
                        sample_rate: config_sample_rate,
                        channels: config_channels,
                        position_ms: clock_cb.position_ms(),
                    };

                    // Non-blocking send - drops the frame if the drain is slow
                    let _ = sender.try_send(frame);
                },
                move |err| {
                    log::error!("Audio capture error: {}", err);
                },
                None,
            )
            .map_err(|e| RecorderError::CaptureError(format!("Failed to build stream: {}", e)))?;

        Ok(Self {
            stream: Some(stream),
            receiver,
            is_running,
            sample_rate: config.sample_rate.0,
            channels: config.channels,
            clock,
        })
    }

    /// Start capturing audio (idempotent)
    pub fn start(&mut self) -> Result<(), RecorderError> {
        if self.is_running.load(Ordering::Relaxed) {
            return Ok(()); // Already running
        }

        if let Some(ref stream) = self.stream {
            stream.play().map_err(|e| {
                RecorderError::CaptureError(format!("Failed to start stream: {}", e))
            })?;
            self.is_running.store(true, Ordering::Relaxed);
        }

        Ok(())
    }

    /// Stop capturing audio (idempotent)
    pub fn stop(&mut self) -> Result<(), RecorderError> {
        if !self.is_running.load(Ordering::Relaxed) {
            return Ok(()); // Already stopped
        }

        if let Some(ref stream) = self.stream {
            stream
                .pause()
                .map_err(|e| RecorderError::CaptureError(format!("Failed to stop stream: {}", e)))?;
            self.is_running.store(false, Ordering::Relaxed);
        }

        Ok(())
    }

    /// Read all buffered audio frames
    ///
    /// Non-blocking, returns empty vec if no frames available.
    pub fn drain(&self) -> Vec<AudioFrame> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.receiver.try_recv() {
            frames.push(frame);
        }
        frames
    }

    /// Check if capture is currently running
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    /// Get the negotiated sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the negotiated channel count
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Get the shared session clock
    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }
}

impl Drop for MicCapture {
    fn drop(&mut self) {
        // Ensure stream is stopped before drop
        let _ = self.stop();
        // Stream is dropped here, which joins any internal threads
        self.stream = None;
    }
}
