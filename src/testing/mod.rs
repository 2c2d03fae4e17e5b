//! Testing utilities - offline fixtures for exercising the screen without
//! audio hardware
//!
//! `MockTransport` stands in for the native session: it counts every
//! operation, can be scripted to fail, and holds each operation's position
//! emitter so tests can feed display updates by hand.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::errors::RecorderError;
use crate::session::{PositionEmitter, PositionStream, RecordingStats, Transport};
use crate::timing::TickSink;
use crate::types::PositionUpdate;

/// Duration reported for the mock's recordings and playbacks
pub const MOCK_CLIP_MS: u64 = 3_000;

#[derive(Default)]
pub struct MockTransport {
    start_recorder_calls: AtomicUsize,
    stop_recorder_calls: AtomicUsize,
    start_player_calls: AtomicUsize,
    stop_player_calls: AtomicUsize,
    fail_start_recorder: AtomicBool,
    fail_start_player: AtomicBool,
    recorder_emitter: Mutex<Option<PositionEmitter>>,
    player_emitter: Mutex<Option<PositionEmitter>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_recorder_calls(&self) -> usize {
        self.start_recorder_calls.load(Ordering::SeqCst)
    }

    pub fn stop_recorder_calls(&self) -> usize {
        self.stop_recorder_calls.load(Ordering::SeqCst)
    }

    pub fn start_player_calls(&self) -> usize {
        self.start_player_calls.load(Ordering::SeqCst)
    }

    pub fn stop_player_calls(&self) -> usize {
        self.stop_player_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.start_recorder_calls()
            + self.stop_recorder_calls()
            + self.start_player_calls()
            + self.stop_player_calls()
    }

    pub fn fail_start_recorder(&self, fail: bool) {
        self.fail_start_recorder.store(fail, Ordering::SeqCst);
    }

    pub fn fail_start_player(&self, fail: bool) {
        self.fail_start_player.store(fail, Ordering::SeqCst);
    }

    /// Feed a position event into the active recording's stream
    pub fn emit_record_position(&self, position_ms: u64) -> bool {
        self.recorder_emitter
            .lock()
            .unwrap()
            .as_ref()
            .map(|emitter| {
                emitter.emit(PositionUpdate {
                    current_position_ms: position_ms,
                    duration_ms: position_ms,
                })
            })
            .unwrap_or(false)
    }

    /// Feed a position event into the active playback's stream
    pub fn emit_play_position(&self, position_ms: u64) -> bool {
        self.player_emitter
            .lock()
            .unwrap()
            .as_ref()
            .map(|emitter| {
                emitter.emit(PositionUpdate {
                    current_position_ms: position_ms,
                    duration_ms: MOCK_CLIP_MS,
                })
            })
            .unwrap_or(false)
    }
}

impl Transport for MockTransport {
    fn start_recorder(&self) -> Result<PositionStream, RecorderError> {
        self.start_recorder_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_start_recorder.load(Ordering::SeqCst) {
            return Err(RecorderError::CaptureError(
                "scripted start_recorder failure".to_string(),
            ));
        }
        let (emitter, stream) = PositionStream::channel();
        *self.recorder_emitter.lock().unwrap() = Some(emitter);
        Ok(stream)
    }

    fn stop_recorder(&self) -> Result<RecordingStats, RecorderError> {
        self.stop_recorder_calls.fetch_add(1, Ordering::SeqCst);
        let emitter = self.recorder_emitter.lock().unwrap().take();
        if emitter.is_none() {
            return Err(RecorderError::StateError(
                "no active recording".to_string(),
            ));
        }
        Ok(RecordingStats {
            samples_written: 48 * MOCK_CLIP_MS,
            duration_secs: MOCK_CLIP_MS as f64 / 1_000.0,
            bytes_written: 4 * 48 * MOCK_CLIP_MS,
            output_path: "mock_take.wav".to_string(),
        })
    }

    fn start_player(&self) -> Result<PositionStream, RecorderError> {
        self.start_player_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_start_player.load(Ordering::SeqCst) {
            return Err(RecorderError::PlaybackError(
                "scripted start_player failure".to_string(),
            ));
        }
        let (emitter, stream) = PositionStream::channel();
        emitter.emit(PositionUpdate {
            current_position_ms: 0,
            duration_ms: MOCK_CLIP_MS,
        });
        *self.player_emitter.lock().unwrap() = Some(emitter);
        Ok(stream)
    }

    fn stop_player(&self) -> Result<(), RecorderError> {
        self.stop_player_calls.fetch_add(1, Ordering::SeqCst);
        let emitter = self.player_emitter.lock().unwrap().take();
        if emitter.is_none() {
            return Err(RecorderError::StateError("no active playback".to_string()));
        }
        Ok(())
    }
}

/// Tick sink that only counts
#[derive(Default)]
pub struct CountingSink {
    ticks: AtomicU64,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }
}

impl TickSink for CountingSink {
    fn click(&self) {
        self.ticks.fetch_add(1, Ordering::SeqCst);
    }
}

/// Write a short synthetic click WAV (50 ms, 440 Hz, mono) for tests that
/// need a real asset on disk
pub fn write_test_click(path: &Path) -> Result<(), RecorderError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 48_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| RecorderError::IoError(format!("Failed to create test click: {}", e)))?;

    let len = 48_000 * 50 / 1000;
    for i in 0..len {
        let t = i as f32 / 48_000.0;
        let sample = (std::f32::consts::TAU * 440.0 * t).sin() * 0.5;
        writer
            .write_sample((sample * i16::MAX as f32) as i16)
            .map_err(|e| RecorderError::IoError(format!("Failed to write test click: {}", e)))?;
    }
    writer
        .finalize()
        .map_err(|e| RecorderError::IoError(format!("Failed to finalize test click: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_counts_operations() {
        let mock = MockTransport::new();
        let _stream = mock.start_recorder().unwrap();
        assert_eq!(mock.start_recorder_calls(), 1);
        assert!(mock.stop_recorder().is_ok());
        assert_eq!(mock.stop_recorder_calls(), 1);
    }

    #[test]
    fn test_mock_stop_without_start_fails() {
        let mock = MockTransport::new();
        assert!(mock.stop_recorder().is_err());
        assert!(mock.stop_player().is_err());
        assert_eq!(mock.total_calls(), 2);
    }

    #[test]
    fn test_scripted_failure() {
        let mock = MockTransport::new();
        mock.fail_start_recorder(true);
        assert!(mock.start_recorder().is_err());
        assert_eq!(mock.start_recorder_calls(), 1);
    }
}
