//! WAV recorder combining microphone capture and container writing

use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::audio::MicCapture;
use crate::errors::RecorderError;
use crate::timing::SessionClock;

/// Audio recorder that drains capture frames into a WAV file
pub struct WavRecorder {
    capture: MicCapture,
    writer: Option<hound::WavWriter<BufWriter<File>>>,
    clock: SessionClock,
    output_path: PathBuf,
    samples_written: u64,
}

impl WavRecorder {
    /// Create a recorder that writes to the specified file.
    ///
    /// The WAV spec uses the rate and layout the capture device actually
    /// negotiated, not the requested ones.
    pub fn new<P: AsRef<Path>>(
        output_path: P,
        device: Option<&str>,
        sample_rate: u32,
        channels: u16,
    ) -> Result<Self, RecorderError> {
        let output_path = output_path.as_ref().to_path_buf();

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                RecorderError::IoError(format!("Failed to create output directory: {}", e))
            })?;
        }

        let clock = SessionClock::new();
        let capture = MicCapture::new(device, sample_rate, channels, clock.clone())?;

        let spec = hound::WavSpec {
            channels: capture.channels(),
            sample_rate: capture.sample_rate(),
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let writer = hound::WavWriter::create(&output_path, spec).map_err(|e| {
            RecorderError::IoError(format!("Failed to create output file: {}", e))
        })?;

        Ok(Self {
            capture,
            writer: Some(writer),
            clock,
            output_path,
            samples_written: 0,
        })
    }

    /// Begin capturing
    pub fn start(&mut self) -> Result<(), RecorderError> {
        self.capture.start()
    }

    /// Drain buffered capture frames into the WAV file.
    ///
    /// Returns the number of samples written this pass. Called repeatedly
    /// by the recording worker.
    pub fn pump(&mut self) -> Result<u64, RecorderError> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| RecorderError::StateError("recorder already finished".to_string()))?;

        let mut written = 0u64;
        for frame in self.capture.drain() {
            for sample in &frame.samples {
                writer
                    .write_sample(*sample)
                    .map_err(|e| RecorderError::IoError(format!("WAV write failed: {}", e)))?;
                written += 1;
            }
        }
        self.samples_written += written;
        Ok(written)
    }

    /// Wall-clock position of the active recording in milliseconds
    pub fn position_ms(&self) -> u64 {
        self.clock.position_ms()
    }

    /// Duration of the audio actually written, in milliseconds
    pub fn duration_ms(&self) -> u64 {
        let channels = self.capture.channels() as u64;
        let rate = self.capture.sample_rate() as u64;
        if channels == 0 || rate == 0 {
            return 0;
        }
        (self.samples_written / channels) * 1_000 / rate
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Stop capturing, drain the remainder, finalize the WAV header, and
    /// return statistics.
    pub fn finish(mut self) -> Result<RecordingStats, RecorderError> {
        self.capture.stop()?;
        self.pump()?;

        let duration_secs = self.duration_ms() as f64 / 1_000.0;
        let writer = self
            .writer
            .take()
            .ok_or_else(|| RecorderError::StateError("recorder already finished".to_string()))?;
        writer
            .finalize()
            .map_err(|e| RecorderError::IoError(format!("Failed to finalize WAV: {}", e)))?;

        let bytes_written = fs::metadata(&self.output_path).map(|m| m.len()).unwrap_or(0);

        Ok(RecordingStats {
            samples_written: self.samples_written,
            duration_secs,
            bytes_written,
            output_path: self.output_path.to_string_lossy().to_string(),
        })
    }
}

/// Statistics returned after finishing a recording
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RecordingStats {
    /// Total interleaved samples written
    pub samples_written: u64,
    /// Duration in seconds of the audio written
    pub duration_secs: f64,
    /// Total bytes written to file
    pub bytes_written: u64,
    /// Output file path
    pub output_path: String,
}

impl RecordingStats {
    /// Average bitrate of the finished file in bits per second
    pub fn avg_bitrate(&self) -> f64 {
        if self.duration_secs > 0.0 {
            (self.bytes_written as f64 * 8.0) / self.duration_secs
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_avg_bitrate() {
        let stats = RecordingStats {
            samples_written: 48_000,
            duration_secs: 1.0,
            bytes_written: 192_000,
            output_path: "rec.wav".to_string(),
        };
        assert!((stats.avg_bitrate() - 1_536_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_avg_bitrate_zero_duration() {
        let stats = RecordingStats {
            samples_written: 0,
            duration_secs: 0.0,
            bytes_written: 44,
            output_path: "rec.wav".to_string(),
        };
        assert_eq!(stats.avg_bitrate(), 0.0);
    }

    #[test]
    #[ignore = "Requires a microphone - run manually"]
    fn test_record_and_finalize() {
        let dir = std::env::temp_dir();
        let output = dir.join("metrorec_capture_test.wav");

        let mut recorder =
            WavRecorder::new(&output, None, 48_000, 1).expect("recorder creation failed");
        recorder.start().expect("start failed");
        std::thread::sleep(std::time::Duration::from_millis(200));
        recorder.pump().expect("pump failed");

        let stats = recorder.finish().expect("finish failed");
        assert!(stats.bytes_written > 0);

        let _ = fs::remove_file(&output);
    }
}
