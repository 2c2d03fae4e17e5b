//! Configuration management for metrorec
//!
//! Provides configuration loading, saving, and management for recording,
//! metronome, count-in, and storage settings.

use crate::errors::RecorderError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetrorecConfig {
    pub recording: RecordingConfig,
    pub metronome: MetronomeConfig,
    pub countdown: CountdownConfig,
    pub storage: StorageConfig,
}

/// Capture-side configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Input device ID or name; None means the system default
    pub device: Option<String>,
    /// Requested sample rate in Hz
    pub sample_rate: u32,
    /// Requested channel count (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Interval between position events in milliseconds
    pub position_interval_ms: u64,
}

/// Metronome configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetronomeConfig {
    /// Whether the count-in plays a click at all
    pub enabled: bool,
    /// Tempo in beats per minute (120 -> one click every 500 ms)
    pub bpm: u32,
    /// Click asset path; None uses the built-in synthesized click
    pub click_path: Option<String>,
    /// Click volume (0.0 - 2.0)
    pub volume: f32,
}

/// Count-in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Ticks to count down before recording starts
    pub start_value: u32,
    /// Tick period in milliseconds
    pub tick_ms: u64,
}

/// Storage and file management configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Output directory for recordings
    pub output_directory: String,
    /// Organize recordings into per-date subdirectories
    pub auto_organize_by_date: bool,
    /// chrono format string for the date subdirectory
    pub date_format: String,
    /// Prefix for recording file names
    pub file_prefix: String,
}

impl Default for MetrorecConfig {
    fn default() -> Self {
        Self {
            recording: RecordingConfig {
                device: None,
                sample_rate: 48_000,
                channels: 1,
                position_interval_ms: 100,
            },
            metronome: MetronomeConfig {
                enabled: true,
                bpm: 120,
                click_path: None,
                volume: 1.0,
            },
            countdown: CountdownConfig {
                start_value: 8,
                tick_ms: 1_000,
            },
            storage: StorageConfig {
                output_directory: "./recordings".to_string(),
                auto_organize_by_date: true,
                date_format: "%Y-%m-%d".to_string(),
                file_prefix: "rec".to_string(),
            },
        }
    }
}

impl MetrorecConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, RecorderError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            RecorderError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        let config: MetrorecConfig = toml::from_str(&contents).map_err(|e| {
            RecorderError::ConfigError(format!("Failed to parse config file: {}", e))
        })?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), RecorderError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                RecorderError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| RecorderError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string).map_err(|e| {
            RecorderError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("metrorec.toml")
    }

    /// Load from default location or create with defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.recording.sample_rate < 8_000 || self.recording.sample_rate > 192_000 {
            return Err("Sample rate must be between 8000 and 192000 Hz".to_string());
        }
        if self.recording.channels == 0 || self.recording.channels > 2 {
            return Err("Channels must be 1 (mono) or 2 (stereo)".to_string());
        }
        if self.recording.position_interval_ms == 0 {
            return Err("Position interval must be positive".to_string());
        }

        if self.metronome.bpm < 20 || self.metronome.bpm > 400 {
            return Err("Metronome tempo must be between 20 and 400 BPM".to_string());
        }
        if !(0.0..=2.0).contains(&self.metronome.volume) {
            return Err("Click volume must be between 0.0 and 2.0".to_string());
        }

        if self.countdown.start_value == 0 || self.countdown.start_value > 64 {
            return Err("Count-in length must be between 1 and 64 ticks".to_string());
        }
        if self.countdown.tick_ms < 10 {
            return Err("Count-in tick period must be at least 10 ms".to_string());
        }

        if self.storage.output_directory.is_empty() {
            return Err("Output directory must not be empty".to_string());
        }
        if self.storage.file_prefix.is_empty() {
            return Err("Recording file prefix must not be empty".to_string());
        }
        // chrono only reports bad specifiers when the path is rendered
        let mut items = chrono::format::strftime::StrftimeItems::new(&self.storage.date_format);
        if items.any(|item| matches!(item, chrono::format::Item::Error)) {
            return Err("Invalid date format for recording directories".to_string());
        }

        Ok(())
    }
}
