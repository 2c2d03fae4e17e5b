//! Shared types for the recorder screen

use serde::{Deserialize, Serialize};

/// The zero timestamp shown before any position event arrives
pub const ZERO_CLOCK: &str = "00:00:00";

/// Platform detection enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Windows,
    MacOS,
    Linux,
    Unknown,
}

impl Platform {
    /// Detect the platform this process is running on
    pub fn current() -> Self {
        #[cfg(target_os = "windows")]
        {
            Platform::Windows
        }
        #[cfg(target_os = "macos")]
        {
            Platform::MacOS
        }
        #[cfg(target_os = "linux")]
        {
            Platform::Linux
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            Platform::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::MacOS => "macos",
            Platform::Linux => "linux",
            Platform::Unknown => "unknown",
        }
    }
}

/// A single position event from an active record or play operation.
///
/// Mirrors the `{currentPosition, duration}` payload the frontend consumes;
/// both values are milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    pub current_position_ms: u64,
    pub duration_ms: u64,
}

/// Snapshot of everything the recorder screen displays
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState {
    /// Elapsed record time, `MM:SS:CC`
    pub record_time: String,
    /// Elapsed playback time, `MM:SS:CC`
    pub play_time: String,
    /// Duration of the clip being played, `MM:SS:CC`
    pub duration: String,
    /// Remaining count-in ticks, `None` outside a countdown
    pub countdown: Option<u32>,
    pub is_recording: bool,
    pub is_playing: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            record_time: ZERO_CLOCK.to_string(),
            play_time: ZERO_CLOCK.to_string(),
            duration: ZERO_CLOCK.to_string(),
            countdown: None,
            is_recording: false,
            is_playing: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_detection() {
        let platform = Platform::current();
        assert!(!platform.as_str().is_empty());
    }

    #[test]
    fn test_display_state_defaults_to_zero_clock() {
        let state = DisplayState::default();
        assert_eq!(state.record_time, ZERO_CLOCK);
        assert_eq!(state.play_time, ZERO_CLOCK);
        assert_eq!(state.duration, ZERO_CLOCK);
        assert_eq!(state.countdown, None);
        assert!(!state.is_recording);
        assert!(!state.is_playing);
    }

    #[test]
    fn test_position_update_serializes_camel_case() {
        let update = PositionUpdate {
            current_position_ms: 1500,
            duration_ms: 3000,
        };
        let json = serde_json::to_string(&update).unwrap();
        assert!(json.contains("currentPositionMs"));
        assert!(json.contains("durationMs"));
    }
}
