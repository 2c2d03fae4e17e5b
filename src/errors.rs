use std::fmt;

#[derive(Debug)]
pub enum RecorderError {
    PermissionDenied(String),
    DeviceError(String),
    CaptureError(String),
    PlaybackError(String),
    AssetError(String),
    StateError(String),
    IoError(String),
    ConfigError(String),
}

impl fmt::Display for RecorderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecorderError::PermissionDenied(msg) => write!(f, "Permission denied error: {}", msg),
            RecorderError::DeviceError(msg) => write!(f, "Audio device error: {}", msg),
            RecorderError::CaptureError(msg) => write!(f, "Capture error: {}", msg),
            RecorderError::PlaybackError(msg) => write!(f, "Playback error: {}", msg),
            RecorderError::AssetError(msg) => write!(f, "Sound asset error: {}", msg),
            RecorderError::StateError(msg) => write!(f, "State error: {}", msg),
            RecorderError::IoError(msg) => write!(f, "IO error: {}", msg),
            RecorderError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for RecorderError {}
