//! Metrorec: count-in audio recording and playback for Tauri applications
//!
//! This crate provides the backend of a recorder screen: microphone
//! recording to WAV armed by a metronome-accompanied countdown, playback of
//! the last take, and formatted elapsed-time strings for the frontend.
//!
//! # Features
//! - Count-in before recording (metronome click during the countdown)
//! - WAV recording via cpal, playback via rodio
//! - Position events and fixed-width `MM:SS:CC` display strings
//! - Microphone/storage permission checks per platform
//! - Thread-safe screen management
//!
//! # Usage
//! Add this to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! metrorec = "0.3"
//! tauri = { version = "2.0", features = ["protocol-asset"] }
//! ```
//!
//! Then in your Tauri app:
//! ```rust,ignore
//! use metrorec;
//!
//! fn main() {
//!     tauri::Builder::default()
//!         .plugin(metrorec::init())
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```
pub mod audio;
pub mod commands;
pub mod config;
pub mod errors;
pub mod invariant_ppt;
pub mod permissions;
pub mod screen;
pub mod session;
pub mod timing;
pub mod types;

// Testing utilities - offline fixtures (mock transport, synthetic click)
pub mod testing;

// Re-exports for convenience
pub use config::MetrorecConfig;
pub use errors::RecorderError;
pub use screen::RecorderScreen;
pub use session::{NativeTransport, PositionStream, RecordingStats, Transport};
pub use timing::{format_position, Countdown, CountdownState, Metronome, TickSink};
pub use types::{DisplayState, Platform, PositionUpdate};

use tauri::{
    plugin::{Builder, TauriPlugin},
    Runtime,
};

/// Initialize the Metrorec plugin with all commands
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    Builder::new("metrorec")
        .invoke_handler(tauri::generate_handler![
            // Screen lifecycle commands
            commands::recording::create_recorder_screen,
            commands::recording::release_recorder_screen,
            commands::recording::list_recorder_screens,
            // Recording commands
            commands::recording::start_recording,
            commands::recording::stop_recording,
            commands::recording::get_display_state,
            // Playback commands
            commands::playback::start_playback,
            commands::playback::stop_playback,
            // Permission commands
            commands::permissions::request_record_permission,
            commands::permissions::request_all_permissions,
            commands::permissions::check_record_permission_status,
            commands::permissions::get_permission_status_string,
            // Device commands
            commands::devices::list_input_devices,
            commands::devices::list_output_devices,
            commands::devices::get_default_input_device,
            // Configuration commands
            commands::config::get_config,
            commands::config::update_config,
            commands::config::reset_config,
        ])
        .build()
}

/// Detect the current platform using the Platform enum
pub fn current_platform() -> Platform {
    Platform::current()
}

/// Initialize logging for the recorder
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "metrorec=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
        platform: Platform::current(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub platform: Platform,
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    #[test]
    fn test_platform_detection() {
        let platform = current_platform();
        assert_ne!(platform, Platform::Unknown);
    }

    #[test]
    fn test_crate_info() {
        let info = get_info();
        assert_eq!(info.name, "metrorec");
        assert!(!info.version.is_empty());
        assert!(!info.description.is_empty());
    }
}
