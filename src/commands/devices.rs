//! Tauri commands for audio device management
//!
//! # Spell: TauriDeviceCommands
//!
//! Intent: expose audio device discovery through Tauri commands safely
//!
//! ## Features
//!
//! - list_devices_returns_structured_data
//! - user_safe_error_strings
//! - no leaking_internal_error_types
//! - async_safe_execution

use serde::{Deserialize, Serialize};
use tauri::command;

use crate::audio::{
    default_input_device as find_default_input, list_input_devices as enumerate_inputs,
    list_output_devices as enumerate_outputs, AudioDevice,
};

/// Audio device information exposed to the Tauri frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioDeviceInfo {
    /// Unique device identifier
    pub id: String,
    /// Human-readable device name
    pub name: String,
    /// Default sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Whether this is the system default device for its direction
    pub is_default: bool,
}

impl From<AudioDevice> for AudioDeviceInfo {
    fn from(device: AudioDevice) -> Self {
        AudioDeviceInfo {
            id: device.id,
            name: device.name,
            sample_rate: device.sample_rate,
            channels: device.channels,
            is_default: device.is_default,
        }
    }
}

/// List all available audio input devices
///
/// # Returns
/// List of input devices, sorted with the default device first
#[command]
pub async fn list_input_devices() -> Result<Vec<AudioDeviceInfo>, String> {
    enumerate_inputs()
        .map(|devices| devices.into_iter().map(AudioDeviceInfo::from).collect())
        .map_err(|e| {
            log::error!("Failed to enumerate input devices: {:?}", e);
            "Unable to list audio devices. Please check that your audio drivers are installed correctly.".to_string()
        })
}

/// List all available audio output devices (click/playback routing)
#[command]
pub async fn list_output_devices() -> Result<Vec<AudioDeviceInfo>, String> {
    enumerate_outputs()
        .map(|devices| devices.into_iter().map(AudioDeviceInfo::from).collect())
        .map_err(|e| {
            log::error!("Failed to enumerate output devices: {:?}", e);
            "Unable to list audio devices. Please check that your audio drivers are installed correctly.".to_string()
        })
}

/// Get the default audio input device
#[command]
pub async fn get_default_input_device() -> Result<AudioDeviceInfo, String> {
    find_default_input().map(AudioDeviceInfo::from).map_err(|e| {
        log::error!("Failed to get default input device: {:?}", e);
        "No default audio input device available. Please connect a microphone.".to_string()
    })
}
