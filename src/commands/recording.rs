//! Tauri commands for the recording flow
//!
//! These commands create recorder screens and drive the count-in ->
//! record -> stop lifecycle.

use std::sync::Arc;

use tauri::command;

use super::{get_screen, SCREEN_REGISTRY};
use crate::config::MetrorecConfig;
use crate::errors::RecorderError;
use crate::permissions;
use crate::screen::RecorderScreen;
use crate::session::NativeTransport;
use crate::types::DisplayState;

fn user_safe(e: RecorderError) -> String {
    match e {
        RecorderError::PermissionDenied(_) => {
            "Microphone permission has not been granted. Grant it and try again.".to_string()
        }
        RecorderError::StateError(msg) => msg,
        other => {
            log::error!("Recorder operation failed: {}", other);
            "The audio session failed. Check that your audio devices are connected.".to_string()
        }
    }
}

/// Create a recorder screen and return its ID
///
/// # Arguments
/// * `config` - Optional configuration; the shared config is used when absent
#[command]
pub async fn create_recorder_screen(config: Option<MetrorecConfig>) -> Result<String, String> {
    let config = match config {
        Some(config) => config,
        None => super::config::current().await,
    };
    config.validate()?;

    let transport = NativeTransport::new(config.recording.clone(), config.storage.clone())
        .map_err(|e| {
            log::error!("Failed to initialize audio session: {}", e);
            "Unable to initialize the audio session. Check your audio drivers.".to_string()
        })?;

    let screen = Arc::new(RecorderScreen::new(Arc::new(transport), config.clone()));

    // Initial permission sweep; the screen stays blocked until record-audio
    // is granted.
    let storage_dir = std::path::PathBuf::from(&config.storage.output_directory);
    let grants = permissions::check_all(&storage_dir);
    screen.apply_grants(&grants);

    let screen_id = format!("screen_{}", chrono::Utc::now().timestamp_millis());
    {
        let mut registry = SCREEN_REGISTRY.write().await;
        registry.insert(screen_id.clone(), screen);
    }

    log::info!("Recorder screen created: {}", screen_id);
    Ok(screen_id)
}

/// Release a recorder screen, tearing down any active count-in, recording,
/// or playback
#[command]
pub async fn release_recorder_screen(screen_id: String) -> Result<(), String> {
    let screen = {
        let mut registry = SCREEN_REGISTRY.write().await;
        registry
            .remove(&screen_id)
            .ok_or_else(|| format!("Recorder screen not found: {}", screen_id))?
    };
    screen.release();
    log::info!("Recorder screen released: {}", screen_id);
    Ok(())
}

/// Arm a recording: the metronome and count-in start now, capture starts
/// when the count-in completes
#[command]
pub async fn start_recording(screen_id: String) -> Result<(), String> {
    let screen = get_screen(&screen_id).await?;
    screen.start_recording().map_err(user_safe)
}

/// Stop the recording, or cancel a count-in still in progress
#[command]
pub async fn stop_recording(screen_id: String) -> Result<(), String> {
    let screen = get_screen(&screen_id).await?;
    screen.stop_recording();
    Ok(())
}

/// Get the screen's current display snapshot
#[command]
pub async fn get_display_state(screen_id: String) -> Result<DisplayState, String> {
    let screen = get_screen(&screen_id).await?;
    Ok(screen.display())
}

/// List all active recorder screens
#[command]
pub async fn list_recorder_screens() -> Result<Vec<String>, String> {
    let registry = SCREEN_REGISTRY.read().await;
    Ok(registry.keys().cloned().collect())
}
