//! Tauri commands for playback of the last recording

use tauri::command;

use super::get_screen;

/// Start playing the last finalized recording
#[command]
pub async fn start_playback(screen_id: String) -> Result<(), String> {
    let screen = get_screen(&screen_id).await?;
    screen.start_playing().map_err(|e| {
        log::error!("Playback failed: {}", e);
        "Unable to start playback. Record something first.".to_string()
    })
}

/// Stop playback and reset the play-side display
#[command]
pub async fn stop_playback(screen_id: String) -> Result<(), String> {
    let screen = get_screen(&screen_id).await?;
    screen.stop_playing();
    Ok(())
}
