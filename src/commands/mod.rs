//! Tauri command surface
//!
//! Commands operate on screens held in a global registry keyed by
//! generated IDs; each screen owns its transport, metronome, and count-in.

pub mod config;
pub mod devices;
pub mod permissions;
pub mod playback;
pub mod recording;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::screen::RecorderScreen;

// Global screen registry
lazy_static::lazy_static! {
    pub(crate) static ref SCREEN_REGISTRY: Arc<RwLock<HashMap<String, Arc<RecorderScreen>>>> =
        Arc::new(RwLock::new(HashMap::new()));
}

pub(crate) async fn get_screen(screen_id: &str) -> Result<Arc<RecorderScreen>, String> {
    let registry = SCREEN_REGISTRY.read().await;
    registry
        .get(screen_id)
        .cloned()
        .ok_or_else(|| format!("Recorder screen not found: {}", screen_id))
}
