//! The metronome's click sound
//!
//! The clip is decoded once at screen construction and handed to a
//! dedicated playback thread (rodio output streams are not `Send`).
//! `click()` posts a fire-and-forget play request; overlapping plays are
//! allowed. If the asset fails to load the click is permanently inert for
//! the session and ticks fire silently.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use rodio::buffer::SamplesBuffer;
use rodio::{Decoder, OutputStream, Source};

use crate::errors::RecorderError;
use crate::timing::TickSink;

/// Clips longer than this are truncated; the click is a short tick, not a
/// backing track.
const MAX_CLIP_SECS: usize = 2;

#[derive(Clone)]
struct ClickPcm {
    samples: Arc<Vec<f32>>,
    channels: u16,
    sample_rate: u32,
}

pub struct ClickSound {
    trigger: Option<crossbeam_channel::Sender<()>>,
}

impl ClickSound {
    /// Load a click from an audio file (any format rodio can decode)
    pub fn load(path: &Path, volume: f32) -> Result<Self, RecorderError> {
        let file = File::open(path).map_err(|e| {
            RecorderError::AssetError(format!("Failed to open click asset {:?}: {}", path, e))
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| {
            RecorderError::AssetError(format!("Failed to decode click asset {:?}: {}", path, e))
        })?;

        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        let max_samples = sample_rate as usize * channels as usize * MAX_CLIP_SECS;
        let samples: Vec<f32> = decoder.convert_samples().take(max_samples).collect();
        if samples.is_empty() {
            return Err(RecorderError::AssetError(format!(
                "Click asset {:?} contains no samples",
                path
            )));
        }

        Self::with_pcm(
            ClickPcm {
                samples: Arc::new(samples),
                channels,
                sample_rate,
            },
            volume,
        )
    }

    /// Built-in synthesized click used when no asset is configured:
    /// a 30 ms decaying sine tick.
    pub fn synth(volume: f32) -> Result<Self, RecorderError> {
        let sample_rate = 48_000u32;
        let len = sample_rate as usize * 30 / 1000;
        let freq = 1_760.0f32;
        let samples: Vec<f32> = (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                let envelope = 1.0 - i as f32 / len as f32;
                (std::f32::consts::TAU * freq * t).sin() * envelope * 0.6
            })
            .collect();

        Self::with_pcm(
            ClickPcm {
                samples: Arc::new(samples),
                channels: 1,
                sample_rate,
            },
            volume,
        )
    }

    /// A click that never sounds; constructed by callers after a logged
    /// load failure.
    pub fn inert() -> Self {
        Self { trigger: None }
    }

    pub fn is_inert(&self) -> bool {
        self.trigger.is_none()
    }

    fn with_pcm(pcm: ClickPcm, volume: f32) -> Result<Self, RecorderError> {
        let (trigger, requests) = crossbeam_channel::bounded::<()>(4);

        thread::Builder::new()
            .name("metrorec-click".to_string())
            .spawn(move || {
                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(pair) => pair,
                    Err(e) => {
                        log::error!("Click output stream unavailable: {}", e);
                        return;
                    }
                };

                while requests.recv().is_ok() {
                    let buffer = SamplesBuffer::new(
                        pcm.channels,
                        pcm.sample_rate,
                        pcm.samples.as_ref().clone(),
                    );
                    if let Err(e) = handle.play_raw(buffer.amplify(volume)) {
                        log::warn!("Click playback failed: {}", e);
                    }
                }
            })
            .map_err(|e| {
                RecorderError::AssetError(format!("Failed to spawn click thread: {}", e))
            })?;

        Ok(Self {
            trigger: Some(trigger),
        })
    }
}

impl TickSink for ClickSound {
    fn click(&self) {
        if let Some(trigger) = &self.trigger {
            // Full queue means plays are already overlapping; dropping the
            // request keeps the tick task from ever blocking.
            if trigger.try_send(()).is_err() {
                log::warn!("Click dropped: playback thread saturated or gone");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inert_click_is_silent_noop() {
        let click = ClickSound::inert();
        assert!(click.is_inert());
        click.click();
        click.click();
    }

    #[test]
    fn test_synth_click_constructs() {
        let click = ClickSound::synth(1.0).expect("synth click");
        assert!(!click.is_inert());
        // No audio device may be present; click must still be a safe no-op
        click.click();
    }

    #[test]
    fn test_load_missing_asset_fails() {
        let result = ClickSound::load(Path::new("/nonexistent/click.wav"), 1.0);
        assert!(result.is_err());
    }
}
