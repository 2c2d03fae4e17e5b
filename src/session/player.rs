//! Clip playback on a dedicated audio thread
//!
//! rodio output streams are not `Send`, so the sink lives on its own
//! thread and the player is driven over a command channel. Stop is
//! idempotent; a decode or output failure is logged on the thread and the
//! player simply ends up idle.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::errors::RecorderError;

enum PlayerCommand {
    Play(PathBuf),
    Stop,
}

/// Handle to the playback thread
pub struct ClipPlayer {
    commands: crossbeam_channel::Sender<PlayerCommand>,
    playing: Arc<AtomicBool>,
}

impl ClipPlayer {
    pub fn new() -> Result<Self, RecorderError> {
        let (commands, receiver) = crossbeam_channel::unbounded::<PlayerCommand>();
        let playing = Arc::new(AtomicBool::new(false));
        let playing_thread = playing.clone();

        thread::Builder::new()
            .name("metrorec-player".to_string())
            .spawn(move || playback_loop(receiver, playing_thread))
            .map_err(|e| {
                RecorderError::PlaybackError(format!("Failed to spawn player thread: {}", e))
            })?;

        Ok(Self { commands, playing })
    }

    /// Begin playing the clip at `path`. Any current playback stops first.
    pub fn play(&self, path: PathBuf) -> Result<(), RecorderError> {
        self.playing.store(true, Ordering::SeqCst);
        self.commands
            .send(PlayerCommand::Play(path))
            .map_err(|_| RecorderError::PlaybackError("Player thread is gone".to_string()))
    }

    /// Stop playback. Idempotent; safe when nothing is playing.
    pub fn stop(&self) {
        let _ = self.commands.send(PlayerCommand::Stop);
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}

// Dropping the command sender disconnects the channel and ends the thread.

fn playback_loop(
    receiver: crossbeam_channel::Receiver<PlayerCommand>,
    playing: Arc<AtomicBool>,
) {
    // The stream must outlive the sink; both stay on this thread.
    let mut current: Option<(OutputStream, OutputStreamHandle, Sink)> = None;

    loop {
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(PlayerCommand::Play(path)) => {
                if let Some((_, _, sink)) = current.take() {
                    sink.stop();
                }
                match open_clip(&path) {
                    Ok(parts) => {
                        current = Some(parts);
                    }
                    Err(e) => {
                        log::error!("Failed to play {:?}: {}", path, e);
                        playing.store(false, Ordering::SeqCst);
                    }
                }
            }
            Ok(PlayerCommand::Stop) => {
                if let Some((_, _, sink)) = current.take() {
                    sink.stop();
                }
                playing.store(false, Ordering::SeqCst);
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                // Poll for natural end of playback
                let finished = current
                    .as_ref()
                    .map(|(_, _, sink)| sink.empty())
                    .unwrap_or(false);
                if finished {
                    current = None;
                    playing.store(false, Ordering::SeqCst);
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                if let Some((_, _, sink)) = current.take() {
                    sink.stop();
                }
                playing.store(false, Ordering::SeqCst);
                return;
            }
        }
    }
}

fn open_clip(path: &Path) -> Result<(OutputStream, OutputStreamHandle, Sink), RecorderError> {
    let (stream, handle) = OutputStream::try_default().map_err(|e| {
        RecorderError::PlaybackError(format!("Failed to open audio output: {}", e))
    })?;

    let file = File::open(path)
        .map_err(|e| RecorderError::PlaybackError(format!("Failed to open {:?}: {}", path, e)))?;
    let source = Decoder::new(BufReader::new(file))
        .map_err(|e| RecorderError::PlaybackError(format!("Failed to decode {:?}: {}", path, e)))?;

    let sink = Sink::try_new(&handle)
        .map_err(|e| RecorderError::PlaybackError(format!("Failed to create sink: {}", e)))?;
    sink.append(source);
    sink.play();

    Ok((stream, handle, sink))
}

/// Probe the duration of a finished recording from its WAV header
pub fn clip_duration_ms(path: &Path) -> Result<u64, RecorderError> {
    let file = File::open(path)
        .map_err(|e| RecorderError::PlaybackError(format!("Failed to open {:?}: {}", path, e)))?;
    let reader = hound::WavReader::new(file).map_err(|e| {
        RecorderError::PlaybackError(format!("Failed to read WAV header {:?}: {}", path, e))
    })?;

    let spec = reader.spec();
    let frames = reader.duration() as u64;
    if spec.sample_rate == 0 {
        return Err(RecorderError::PlaybackError(format!(
            "Invalid WAV file {:?}: zero sample rate",
            path
        )));
    }
    Ok(frames * 1_000 / spec.sample_rate as u64)
}
