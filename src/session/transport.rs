//! Production transport: WAV recorder + clip player with position pumps

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use super::player::{clip_duration_ms, ClipPlayer};
use super::recorder::{RecordingStats, WavRecorder};
use super::{PositionStream, Transport};
use crate::config::{RecordingConfig, StorageConfig};
use crate::errors::RecorderError;
use crate::timing::SessionClock;
use crate::types::PositionUpdate;

/// How often the recording worker drains capture frames
const PUMP_INTERVAL: Duration = Duration::from_millis(20);

struct ActiveRecording {
    stop: Arc<AtomicBool>,
    worker: thread::JoinHandle<Result<RecordingStats, RecorderError>>,
}

struct ActivePlayback {
    stop: Arc<AtomicBool>,
    pump: thread::JoinHandle<()>,
}

/// [`Transport`] implementation over cpal capture and rodio playback
pub struct NativeTransport {
    recording_config: RecordingConfig,
    storage: StorageConfig,
    player: ClipPlayer,
    active_recording: Mutex<Option<ActiveRecording>>,
    active_playback: Mutex<Option<ActivePlayback>>,
    last_recording: Mutex<Option<PathBuf>>,
}

impl NativeTransport {
    pub fn new(
        recording_config: RecordingConfig,
        storage: StorageConfig,
    ) -> Result<Self, RecorderError> {
        Ok(Self {
            recording_config,
            storage,
            player: ClipPlayer::new()?,
            active_recording: Mutex::new(None),
            active_playback: Mutex::new(None),
            last_recording: Mutex::new(None),
        })
    }

    /// Path of the last finalized recording, if any
    pub fn last_recording(&self) -> Option<PathBuf> {
        self.last_recording.lock().unwrap().clone()
    }

    fn next_output_path(&self) -> PathBuf {
        let now = chrono::Local::now();
        let mut dir = PathBuf::from(&self.storage.output_directory);
        if self.storage.auto_organize_by_date {
            dir.push(now.format(&self.storage.date_format).to_string());
        }
        dir.join(format!(
            "{}_{}.wav",
            self.storage.file_prefix,
            now.format("%Y%m%d_%H%M%S%3f")
        ))
    }
}

impl Transport for NativeTransport {
    fn start_recorder(&self) -> Result<PositionStream, RecorderError> {
        let mut active = self.active_recording.lock().unwrap();
        if active.is_some() {
            return Err(RecorderError::StateError(
                "a recording is already active".to_string(),
            ));
        }

        let output_path = self.next_output_path();
        let mut recorder = WavRecorder::new(
            &output_path,
            self.recording_config.device.as_deref(),
            self.recording_config.sample_rate,
            self.recording_config.channels,
        )?;
        recorder.start()?;
        log::info!("Recording started: {:?}", output_path);

        let (emitter, stream) = PositionStream::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_worker = stop.clone();
        let emit_interval = Duration::from_millis(self.recording_config.position_interval_ms);

        let worker = thread::Builder::new()
            .name("metrorec-record".to_string())
            .spawn(move || {
                let mut last_emit = Instant::now();
                loop {
                    thread::sleep(PUMP_INTERVAL);
                    if let Err(e) = recorder.pump() {
                        log::error!("Recording pump failed: {}", e);
                    }
                    if last_emit.elapsed() >= emit_interval {
                        emitter.emit(PositionUpdate {
                            current_position_ms: recorder.position_ms(),
                            duration_ms: recorder.duration_ms(),
                        });
                        last_emit = Instant::now();
                    }
                    if stop_worker.load(Ordering::SeqCst) {
                        return recorder.finish();
                    }
                }
            })
            .map_err(|e| {
                RecorderError::CaptureError(format!("Failed to spawn recording worker: {}", e))
            })?;

        *active = Some(ActiveRecording { stop, worker });
        Ok(stream)
    }

    fn stop_recorder(&self) -> Result<RecordingStats, RecorderError> {
        let active = self
            .active_recording
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| RecorderError::StateError("no active recording".to_string()))?;

        active.stop.store(true, Ordering::SeqCst);
        let stats = active
            .worker
            .join()
            .map_err(|_| RecorderError::CaptureError("recording worker panicked".to_string()))??;

        *self.last_recording.lock().unwrap() = Some(PathBuf::from(&stats.output_path));
        log::info!(
            "Recording stopped: {:.2}s, {} bytes, {}",
            stats.duration_secs,
            stats.bytes_written,
            stats.output_path
        );
        Ok(stats)
    }

    fn start_player(&self) -> Result<PositionStream, RecorderError> {
        let mut active = self.active_playback.lock().unwrap();
        // A pump that ran to the end of the clip leaves a finished entry
        match active.as_ref() {
            Some(existing) if !existing.pump.is_finished() => {
                return Err(RecorderError::StateError(
                    "playback is already active".to_string(),
                ));
            }
            _ => {}
        }
        active.take();

        let path = self
            .last_recording
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| {
                RecorderError::PlaybackError("no recording available to play".to_string())
            })?;
        let duration_ms = clip_duration_ms(&path)?;

        self.player.play(path.clone())?;
        log::info!("Playback started: {:?} ({} ms)", path, duration_ms);

        let (emitter, stream) = PositionStream::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_pump = stop.clone();
        let emit_interval = Duration::from_millis(self.recording_config.position_interval_ms);

        let pump = thread::Builder::new()
            .name("metrorec-play-pump".to_string())
            .spawn(move || {
                let clock = SessionClock::new();
                loop {
                    thread::sleep(emit_interval);
                    if stop_pump.load(Ordering::SeqCst) {
                        return;
                    }
                    let position = clock.position_ms().min(duration_ms);
                    emitter.emit(PositionUpdate {
                        current_position_ms: position,
                        duration_ms,
                    });
                    if position >= duration_ms {
                        return;
                    }
                }
            })
            .map_err(|e| {
                RecorderError::PlaybackError(format!("Failed to spawn playback pump: {}", e))
            })?;

        *active = Some(ActivePlayback { stop, pump });
        Ok(stream)
    }

    fn stop_player(&self) -> Result<(), RecorderError> {
        let active = self
            .active_playback
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| RecorderError::StateError("no active playback".to_string()))?;

        self.player.stop();
        active.stop.store(true, Ordering::SeqCst);
        let _ = active.pump.join();
        log::info!("Playback stopped");
        Ok(())
    }
}

impl Drop for NativeTransport {
    fn drop(&mut self) {
        // Stop whatever is still live so worker threads exit
        if let Some(active) = self.active_recording.lock().unwrap().take() {
            active.stop.store(true, Ordering::SeqCst);
            let _ = active.worker.join();
        }
        if let Some(active) = self.active_playback.lock().unwrap().take() {
            self.player.stop();
            active.stop.store(true, Ordering::SeqCst);
            let _ = active.pump.join();
        }
    }
}
