//! The recorder screen controller
//!
//! Owns the injected session transport, the metronome, the count-in driver,
//! and the display strings the frontend renders. Recording is armed through
//! the count-in: the metronome starts when the countdown starts, the
//! session's recorder starts when it completes, and the metronome stops when
//! the recording stops.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::audio::ClickSound;
use crate::config::{MetronomeConfig, MetrorecConfig};
use crate::errors::RecorderError;
use crate::permissions::{Capability, CapabilityGrant, PermissionStatus};
use crate::session::{PositionStream, Transport};
use crate::timing::{format_position, Countdown, CountdownHooks, Metronome, TickSink};
use crate::types::{DisplayState, ZERO_CLOCK};

pub struct RecorderScreen {
    transport: Arc<dyn Transport>,
    metronome: Arc<Metronome>,
    countdown: Countdown,
    display: Arc<RwLock<DisplayState>>,
    recording: Arc<AtomicBool>,
    playing: Arc<AtomicBool>,
    permission_granted: AtomicBool,
    config: MetrorecConfig,
}

/// Count-in hooks that arm the recorder on completion
struct ArmRecording {
    transport: Arc<dyn Transport>,
    metronome: Arc<Metronome>,
    display: Arc<RwLock<DisplayState>>,
    recording: Arc<AtomicBool>,
}

impl CountdownHooks for ArmRecording {
    fn on_started(&self, remaining: u32) {
        self.display.write().unwrap().countdown = Some(remaining);
    }

    fn on_tick(&self, remaining: u32) {
        self.display.write().unwrap().countdown = Some(remaining);
    }

    fn on_complete(&self) {
        self.display.write().unwrap().countdown = None;

        match self.transport.start_recorder() {
            Ok(stream) => {
                self.recording.store(true, Ordering::SeqCst);
                self.display.write().unwrap().is_recording = true;
                spawn_record_pump(stream, self.display.clone());
            }
            Err(e) => {
                // Fire and forget: log, drop the metronome handle, stay idle
                log::error!("Failed to start recorder after count-in: {}", e);
                self.metronome.stop();
            }
        }
    }
}

fn spawn_record_pump(mut stream: PositionStream, display: Arc<RwLock<DisplayState>>) {
    tokio::spawn(async move {
        while let Some(update) = stream.recv().await {
            display.write().unwrap().record_time = format_position(update.current_position_ms);
        }
    });
}

fn spawn_play_pump(
    mut stream: PositionStream,
    display: Arc<RwLock<DisplayState>>,
    playing: Arc<AtomicBool>,
) {
    tokio::spawn(async move {
        while let Some(update) = stream.recv().await {
            let mut display = display.write().unwrap();
            display.play_time = format_position(update.current_position_ms);
            display.duration = format_position(update.duration_ms);
        }
        // Emitter gone: the clip ended or playback was stopped
        playing.store(false, Ordering::SeqCst);
        display.write().unwrap().is_playing = false;
    });
}

fn build_click(config: &MetronomeConfig) -> ClickSound {
    if !config.enabled {
        return ClickSound::inert();
    }
    let result = match &config.click_path {
        Some(path) => ClickSound::load(Path::new(path), config.volume),
        None => ClickSound::synth(config.volume),
    };
    result.unwrap_or_else(|e| {
        log::error!("Click asset unavailable, metronome will be silent: {}", e);
        ClickSound::inert()
    })
}

impl RecorderScreen {
    /// Build a screen over the given session transport
    pub fn new(transport: Arc<dyn Transport>, config: MetrorecConfig) -> Self {
        let click: Arc<dyn TickSink> = Arc::new(build_click(&config.metronome));
        Self::with_tick_sink(transport, click, config)
    }

    /// Build a screen with an explicit metronome sink (used by tests to
    /// observe ticks without audio hardware)
    pub fn with_tick_sink(
        transport: Arc<dyn Transport>,
        sink: Arc<dyn TickSink>,
        config: MetrorecConfig,
    ) -> Self {
        Self {
            transport,
            metronome: Arc::new(Metronome::from_bpm(config.metronome.bpm, sink)),
            countdown: Countdown::new(),
            display: Arc::new(RwLock::new(DisplayState::default())),
            recording: Arc::new(AtomicBool::new(false)),
            playing: Arc::new(AtomicBool::new(false)),
            permission_granted: AtomicBool::new(false),
            config,
        }
    }

    /// Record the outcome of a permission sweep. Recording stays blocked
    /// until the record-audio capability is granted.
    pub fn apply_grants(&self, grants: &[CapabilityGrant]) {
        let granted = grants.iter().any(|grant| {
            grant.capability == Capability::RecordAudio
                && grant.info.status == PermissionStatus::Granted
        });
        self.set_permission(granted);
    }

    pub fn set_permission(&self, granted: bool) {
        self.permission_granted.store(granted, Ordering::SeqCst);
    }

    pub fn permission_granted(&self) -> bool {
        self.permission_granted.load(Ordering::SeqCst)
    }

    pub fn metronome(&self) -> &Metronome {
        &self.metronome
    }

    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    pub fn is_counting_down(&self) -> bool {
        self.countdown.is_counting()
    }

    /// Arm a recording: start the metronome and the count-in; the session's
    /// recorder starts when the count-in completes.
    pub fn start_recording(&self) -> Result<(), RecorderError> {
        if !self.permission_granted() {
            return Err(RecorderError::PermissionDenied(
                "record-audio permission has not been granted".to_string(),
            ));
        }
        if self.recording.load(Ordering::SeqCst) || self.countdown.is_counting() {
            return Err(RecorderError::StateError(
                "a recording or count-in is already active".to_string(),
            ));
        }

        // Never two live handles: stop any stale metronome before re-arming
        self.metronome.stop();
        if self.config.metronome.enabled {
            self.metronome.start();
        }

        let hooks = Arc::new(ArmRecording {
            transport: self.transport.clone(),
            metronome: self.metronome.clone(),
            display: self.display.clone(),
            recording: self.recording.clone(),
        });
        if let Err(e) = self.countdown.start(
            self.config.countdown.start_value,
            Duration::from_millis(self.config.countdown.tick_ms),
            hooks,
        ) {
            self.metronome.stop();
            return Err(e);
        }
        Ok(())
    }

    /// Stop the recording, or cancel a count-in still in progress.
    ///
    /// During the count-in no recording is active, so the session is left
    /// untouched: both timers are cancelled and that is all. Session
    /// failures on the stop path are logged and swallowed.
    pub fn stop_recording(&self) {
        if self.countdown.is_counting() {
            self.countdown.cancel();
            self.metronome.stop();
            self.display.write().unwrap().countdown = None;
            if !self.recording.load(Ordering::SeqCst) {
                return;
            }
            // Completion won the race against the cancel; fall through and
            // stop the recorder it started.
        }

        let was_recording = self.recording.swap(false, Ordering::SeqCst);
        match self.transport.stop_recorder() {
            Ok(stats) => log::info!("Recording finished: {}", stats.output_path),
            Err(e) => {
                if was_recording {
                    log::error!("Failed to stop recorder: {}", e);
                } else {
                    log::debug!("Stop with no active recording: {}", e);
                }
            }
        }
        self.metronome.stop();

        let mut display = self.display.write().unwrap();
        display.is_recording = false;
        display.record_time = ZERO_CLOCK.to_string();
    }

    /// Play back the last recording
    pub fn start_playing(&self) -> Result<(), RecorderError> {
        match self.transport.start_player() {
            Ok(stream) => {
                self.playing.store(true, Ordering::SeqCst);
                self.display.write().unwrap().is_playing = true;
                spawn_play_pump(stream, self.display.clone(), self.playing.clone());
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to start player: {}", e);
                Err(e)
            }
        }
    }

    /// Stop playback and reset the play-side display
    pub fn stop_playing(&self) {
        self.playing.store(false, Ordering::SeqCst);
        if let Err(e) = self.transport.stop_player() {
            log::debug!("Stop with no active playback: {}", e);
        }

        let mut display = self.display.write().unwrap();
        display.is_playing = false;
        display.play_time = ZERO_CLOCK.to_string();
        display.duration = ZERO_CLOCK.to_string();
    }

    /// Snapshot of the display state
    pub fn display(&self) -> DisplayState {
        let mut snapshot = self.display.read().unwrap().clone();
        snapshot.is_recording = self.recording.load(Ordering::SeqCst);
        snapshot.is_playing = self.playing.load(Ordering::SeqCst);
        snapshot.countdown = self.countdown.state().remaining();
        snapshot
    }

    /// Tear down everything live: count-in, metronome, recording, playback.
    /// Idempotent; also invoked on drop.
    pub fn release(&self) {
        self.countdown.cancel();
        self.metronome.stop();
        if self.recording.swap(false, Ordering::SeqCst) {
            if let Err(e) = self.transport.stop_recorder() {
                log::warn!("Failed to stop recorder on release: {}", e);
            }
        }
        if self.playing.swap(false, Ordering::SeqCst) {
            if let Err(e) = self.transport.stop_player() {
                log::warn!("Failed to stop player on release: {}", e);
            }
        }
        *self.display.write().unwrap() = DisplayState::default();
    }
}

impl Drop for RecorderScreen {
    fn drop(&mut self) {
        self.release();
    }
}
