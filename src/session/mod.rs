//! The recording/playback session: the audio capability behind the screen
//!
//! [`Transport`] is the injectable form of the session. The screen
//! controller holds it as `Arc<dyn Transport>`, so the production
//! [`NativeTransport`] and the test mock are interchangeable.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::errors::RecorderError;
use crate::types::PositionUpdate;

mod player;
mod recorder;
mod transport;

pub use player::{clip_duration_ms, ClipPlayer};
pub use recorder::{RecordingStats, WavRecorder};
pub use transport::NativeTransport;

/// Subscription handle for position events of one active operation.
///
/// Registration and removal are paired 1:1 with the operation: the stream
/// is created by `start_*`, and dropping it (or stopping the operation)
/// detaches the listener, so nothing updates state after the session ends.
pub struct PositionStream {
    receiver: mpsc::UnboundedReceiver<PositionUpdate>,
    detached: Arc<AtomicBool>,
}

impl PositionStream {
    /// Create a connected emitter/stream pair
    pub fn channel() -> (PositionEmitter, PositionStream) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let detached = Arc::new(AtomicBool::new(false));
        (
            PositionEmitter {
                sender,
                detached: detached.clone(),
            },
            PositionStream { receiver, detached },
        )
    }

    /// Receive the next position event; `None` once the operation stopped
    pub async fn recv(&mut self) -> Option<PositionUpdate> {
        self.receiver.recv().await
    }

    /// Non-blocking read, for pull-style consumers
    pub fn try_recv(&mut self) -> Option<PositionUpdate> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for PositionStream {
    fn drop(&mut self) {
        self.detached.store(true, Ordering::SeqCst);
    }
}

/// Sending half of a position subscription, held by the operation's pump
pub struct PositionEmitter {
    sender: mpsc::UnboundedSender<PositionUpdate>,
    detached: Arc<AtomicBool>,
}

impl PositionEmitter {
    /// Emit one position event. Returns false once the listener is gone,
    /// so pumps can stop producing.
    pub fn emit(&self, update: PositionUpdate) -> bool {
        if self.detached.load(Ordering::SeqCst) {
            return false;
        }
        self.sender.send(update).is_ok()
    }
}

/// The audio session the screen records and plays through.
///
/// Every operation may fail; callers log the failure and treat the
/// operation as a no-op (no retry, no compensation).
pub trait Transport: Send + Sync {
    /// Begin capturing to a new recording; returns the position subscription
    fn start_recorder(&self) -> Result<PositionStream, RecorderError>;

    /// Stop capturing, finalize the recording, and return its stats
    fn stop_recorder(&self) -> Result<RecordingStats, RecorderError>;

    /// Play the last finalized recording
    fn start_player(&self) -> Result<PositionStream, RecorderError>;

    /// Stop playback
    fn stop_player(&self) -> Result<(), RecorderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_position_stream_delivers_updates() {
        let (emitter, mut stream) = PositionStream::channel();
        let update = PositionUpdate {
            current_position_ms: 250,
            duration_ms: 1000,
        };
        assert!(emitter.emit(update));
        assert_eq!(stream.recv().await, Some(update));
    }

    #[tokio::test]
    async fn test_dropped_stream_detaches_emitter() {
        let (emitter, stream) = PositionStream::channel();
        drop(stream);
        let update = PositionUpdate {
            current_position_ms: 0,
            duration_ms: 0,
        };
        assert!(!emitter.emit(update));
    }
}
