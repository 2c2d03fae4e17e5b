//! Fixed-period metronome driver
//!
//! Owns the one repeating task in the system whose leak would outlive a
//! recording: the tick task is scoped to this handle, stopped explicitly on
//! every path that ends the count-in or the recording, and stopped again
//! (idempotently) on drop.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::assert_invariant;

/// Consumer of metronome ticks. The production sink plays the click sound;
/// tests inject counters.
pub trait TickSink: Send + Sync {
    fn click(&self);
}

/// Repeating tick driver at a fixed period
pub struct Metronome {
    sink: Arc<dyn TickSink>,
    period: Duration,
    running: Arc<AtomicBool>,
    ticks: Arc<AtomicU64>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Metronome {
    pub fn new(period: Duration, sink: Arc<dyn TickSink>) -> Self {
        assert_invariant!(
            period > Duration::ZERO,
            "metronome period must be positive"
        );
        Self {
            sink,
            period,
            running: Arc::new(AtomicBool::new(false)),
            ticks: Arc::new(AtomicU64::new(0)),
            task: Mutex::new(None),
        }
    }

    /// Build a metronome from a beats-per-minute tempo (120 BPM -> 500 ms)
    pub fn from_bpm(bpm: u32, sink: Arc<dyn TickSink>) -> Self {
        let bpm = bpm.max(1);
        Self::new(Duration::from_millis(60_000 / bpm as u64), sink)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start ticking. No-op if already running; the first click fires
    /// immediately, then once per period. Must be called from within a
    /// tokio runtime.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        log::info!("metronome started at {:?} period", self.period);

        let sink = self.sink.clone();
        let running = self.running.clone();
        let ticks = self.ticks.clone();
        let period = self.period;
        let task = tokio::spawn(async move {
            while running.load(Ordering::SeqCst) {
                sink.click();
                ticks.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(period).await;
            }
        });
        *self.task.lock().unwrap() = Some(task);
    }

    /// Stop ticking. Idempotent: safe on an unstarted or already-stopped
    /// metronome. No tick fires after this returns.
    pub fn stop(&self) {
        let was_running = self.running.swap(false, Ordering::SeqCst);
        if let Some(task) = self.task.lock().unwrap().take() {
            task.abort();
        }
        if was_running {
            log::info!("metronome stopped after {} ticks", self.tick_count());
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Total ticks fired since construction
    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }
}

impl Drop for Metronome {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Counter(AtomicUsize);

    impl TickSink for Counter {
        fn click(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_from_bpm_period() {
        let sink = Arc::new(Counter(AtomicUsize::new(0)));
        let metronome = Metronome::from_bpm(120, sink);
        assert_eq!(metronome.period(), Duration::from_millis(500));
    }

    #[test]
    fn test_stop_before_start_is_noop() {
        let sink = Arc::new(Counter(AtomicUsize::new(0)));
        let metronome = Metronome::from_bpm(120, sink);
        metronome.stop();
        metronome.stop();
        assert!(!metronome.is_running());
        assert_eq!(metronome.tick_count(), 0);
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let sink = Arc::new(Counter(AtomicUsize::new(0)));
        let metronome = Metronome::new(Duration::from_millis(10), sink);
        metronome.start();
        metronome.start();
        assert!(metronome.is_running());
        metronome.stop();
        assert!(!metronome.is_running());
    }
}
