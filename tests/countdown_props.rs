//! Property-Based Tests for the count-in state machine and its driver
//!
//! Run with: cargo test --test countdown_props

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use proptest::prelude::*;

use metrorec::timing::{Countdown, CountdownHooks, CountdownState};

// ═══════════════════════════════════════════════════════════════════════════
// PURE STATE MACHINE INVARIANTS
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// INVARIANT: k ticks into a count-in from n, the remainder is n - k
    #[test]
    fn remaining_tracks_ticks(n in 1u32..64, k in 0u32..64) {
        let k = k.min(n);
        let mut state = CountdownState::Inactive.begin(n).unwrap();
        for _ in 0..k {
            let (next, completed) = state.tick();
            prop_assert!(!completed);
            state = next;
        }
        prop_assert_eq!(state.remaining(), Some(n - k));
    }

    /// INVARIANT: A count-in from n completes after exactly n + 1 ticks
    /// (n decrementing ticks plus the completion transition)
    #[test]
    fn completes_after_n_plus_one_ticks(n in 0u32..64) {
        let mut state = CountdownState::Inactive.begin(n).unwrap();
        let mut ticks = 0u32;
        let mut completions = 0u32;
        while state.is_counting() {
            let (next, completed) = state.tick();
            ticks += 1;
            if completed {
                completions += 1;
            }
            state = next;
        }
        prop_assert_eq!(ticks, n + 1);
        prop_assert_eq!(completions, 1);
        prop_assert_eq!(state, CountdownState::Inactive);
    }

    /// INVARIANT: begin is rejected while counting
    #[test]
    fn begin_rejected_while_counting(n in 0u32..64, m in 0u32..64) {
        let state = CountdownState::Inactive.begin(n).unwrap();
        prop_assert!(state.begin(m).is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// DRIVER BEHAVIOR
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct RecordingHooks {
    started: AtomicUsize,
    ticks: Mutex<Vec<u32>>,
    completions: AtomicUsize,
}

impl CountdownHooks for RecordingHooks {
    fn on_started(&self, _remaining: u32) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_tick(&self, remaining: u32) {
        self.ticks.lock().unwrap().push(remaining);
    }

    fn on_complete(&self) {
        self.completions.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn driver_runs_count_in_to_completion() {
    let countdown = Countdown::new();
    let hooks = Arc::new(RecordingHooks::default());

    countdown
        .start(8, Duration::from_millis(10), hooks.clone())
        .expect("count-in should arm from inactive");
    assert!(countdown.is_counting());

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(hooks.started.load(Ordering::SeqCst), 1);
    assert_eq!(hooks.completions.load(Ordering::SeqCst), 1);
    assert_eq!(countdown.state(), CountdownState::Inactive);

    // Decrementing ticks report 7, 6, ..., 0
    let ticks = hooks.ticks.lock().unwrap().clone();
    assert_eq!(ticks, vec![7, 6, 5, 4, 3, 2, 1, 0]);
}

#[tokio::test]
async fn driver_rejects_start_while_counting() {
    let countdown = Countdown::new();
    let hooks = Arc::new(RecordingHooks::default());

    countdown
        .start(8, Duration::from_millis(50), hooks.clone())
        .unwrap();
    assert!(countdown
        .start(8, Duration::from_millis(50), hooks.clone())
        .is_err());

    countdown.cancel();
}

#[tokio::test]
async fn cancelled_count_in_never_completes() {
    let countdown = Countdown::new();
    let hooks = Arc::new(RecordingHooks::default());

    countdown
        .start(8, Duration::from_millis(20), hooks.clone())
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    countdown.cancel();
    assert_eq!(countdown.state(), CountdownState::Inactive);

    // Give a stale task every chance to misfire
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(hooks.completions.load(Ordering::SeqCst), 0);

    // Cancel is idempotent and a new count-in can start
    countdown.cancel();
    countdown
        .start(3, Duration::from_millis(10), hooks.clone())
        .expect("restart after cancel");
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(hooks.completions.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn contract_countdown_driver() {
    let countdown = Countdown::new();
    let hooks = Arc::new(RecordingHooks::default());
    countdown
        .start(1, Duration::from_millis(10), hooks)
        .unwrap();
    countdown.cancel();

    metrorec::invariant_ppt::contract_test(
        "countdown driver",
        &["countdown tick period must be positive"],
    );
}
