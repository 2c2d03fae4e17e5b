//! Count-in state machine and its periodic driver
//!
//! The state machine itself is pure and unit-testable; `Countdown` owns the
//! tokio task that ticks it against wall-clock time and reports transitions
//! through [`CountdownHooks`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::assert_invariant;
use crate::errors::RecorderError;

/// Count-in state: idle, or counting down from the configured start value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Inactive,
    Counting(u32),
}

impl CountdownState {
    /// Begin a count-in. Only valid from `Inactive`.
    pub fn begin(self, start_value: u32) -> Result<CountdownState, RecorderError> {
        match self {
            CountdownState::Inactive => Ok(CountdownState::Counting(start_value)),
            CountdownState::Counting(n) => Err(RecorderError::StateError(format!(
                "count-in already running ({} remaining)",
                n
            ))),
        }
    }

    /// Advance one tick. Returns the next state and whether this tick
    /// completed the count-in (fires from `Counting(0)` only).
    pub fn tick(self) -> (CountdownState, bool) {
        match self {
            CountdownState::Inactive => (CountdownState::Inactive, false),
            CountdownState::Counting(0) => (CountdownState::Inactive, true),
            CountdownState::Counting(n) => (CountdownState::Counting(n - 1), false),
        }
    }

    pub fn remaining(&self) -> Option<u32> {
        match self {
            CountdownState::Inactive => None,
            CountdownState::Counting(n) => Some(*n),
        }
    }

    pub fn is_counting(&self) -> bool {
        matches!(self, CountdownState::Counting(_))
    }
}

/// Transition callbacks for a driven count-in.
///
/// `on_complete` is invoked exactly once per started count-in, after which
/// the machine is `Inactive` again. A cancelled count-in never completes.
pub trait CountdownHooks: Send + Sync {
    /// The count-in was armed with `remaining` ticks to go
    fn on_started(&self, _remaining: u32) {}
    /// A decrementing tick fired
    fn on_tick(&self, _remaining: u32) {}
    /// The count-in ran to completion
    fn on_complete(&self);
}

/// Periodic driver for [`CountdownState`].
///
/// Each started count-in belongs to a generation; cancelling (or starting a
/// new count-in) bumps the generation so a stale task can never tick or
/// complete against the current one.
pub struct Countdown {
    state: Arc<Mutex<CountdownState>>,
    generation: Arc<AtomicU64>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(CountdownState::Inactive)),
            generation: Arc::new(AtomicU64::new(0)),
            task: Mutex::new(None),
        }
    }

    pub fn state(&self) -> CountdownState {
        *self.state.lock().unwrap()
    }

    pub fn is_counting(&self) -> bool {
        self.state().is_counting()
    }

    /// Arm the count-in and start ticking.
    ///
    /// Must be called from within a tokio runtime. Fails with a state error
    /// if a count-in is already running.
    pub fn start(
        &self,
        start_value: u32,
        period: Duration,
        hooks: Arc<dyn CountdownHooks>,
    ) -> Result<(), RecorderError> {
        assert_invariant!(
            period > Duration::ZERO,
            "countdown tick period must be positive"
        );

        {
            let mut state = self.state.lock().unwrap();
            *state = state.begin(start_value)?;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        hooks.on_started(start_value);
        log::info!("count-in armed: {} ticks at {:?}", start_value, period);

        let state = self.state.clone();
        let generation_ref = self.generation.clone();
        let task = tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                if generation_ref.load(Ordering::SeqCst) != generation {
                    return;
                }

                let (next, completed) = {
                    let mut guard = state.lock().unwrap();
                    let (next, completed) = guard.tick();
                    *guard = next;
                    (next, completed)
                };
                assert_invariant!(
                    next.remaining().map_or(true, |r| r < start_value.max(1)),
                    "countdown remaining stays below the start value"
                );

                if completed {
                    hooks.on_complete();
                    return;
                }
                if let Some(remaining) = next.remaining() {
                    hooks.on_tick(remaining);
                }
            }
        });
        *self.task.lock().unwrap() = Some(task);
        Ok(())
    }

    /// Cancel a running count-in. Idempotent; safe to call when inactive.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.task.lock().unwrap().take() {
            task.abort();
        }
        let mut state = self.state.lock().unwrap();
        if state.is_counting() {
            log::info!("count-in cancelled at {:?}", state.remaining());
            *state = CountdownState::Inactive;
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_only_from_inactive() {
        let state = CountdownState::Inactive;
        let counting = state.begin(8).unwrap();
        assert_eq!(counting, CountdownState::Counting(8));
        assert!(counting.begin(8).is_err());
    }

    #[test]
    fn test_tick_decrements_then_completes() {
        let mut state = CountdownState::Counting(2);
        let (next, completed) = state.tick();
        assert_eq!(next, CountdownState::Counting(1));
        assert!(!completed);
        state = next;

        let (next, completed) = state.tick();
        assert_eq!(next, CountdownState::Counting(0));
        assert!(!completed);
        state = next;

        let (next, completed) = state.tick();
        assert_eq!(next, CountdownState::Inactive);
        assert!(completed);
    }

    #[test]
    fn test_tick_on_inactive_is_inert() {
        let (next, completed) = CountdownState::Inactive.tick();
        assert_eq!(next, CountdownState::Inactive);
        assert!(!completed);
    }

    #[test]
    fn test_inactive_reached_after_n_plus_one_ticks() {
        // N0 decrementing ticks plus the completion transition
        let n0 = 8u32;
        let mut state = CountdownState::Inactive.begin(n0).unwrap();
        let mut ticks = 0u32;
        loop {
            let (next, completed) = state.tick();
            state = next;
            ticks += 1;
            if completed {
                break;
            }
        }
        assert_eq!(ticks, n0 + 1);
        assert_eq!(state, CountdownState::Inactive);
    }
}
