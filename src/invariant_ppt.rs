//! Runtime invariant checking with contract-test support
//!
//! Production code asserts its invariants through [`assert_invariant!`];
//! every checked invariant is logged per thread so contract tests can
//! verify that exercising a code path actually enforced the contracts it
//! claims.
//!
//! ```rust,ignore
//! use metrorec::assert_invariant;
//!
//! assert_invariant!(period > Duration::ZERO, "metronome period must be positive");
//!
//! #[test]
//! fn contract_metronome() {
//!     // ... drive the metronome ...
//!     metrorec::invariant_ppt::contract_test("metronome", &[
//!         "metronome period must be positive",
//!     ]);
//! }
//! ```

use std::cell::RefCell;
use std::collections::HashSet;
use std::thread_local;

thread_local! {
    static INVARIANT_LOG: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

/// Assert an invariant and record that it was checked.
///
/// # Panics
/// Panics if the condition is false.
#[macro_export]
macro_rules! assert_invariant {
    ($condition:expr, $message:expr) => {
        $crate::invariant_ppt::__assert_invariant_impl($condition, $message)
    };
}

/// Internal implementation - do not call directly
#[doc(hidden)]
pub fn __assert_invariant_impl(condition: bool, message: &str) {
    INVARIANT_LOG.with(|log| {
        log.borrow_mut().insert(message.to_string());
    });

    if !condition {
        panic!("INVARIANT VIOLATION: {}", message);
    }
}

/// Check that specific invariants were verified on this thread.
///
/// # Panics
/// Panics if any required invariant was not checked.
pub fn contract_test(test_name: &str, required_invariants: &[&str]) {
    let log = INVARIANT_LOG.with(|log| log.borrow().clone());

    let missing: Vec<&str> = required_invariants
        .iter()
        .filter(|invariant| !log.contains(**invariant))
        .copied()
        .collect();

    if !missing.is_empty() {
        panic!(
            "CONTRACT FAILURE [{}]: The following invariants were not checked:\n  - {}",
            test_name,
            missing.join("\n  - ")
        );
    }
}

/// Invariants checked so far on this thread
pub fn invariants_checked() -> HashSet<String> {
    INVARIANT_LOG.with(|log| log.borrow().clone())
}

/// Clear the invariant log (call between test runs if needed)
pub fn clear_invariant_log() {
    INVARIANT_LOG.with(|log| {
        log.borrow_mut().clear();
    });
}
