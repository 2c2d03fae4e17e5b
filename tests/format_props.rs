//! Property-Based Tests for the display time formatter
//!
//! These tests verify invariants of the `MM:SS:CC` clock string using
//! proptest for input generation and shrinking.
//!
//! Run with: cargo test --test format_props

use proptest::prelude::*;

use metrorec::format_position;
use metrorec::timing::format_position_signed;

/// Numeric reading of a clock string, in centiseconds
fn numeric(clock: &str) -> u64 {
    let parts: Vec<u64> = clock.split(':').map(|p| p.parse().unwrap()).collect();
    assert_eq!(parts.len(), 3, "clock string must have three fields");
    parts[0] * 6000 + parts[1] * 100 + parts[2]
}

// ═══════════════════════════════════════════════════════════════════════════
// FORMATTER INVARIANTS
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// INVARIANT: Output is fixed-width for every non-negative input
    #[test]
    fn output_is_fixed_width(position in any::<u64>()) {
        let clock = format_position(position);
        prop_assert_eq!(clock.len(), 8, "clock string must be 8 chars: {}", clock);
        prop_assert_eq!(clock.as_bytes()[2], b':');
        prop_assert_eq!(clock.as_bytes()[5], b':');
    }

    /// INVARIANT: The numeric reading never decreases as input grows
    #[test]
    fn numeric_reading_is_monotone(a in any::<u64>(), b in any::<u64>()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            numeric(&format_position(lo)) <= numeric(&format_position(hi)),
            "formatter regressed: {} ms -> {}, {} ms -> {}",
            lo, format_position(lo), hi, format_position(hi)
        );
    }

    /// INVARIANT: Below the display ceiling the string round-trips the
    /// position at centisecond resolution
    #[test]
    fn round_trips_below_ceiling(position in 0u64..(100 * 60 * 1000)) {
        let clock = format_position(position);
        prop_assert_eq!(numeric(&clock), position / 10);
    }

    /// INVARIANT: Every second field stays in range
    #[test]
    fn fields_stay_in_range(position in any::<u64>()) {
        let clock = format_position(position);
        let parts: Vec<u64> = clock.split(':').map(|p| p.parse().unwrap()).collect();
        prop_assert!(parts[0] <= 99);
        prop_assert!(parts[1] <= 59);
        prop_assert!(parts[2] <= 99);
    }

    /// INVARIANT: Negative input clamps to the zero clock
    #[test]
    fn negative_clamps_to_zero(position in i64::MIN..0) {
        prop_assert_eq!(format_position_signed(position), "00:00:00");
    }

    /// INVARIANT: Signed and unsigned entry points agree on valid input
    #[test]
    fn signed_agrees_with_unsigned(position in 0i64..i64::MAX) {
        prop_assert_eq!(
            format_position_signed(position),
            format_position(position as u64)
        );
    }
}

#[test]
fn zero_is_the_initial_display_string() {
    assert_eq!(format_position(0), metrorec::types::ZERO_CLOCK);
}
