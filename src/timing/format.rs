//! Fixed-width clock strings for the recorder display

/// Positions at or beyond this render as the saturated display value.
/// 100 minutes in milliseconds.
const DISPLAY_CEILING_MS: u64 = 100 * 60 * 1000;

/// Render a millisecond position as the `MM:SS:CC` clock string shown on
/// the recorder screen (minutes, seconds, centiseconds).
///
/// Total for all inputs: positions past 99:59:99 saturate so the output
/// stays fixed-width, and the numeric reading of the string is
/// non-decreasing in the input.
pub fn format_position(position_ms: u64) -> String {
    if position_ms >= DISPLAY_CEILING_MS {
        return "99:59:99".to_string();
    }
    let centis = position_ms / 10;
    let minutes = centis / 6000;
    let seconds = (centis / 100) % 60;
    let centis = centis % 100;
    format!("{:02}:{:02}:{:02}", minutes, seconds, centis)
}

/// Signed entry point. Negative positions are a precondition violation
/// and clamp to zero.
pub fn format_position_signed(position_ms: i64) -> String {
    format_position(position_ms.max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ZERO_CLOCK;

    #[test]
    fn test_zero_renders_zero_clock() {
        assert_eq!(format_position(0), ZERO_CLOCK);
    }

    #[test]
    fn test_component_breakdown() {
        // 1 minute, 23 seconds, 450 ms
        assert_eq!(format_position(83_450), "01:23:45");
        assert_eq!(format_position(999), "00:00:99");
        assert_eq!(format_position(1_000), "00:01:00");
        assert_eq!(format_position(60_000), "01:00:00");
    }

    #[test]
    fn test_sub_centisecond_truncates() {
        assert_eq!(format_position(9), ZERO_CLOCK);
        assert_eq!(format_position(10), "00:00:01");
    }

    #[test]
    fn test_saturates_at_display_ceiling() {
        assert_eq!(format_position(DISPLAY_CEILING_MS - 10), "99:59:99");
        assert_eq!(format_position(DISPLAY_CEILING_MS), "99:59:99");
        assert_eq!(format_position(u64::MAX), "99:59:99");
    }

    #[test]
    fn test_negative_clamps_to_zero() {
        assert_eq!(format_position_signed(-1), ZERO_CLOCK);
        assert_eq!(format_position_signed(i64::MIN), ZERO_CLOCK);
        assert_eq!(format_position_signed(83_450), "01:23:45");
    }
}
