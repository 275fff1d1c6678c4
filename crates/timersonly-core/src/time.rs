//! Duration conversion and display helpers.

/// Convert a (possibly fractional) minute count into whole seconds.
///
/// Rounds to the nearest second and floors at zero, so callers never feed
/// a negative duration into the engine.
pub fn minutes_to_seconds(minutes: f64) -> f64 {
    if !minutes.is_finite() {
        return 0.0;
    }
    (minutes * 60.0).round().max(0.0)
}

/// Render seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_seconds(total_seconds: f64) -> String {
    let clamped = if total_seconds.is_finite() {
        total_seconds.max(0.0).floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", clamped / 60, clamped % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_round_to_whole_seconds() {
        assert_eq!(minutes_to_seconds(25.0), 1500.0);
        assert_eq!(minutes_to_seconds(1.5), 90.0);
        assert_eq!(minutes_to_seconds(0.01), 1.0);
    }

    #[test]
    fn negative_and_nan_minutes_floor_at_zero() {
        assert_eq!(minutes_to_seconds(-3.0), 0.0);
        assert_eq!(minutes_to_seconds(f64::NAN), 0.0);
    }

    #[test]
    fn format_pads_and_truncates() {
        assert_eq!(format_seconds(0.0), "00:00");
        assert_eq!(format_seconds(59.9), "00:59");
        assert_eq!(format_seconds(1500.0), "25:00");
        assert_eq!(format_seconds(7200.0), "120:00");
        assert_eq!(format_seconds(-4.0), "00:00");
    }
}
