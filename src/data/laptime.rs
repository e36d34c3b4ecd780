use std::sync::LazyLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Lap-time parsing: "MM:SS.SSS" / "SS.SSS" → seconds
// ---------------------------------------------------------------------------

/// Either `minutes:SS[.fff]` (at most two seconds digits after the colon)
/// or bare seconds `S[.fff]` of any width.
static LAP_TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([0-9]+):([0-9]{1,2}(?:\.[0-9]+)?)|([0-9]+(?:\.[0-9]+)?))$")
        .expect("Invalid lap-time regex")
});

/// Convert a lap-time token into seconds.
///
/// Accepted shapes (surrounding whitespace ignored):
/// * `MM:SS.SSS` → `minutes * 60 + seconds`
/// * `SS.SSS`    → `seconds`
///
/// Returns `None` for absent, blank or malformed tokens. Two-digit seconds
/// are not range-checked, so `"1:75.0"` yields `135.0`.
pub fn parse_lap_time(token: Option<&str>) -> Option<f64> {
    let s = token?.trim();
    if s.is_empty() {
        return None;
    }

    let caps = LAP_TIME_REGEX.captures(s)?;
    let minutes = match caps.get(1) {
        Some(m) => m.as_str().parse::<f64>().ok()?,
        None => 0.0,
    };
    let seconds = caps
        .get(2)
        .or_else(|| caps.get(3))?
        .as_str()
        .parse::<f64>()
        .ok()?;

    let total = minutes * 60.0 + seconds;
    total.is_finite().then_some(total)
}

// ---------------------------------------------------------------------------
// Display formatting: seconds → "MM:SS.SSS"
// ---------------------------------------------------------------------------

/// Render seconds as a zero-padded `MM:SS.SSS` duration.
/// Non-finite input (a missing lap time) renders as an empty string.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() {
        return String::new();
    }
    let minutes = (seconds / 60.0).floor() as i64;
    let rem = seconds.rem_euclid(60.0);
    format!("{minutes:02}:{rem:06.3}")
}

/// Convenience for an optional lap time: `None` renders as an empty string.
pub fn format_lap_time(lap_time: Option<f64>) -> String {
    lap_time
        .map(format_duration)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn minutes_and_seconds() {
        let v = parse_lap_time(Some("1:23.456")).unwrap();
        assert!(close(v, 83.456));
        let v = parse_lap_time(Some("01:39.289")).unwrap();
        assert!(close(v, 99.289));
    }

    #[test]
    fn seconds_only() {
        assert_eq!(parse_lap_time(Some("45.2")), Some(45.2));
        assert_eq!(parse_lap_time(Some("58")), Some(58.0));
        assert_eq!(parse_lap_time(Some("125.75")), Some(125.75));
    }

    #[test]
    fn seconds_over_sixty_are_not_carried() {
        let v = parse_lap_time(Some("1:75.0")).unwrap();
        assert!(close(v, 135.0));
    }

    #[test]
    fn missing_inputs() {
        for token in [
            "", "   ", "DNF", "::", ":", "1:", ":30.0", "-12.0", "1:2:3.0", "1:23.4x", "45.",
            ".5", "1,23.4", "+12.0", "1 :23.4", "1:125.3", "2:345", "0:0099.0",
        ] {
            assert_eq!(parse_lap_time(Some(token)), None, "token {token:?}");
        }
        assert_eq!(parse_lap_time(None), None);
    }

    #[test]
    fn seconds_after_a_colon_are_at_most_two_digits() {
        assert_eq!(parse_lap_time(Some("1:125.3")), None);
        assert_eq!(parse_lap_time(Some("2:345")), None);
        assert!(close(parse_lap_time(Some("2:05")).unwrap(), 125.0));
        assert!(close(parse_lap_time(Some("0:9.5")).unwrap(), 9.5));
        // Without a colon any width is fine.
        assert_eq!(parse_lap_time(Some("125.300")), Some(125.3));
    }

    #[test]
    fn minutes_wider_than_u64_still_parse() {
        let minutes = "99999999999999999999999";
        let v = parse_lap_time(Some(&format!("{minutes}:00.0"))).unwrap();
        assert!(v.is_finite());
        assert!(close(v / 60.0 / 1e22, minutes.parse::<f64>().unwrap() / 1e22));
    }

    #[test]
    fn zero_is_a_valid_time() {
        assert_eq!(parse_lap_time(Some("0")), Some(0.0));
        assert_eq!(parse_lap_time(Some("0:00.000")), Some(0.0));
    }

    #[test]
    fn whitespace_padding_is_ignored() {
        assert_eq!(
            parse_lap_time(Some("  1:23.456  ")),
            parse_lap_time(Some("1:23.456"))
        );
        assert_eq!(parse_lap_time(Some("\t45.2\n")), Some(45.2));
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(99.289), "01:39.289");
        assert_eq!(format_duration(83.456), "01:23.456");
        assert_eq!(format_duration(5.0), "00:05.000");
        assert_eq!(format_duration(f64::NAN), "");
        assert_eq!(format_lap_time(None), "");
        assert_eq!(format_lap_time(Some(61.5)), "01:01.500");
    }

    #[test]
    fn formatted_duration_parses_back() {
        let v = parse_lap_time(Some(&format_duration(99.289)));
        assert!(close(v.unwrap(), 99.289));
    }

    proptest! {
        #[test]
        fn minute_form_matches_arithmetic(minutes in 0u32..100, millis in 0u32..60_000) {
            let seconds = millis as f64 / 1000.0;
            let token = format!("{minutes}:{seconds:06.3}");
            let parsed = parse_lap_time(Some(&token)).unwrap();
            prop_assert!((parsed - (minutes as f64 * 60.0 + seconds)).abs() < 1e-9);
        }

        #[test]
        fn reparsing_formatted_seconds_is_idempotent(millis in 0u64..10_000_000) {
            let value = millis as f64 / 1000.0;
            let token = format!("{value:.3}");
            prop_assert_eq!(parse_lap_time(Some(&token)), Some(value));
        }

        #[test]
        fn padding_does_not_change_result(token in "[0-9:. a-zA-Z-]{0,12}", left in 0usize..4, right in 0usize..4) {
            let padded = format!("{}{}{}", " ".repeat(left), token, " ".repeat(right));
            prop_assert_eq!(parse_lap_time(Some(&padded)), parse_lap_time(Some(&token)));
        }

        #[test]
        fn output_is_finite_and_non_negative(token in "\\PC{0,16}") {
            if let Some(v) = parse_lap_time(Some(&token)) {
                prop_assert!(v.is_finite() && v >= 0.0);
            }
        }
    }
}
