//! Fixed service time parsing.
//!
//! Accepted strings follow the usual `<number><unit>` sequence grammar
//! (`"300ms"`, `"1.5s"`, `"1h30m"`) with units ns, us, µs, ms, s, m and h.
//! Anything else, including spaces and calendar units, is malformed.

use std::time::Duration;

const UNITS: &[&str] = &["ns", "us", "µs", "μs", "ms", "s", "m", "h"];

/// Parse a duration string such as `"500ms"`, `"2s"` or `"1m30s"`.
///
/// Empty or malformed strings mean "no fixed delay".
pub fn parse_fixed_delay(raw: &str) -> Option<Duration> {
    if raw.is_empty() {
        return None;
    }
    if !is_unit_sequence(raw) {
        tracing::debug!(service_time = %raw, "Ignoring malformed service time");
        return None;
    }
    if raw == "0" {
        return Some(Duration::ZERO);
    }

    // humantime has no "us" spelling for microseconds.
    let normalized = raw.replace("us", "µs").replace('μ', "µ");
    match humantime::parse_duration(&normalized) {
        Ok(d) => Some(d),
        Err(e) => {
            tracing::debug!(service_time = %raw, error = %e, "Ignoring malformed service time");
            None
        }
    }
}

/// `true` when `raw` is one or more `<digits>[.<digits>]<unit>` groups, or a bare `"0"`.
fn is_unit_sequence(raw: &str) -> bool {
    if raw == "0" {
        return true;
    }

    let mut rest = raw;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let number = &rest[..number_len];
        if number.is_empty()
            || number.matches('.').count() > 1
            || !number.chars().any(|c| c.is_ascii_digit())
        {
            return false;
        }
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        if !UNITS.contains(&&rest[..unit_len]) {
            return false;
        }
        rest = &rest[unit_len..];
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_common_units() {
        assert_eq!(parse_fixed_delay("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_fixed_delay("2s"), Some(Duration::from_secs(2)));
        assert_eq!(parse_fixed_delay("1m30s"), Some(Duration::from_secs(90)));
        assert_eq!(parse_fixed_delay("1h30m"), Some(Duration::from_secs(5400)));
    }

    #[test]
    fn test_parse_fractions_and_micros() {
        assert_eq!(parse_fixed_delay("1.5s"), Some(Duration::from_millis(1500)));
        assert_eq!(parse_fixed_delay("250µs"), Some(Duration::from_micros(250)));
        assert_eq!(parse_fixed_delay("250us"), Some(Duration::from_micros(250)));
        assert_eq!(parse_fixed_delay("0"), Some(Duration::ZERO));
    }

    #[test]
    fn test_malformed_is_no_delay() {
        assert_eq!(parse_fixed_delay("bogus"), None);
        assert_eq!(parse_fixed_delay(""), None);
        assert_eq!(parse_fixed_delay("   "), None);
        assert_eq!(parse_fixed_delay("10 parsecs"), None);
        assert_eq!(parse_fixed_delay("5"), None);
        assert_eq!(parse_fixed_delay("s"), None);
        assert_eq!(parse_fixed_delay("1..2s"), None);
    }

    #[test]
    fn test_calendar_units_and_spaces_rejected() {
        assert_eq!(parse_fixed_delay("1M"), None);
        assert_eq!(parse_fixed_delay("2 days"), None);
        assert_eq!(parse_fixed_delay("1w"), None);
        assert_eq!(parse_fixed_delay("3d"), None);
        assert_eq!(parse_fixed_delay(" 2s"), None);
        assert_eq!(parse_fixed_delay("1h 30m"), None);
    }
}
