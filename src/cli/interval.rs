use std::time::Duration;

use regex::Regex;

use crate::errors::{GatorError, GatorResult};

const INTERVAL_PATTERN: &str = r"^(?:\d+(?:\.\d+)?(?:ns|us|µs|ms|s|m|h))+$";
const COMPONENT_PATTERN: &str = r"(\d+(?:\.\d+)?)(ns|us|µs|ms|s|m|h)";

/// Parse a duration such as `30s`, `1m`, `1h30m` or `1.5h`. Must be positive.
pub fn parse_interval(input: &str) -> GatorResult<Duration> {
    let invalid = || {
        GatorError::InvalidInput(format!(
            "invalid interval {:?}, expected something like 30s, 1m or 1h30m",
            input
        ))
    };

    let whole = Regex::new(INTERVAL_PATTERN).map_err(|e| GatorError::InvalidInput(e.to_string()))?;
    if !whole.is_match(input) {
        return Err(invalid());
    }

    let component =
        Regex::new(COMPONENT_PATTERN).map_err(|e| GatorError::InvalidInput(e.to_string()))?;
    let mut nanos = 0.0_f64;
    for caps in component.captures_iter(input) {
        let value: f64 = caps[1].parse().map_err(|_| invalid())?;
        let unit_nanos = match &caps[2] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return Err(invalid()),
        };
        nanos += (value * unit_nanos).round();
    }

    if !nanos.is_finite() || nanos >= u64::MAX as f64 {
        return Err(invalid());
    }
    let interval = Duration::from_nanos(nanos as u64);
    if interval.is_zero() {
        return Err(GatorError::InvalidInput(format!(
            "interval must be greater than zero, got {:?}",
            input
        )));
    }
    Ok(interval)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_units() {
        assert_eq!(parse_interval("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_interval("1m").unwrap(), Duration::from_secs(60));
        assert_eq!(parse_interval("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_interval("250ms").unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn test_compound_and_fractional() {
        assert_eq!(parse_interval("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_interval("1.5h").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_interval("1m30s").unwrap(), Duration::from_secs(90));
    }

    #[test]
    fn test_rejects_zero() {
        assert!(matches!(
            parse_interval("0s"),
            Err(GatorError::InvalidInput(msg)) if msg.contains("greater than zero")
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        for input in ["", "10", "-1m", "1d", "m", "1 m", "soon"] {
            assert!(
                matches!(parse_interval(input), Err(GatorError::InvalidInput(_))),
                "{:?} should be rejected",
                input
            );
        }
    }
}
