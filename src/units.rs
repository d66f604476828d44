//! Capacity and delay unit conversion.
//!
//! This module converts between the human-readable strings used by callers
//! ("100mbps", "10ms") and the canonical values stored on links (bits per
//! second as an integer, seconds as a float). The converse humanize functions
//! produce the display label attached to each link.

/// Errors from parsing capacity or delay strings
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnitError {
    #[error("invalid capacity '{0}'")]
    InvalidCapacity(String),

    #[error("invalid delay '{0}'")]
    InvalidDelay(String),
}

/// Split a unit string into its leading numeric part and trailing suffix
fn split_number_suffix(value: &str) -> (&str, &str) {
    for (i, c) in value.char_indices() {
        if !c.is_ascii_digit() && c != '.' {
            return (&value[..i], value[i..].trim());
        }
    }
    (value, "")
}

/// Parse a capacity string (e.g. "100mbps", "1.5 Gb/s", "250000") into bits per second.
///
/// Recognized suffixes, case-insensitive:
/// - bits/s: "bps", "b/s" (or none)
/// - kilobits/s: "kbps", "kb/s"
/// - megabits/s: "mbps", "mb/s"
/// - gigabits/s: "gbps", "gb/s"
pub fn unhumanize_capacity(capacity: &str) -> Result<u64, UnitError> {
    let lowered = capacity.trim().to_ascii_lowercase();
    let (number, suffix) = split_number_suffix(&lowered);

    let multiplier: u64 = match suffix {
        "" | "bps" | "b/s" => 1,
        "kbps" | "kb/s" => 1_000,
        "mbps" | "mb/s" => 1_000_000,
        "gbps" | "gb/s" => 1_000_000_000,
        _ => return Err(UnitError::InvalidCapacity(capacity.to_string())),
    };

    let value = number
        .parse::<f64>()
        .map_err(|_| UnitError::InvalidCapacity(capacity.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(UnitError::InvalidCapacity(capacity.to_string()));
    }
    Ok((value * multiplier as f64).round() as u64)
}

/// Parse a delay string (e.g. "10ms", "1.5 s", "250us") into seconds.
///
/// Recognized suffixes, case-insensitive: "s"/"sec"/"secs", "ms"/"msec",
/// "us"/"usec", "ns"/"nsec". A bare number is taken as seconds.
pub fn unhumanize_delay(delay: &str) -> Result<f64, UnitError> {
    let lowered = delay.trim().to_ascii_lowercase();
    let (number, suffix) = split_number_suffix(&lowered);

    let multiplier: f64 = match suffix {
        "" | "s" | "sec" | "secs" => 1.0,
        "ms" | "msec" => 1e-3,
        "us" | "usec" => 1e-6,
        "ns" | "nsec" => 1e-9,
        _ => return Err(UnitError::InvalidDelay(delay.to_string())),
    };

    let value = number
        .parse::<f64>()
        .map_err(|_| UnitError::InvalidDelay(delay.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(UnitError::InvalidDelay(delay.to_string()));
    }
    Ok(value * multiplier)
}

/// Format a scaled value without a trailing ".0" for whole numbers
fn format_scaled(value: f64) -> String {
    if value == value.trunc() {
        format!("{}", value as u64)
    } else {
        format!("{}", value)
    }
}

/// Render a bits-per-second capacity as a human-readable string, e.g.
/// `100_000_000` becomes `"100 Mb/s"`.
pub fn humanize_capacity(bits_per_sec: u64) -> String {
    const UNITS: [(u64, &str); 3] = [
        (1_000_000_000, "Gb/s"),
        (1_000_000, "Mb/s"),
        (1_000, "Kb/s"),
    ];
    for (threshold, unit) in UNITS {
        if bits_per_sec >= threshold {
            return format!(
                "{} {}",
                format_scaled(bits_per_sec as f64 / threshold as f64),
                unit
            );
        }
    }
    format!("{} b/s", bits_per_sec)
}

/// Render a delay in seconds as a human-readable string, e.g. `0.01`
/// becomes `"10 ms"`.
pub fn humanize_delay(seconds: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1.0, "s"), (1e-3, "ms"), (1e-6, "us"), (1e-9, "ns")];
    if seconds <= 0.0 {
        return "0 s".to_string();
    }
    for (threshold, unit) in UNITS {
        if seconds >= threshold {
            // Round away float noise from the division before formatting
            let scaled = (seconds / threshold * 1e6).round() / 1e6;
            return format!("{} {}", format_scaled(scaled), unit);
        }
    }
    format!("{} ns", format_scaled((seconds / 1e-9 * 1e6).round() / 1e6))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unhumanize_capacity() {
        // Bare numbers are bits per second
        assert_eq!(unhumanize_capacity("250000"), Ok(250_000));

        // Unit suffixes
        assert_eq!(unhumanize_capacity("100bps"), Ok(100));
        assert_eq!(unhumanize_capacity("100 b/s"), Ok(100));
        assert_eq!(unhumanize_capacity("64kbps"), Ok(64_000));
        assert_eq!(unhumanize_capacity("100mbps"), Ok(100_000_000));
        assert_eq!(unhumanize_capacity("100 Mb/s"), Ok(100_000_000));
        assert_eq!(unhumanize_capacity("1gbps"), Ok(1_000_000_000));

        // Fractional values
        assert_eq!(unhumanize_capacity("1.5mbps"), Ok(1_500_000));

        // Invalid formats
        assert!(unhumanize_capacity("").is_err());
        assert!(unhumanize_capacity("fast").is_err());
        assert!(unhumanize_capacity("100 parsecs").is_err());
        assert!(unhumanize_capacity("-5mbps").is_err());
    }

    fn assert_close(actual: Result<f64, UnitError>, expected: f64) {
        let actual = actual.unwrap();
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {} got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_unhumanize_delay() {
        assert_close(unhumanize_delay("2"), 2.0);
        assert_close(unhumanize_delay("2s"), 2.0);
        assert_close(unhumanize_delay("10ms"), 0.010);
        assert_close(unhumanize_delay("250us"), 0.000_250);
        assert_close(unhumanize_delay("100ns"), 0.000_000_1);
        assert_close(unhumanize_delay("1.5 s"), 1.5);

        assert!(unhumanize_delay("").is_err());
        assert!(unhumanize_delay("soon").is_err());
        assert!(unhumanize_delay("10 fortnights").is_err());
    }

    #[test]
    fn test_humanize_capacity() {
        assert_eq!(humanize_capacity(100), "100 b/s");
        assert_eq!(humanize_capacity(64_000), "64 Kb/s");
        assert_eq!(humanize_capacity(100_000_000), "100 Mb/s");
        assert_eq!(humanize_capacity(1_500_000), "1.5 Mb/s");
        assert_eq!(humanize_capacity(2_000_000_000), "2 Gb/s");
    }

    #[test]
    fn test_humanize_delay() {
        assert_eq!(humanize_delay(2.0), "2 s");
        assert_eq!(humanize_delay(0.010), "10 ms");
        assert_eq!(humanize_delay(0.000_250), "250 us");
        assert_eq!(humanize_delay(0.0), "0 s");
    }

    #[test]
    fn test_label_roundtrip() {
        // The label produced by humanize must parse back to the same value
        let bits = unhumanize_capacity("100mbps").unwrap();
        assert_eq!(unhumanize_capacity(&humanize_capacity(bits)), Ok(bits));
        let delay = unhumanize_delay("10ms").unwrap();
        assert_eq!(unhumanize_delay(&humanize_delay(delay)), Ok(delay));
    }
}
