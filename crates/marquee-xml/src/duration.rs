//! ISO-8601 duration parsing.
//!
//! Video encodings and metadata run lengths carry durations in the ISO-8601
//! form `PnDTnHnMnS`. Only the designators that actually occur in manifest
//! files are supported (days, hours, minutes, fractional seconds).

/// Parse an ISO-8601 duration (e.g. `"PT1H2M3.5S"`) into seconds.
///
/// Returns `None` for anything that does not match the expected shape.
pub fn parse_iso8601_duration(text: &str) -> Option<f64> {
    let rest = text.trim().strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((d, t)) => (d, t),
        None => (rest, ""),
    };

    let mut seconds = 0.0;

    for (value, unit) in parse_components(date_part)? {
        match unit {
            'D' => seconds += value * 86_400.0,
            _ => return None, // years/months/weeks never occur in manifests
        }
    }

    for (value, unit) in parse_components(time_part)? {
        match unit {
            'H' => seconds += value * 3_600.0,
            'M' => seconds += value * 60.0,
            'S' => seconds += value,
            _ => return None,
        }
    }

    Some(seconds)
}

/// Split `"1H2M3.5S"` into `[(1.0, 'H'), (2.0, 'M'), (3.5, 'S')]`,
/// rejecting the whole input on any malformed component.
fn parse_components(part: &str) -> Option<Vec<(f64, char)>> {
    let mut components = Vec::new();
    let mut rest = part;

    while !rest.is_empty() {
        let split = rest.find(|c: char| c.is_ascii_alphabetic())?;
        let value: f64 = rest[..split].parse().ok()?;
        let unit = rest[split..].chars().next()?;
        components.push((value, unit));
        rest = &rest[split + unit.len_utf8()..];
    }

    Some(components)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_duration() {
        assert_eq!(parse_iso8601_duration("PT1H2M3S"), Some(3723.0));
    }

    #[test]
    fn test_fractional_seconds() {
        assert_eq!(parse_iso8601_duration("PT3.5S"), Some(3.5));
    }

    #[test]
    fn test_minutes_only() {
        assert_eq!(parse_iso8601_duration("PT90M"), Some(5400.0));
    }

    #[test]
    fn test_days() {
        assert_eq!(parse_iso8601_duration("P1DT1H"), Some(90000.0));
    }

    #[test]
    fn test_invalid() {
        assert_eq!(parse_iso8601_duration("1H30M"), None);
        assert_eq!(parse_iso8601_duration("P1Y"), None);
        assert_eq!(parse_iso8601_duration("PTXS"), None);
        assert_eq!(parse_iso8601_duration("PT5"), None);
    }
}
