use jiff::SpanRelativeTo;

/// Accepts `30s`, `5m`, ISO 8601 (`PT1M30S`) or a plain number of seconds.
pub fn parse_duration(input: &str) -> Result<jiff::SignedDuration, String> {
    let duration = if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        duration
    } else if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        duration
    } else if let Ok(seconds) = input.parse::<i64>() {
        jiff::SignedDuration::from_secs(seconds)
    } else {
        return Err(format!("Invalid duration: {input}"));
    };

    if duration.is_negative() || duration.is_zero() {
        return Err(String::from("Duration must be positive"));
    }

    Ok(duration)
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("30s"), Ok(SignedDuration::from_secs(30)));
        assert_eq!(parse_duration("PT1M"), Ok(SignedDuration::from_mins(1)));
        assert_eq!(parse_duration("90"), Ok(SignedDuration::from_secs(90)));
        assert_eq!(parse_duration("2m 30s"), Ok(SignedDuration::from_secs(150)));
    }

    #[test]
    fn test_rejects_invalid_durations() {
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("0").is_err());
        assert!(parse_duration("-5").is_err());
    }
}
