//! Capture timestamp parsing for `exif:DateTimeOriginal`

use chrono::NaiveDateTime;

/// Parse a capture timestamp as written by Lightroom or found in raw EXIF.
///
/// Accepts `2012-06-05T10:00:00.00` with an optional `+02:00`/`-05:00`/`Z`
/// suffix and the EXIF form `2012:06:05 10:00:00`. Any zone offset is dropped:
/// frames are compared by the camera's wall clock.
pub fn parse_capture_time(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    let local = strip_zone(trimmed);

    if let Ok(dt) = NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }

    // Some writers omit seconds entirely
    if let Ok(dt) = NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M") {
        return Some(dt);
    }

    NaiveDateTime::parse_from_str(local, "%Y:%m:%d %H:%M:%S").ok()
}

fn strip_zone(s: &str) -> &str {
    if let Some(stripped) = s.strip_suffix('Z') {
        return stripped;
    }

    // "+HH:MM" / "-HH:MM"
    let bytes = s.as_bytes();
    if bytes.len() > 6 {
        let tail = &bytes[bytes.len() - 6..];
        if (tail[0] == b'+' || tail[0] == b'-') && tail[3] == b':' {
            return &s[..s.len() - 6];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_lightroom_timestamp() {
        let dt = parse_capture_time("2012-06-05T21:14:03.50").unwrap();
        assert_eq!(dt.year(), 2012);
        assert_eq!(dt.month(), 6);
        assert_eq!(dt.day(), 5);
        assert_eq!(dt.hour(), 21);
        assert_eq!(dt.minute(), 14);
        assert_eq!(dt.second(), 3);
        assert_eq!(dt.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_zone_offset_is_dropped() {
        let plain = parse_capture_time("2012-06-05T21:14:03.00").unwrap();
        assert_eq!(parse_capture_time("2012-06-05T21:14:03.00-07:00"), Some(plain));
        assert_eq!(parse_capture_time("2012-06-05T21:14:03.00+02:00"), Some(plain));
        assert_eq!(parse_capture_time("2012-06-05T21:14:03Z"), Some(plain));
    }

    #[test]
    fn test_without_fraction_or_seconds() {
        let dt = parse_capture_time("2012-06-05T21:14:03").unwrap();
        assert_eq!(dt.second(), 3);
        let dt = parse_capture_time("2012-06-05T21:14").unwrap();
        assert_eq!(dt.minute(), 14);
        assert_eq!(dt.second(), 0);
    }

    #[test]
    fn test_exif_form() {
        let dt = parse_capture_time("2024:01:15 14:30:25").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.second(), 25);
    }

    #[test]
    fn test_garbage_rejected() {
        assert_eq!(parse_capture_time(""), None);
        assert_eq!(parse_capture_time("yesterday"), None);
        assert_eq!(parse_capture_time("2012-13-05T21:14:03"), None);
    }
}
