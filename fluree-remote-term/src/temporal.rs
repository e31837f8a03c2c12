//! ISO-8601 parsing for the date/time conversion targets
//!
//! The "best" parsers return an offset-aware value when the lexical form
//! carries a zone (`Z` or `±hh:mm`) and a local value otherwise. All three
//! accept a full date-time form and project it onto the requested shape, so
//! a timestamp cell can be read as a date or a time.

use crate::native::NativeValue;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

const TIME_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// Split a trailing zone designator off a lexical form.
///
/// Negative years (`-0044-03-15`) are not mistaken for offsets: an offset
/// must be exactly `±hh:mm` at the end of the string.
pub(crate) fn split_zone(s: &str) -> Result<(&str, Option<FixedOffset>), String> {
    if let Some(rest) = s.strip_suffix('Z') {
        return Ok((rest, FixedOffset::east_opt(0)));
    }
    let bytes = s.as_bytes();
    if bytes.len() > 6 {
        let at = bytes.len() - 6;
        if matches!(bytes[at], b'+' | b'-') && bytes[at + 3] == b':' {
            let sign = if bytes[at] == b'-' { -1 } else { 1 };
            let hours: i32 = s[at + 1..at + 3]
                .parse()
                .map_err(|_| format!("invalid zone offset in '{}'", s))?;
            let mins: i32 = s[at + 4..]
                .parse()
                .map_err(|_| format!("invalid zone offset in '{}'", s))?;
            if hours > 14 || mins > 59 {
                return Err(format!("zone offset out of range in '{}'", s));
            }
            let offset = FixedOffset::east_opt(sign * (hours * 3600 + mins * 60))
                .ok_or_else(|| format!("zone offset out of range in '{}'", s))?;
            return Ok((&s[..at], Some(offset)));
        }
    }
    Ok((s, None))
}

fn parse_naive_time(s: &str) -> Result<NaiveTime, String> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| format!("cannot parse time: {}", s))
}

fn parse_naive_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| format!("cannot parse date: {}", s))
}

/// Split `date[T| ]time` into its halves; `None` when there is no time part
fn split_date_time(s: &str) -> Option<(&str, &str)> {
    s.split_once('T').or_else(|| s.split_once(' '))
}

/// Parse a date, or the date part of a date-time. Any zone is dropped.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    let (body, _) = split_zone(s)?;
    match split_date_time(body) {
        Some((date, _)) => parse_naive_date(date),
        None => parse_naive_date(body),
    }
}

/// Parse a time, or the time part of a date-time
pub fn parse_time_best(s: &str) -> Result<NativeValue, String> {
    let s = s.trim();
    let (body, zone) = split_zone(s)?;
    let time_part = match split_date_time(body) {
        Some((date, time)) => {
            parse_naive_date(date)?;
            time
        }
        None => body,
    };
    let time = parse_naive_time(time_part)?;
    Ok(match zone {
        Some(offset) => NativeValue::OffsetTime(time, offset),
        None => NativeValue::LocalTime(time),
    })
}

/// Parse a date-time; a bare date becomes midnight of that day
pub fn parse_date_time_best(s: &str) -> Result<NativeValue, String> {
    let s = s.trim();
    let (body, zone) = split_zone(s)?;
    let naive = match split_date_time(body) {
        Some((date, time)) => NaiveDateTime::new(parse_naive_date(date)?, parse_naive_time(time)?),
        None => NaiveDateTime::new(parse_naive_date(body)?, NaiveTime::default()),
    };
    match zone {
        Some(offset) => offset
            .from_local_datetime(&naive)
            .single()
            .map(NativeValue::OffsetDateTime)
            .ok_or_else(|| format!("cannot place {} at offset {}", naive, offset)),
        None => Ok(NativeValue::LocalDateTime(naive)),
    }
}

/// Parse a date-time that must carry a zone
pub fn parse_date_time_stamp(s: &str) -> Result<DateTime<FixedOffset>, String> {
    match parse_date_time_best(s)? {
        NativeValue::OffsetDateTime(dt) => Ok(dt),
        _ => Err(format!("date-time stamp requires a zone: {}", s)),
    }
}

/// Extract the single component of a `gYear`, `gMonth` or `gDay` lexical form
pub(crate) fn calendar_component(datatype_local: &str, s: &str) -> Result<String, String> {
    let s = s.trim();
    let (body, _) = split_zone(s)?;
    let digits = match datatype_local {
        "gYear" => body,
        "gMonth" => body.strip_prefix("--").unwrap_or(body),
        "gDay" => body.strip_prefix("---").unwrap_or(body),
        other => return Err(format!("{} has no single calendar component", other)),
    };
    let unsigned = digits.strip_prefix('-').unwrap_or(digits);
    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid {} lexical form: {}", datatype_local, s));
    }
    Ok(digits.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_split_zone() {
        let (body, zone) = split_zone("10:30:00Z").unwrap();
        assert_eq!(body, "10:30:00");
        assert_eq!(zone.unwrap().local_minus_utc(), 0);

        let (body, zone) = split_zone("2024-01-15T10:30:00-05:00").unwrap();
        assert_eq!(body, "2024-01-15T10:30:00");
        assert_eq!(zone.unwrap().local_minus_utc(), -5 * 3600);

        let (body, zone) = split_zone("-0044-03-15").unwrap();
        assert_eq!(body, "-0044-03-15");
        assert!(zone.is_none());

        assert!(split_zone("10:30:00+25:00").is_err());
    }

    #[test]
    fn test_parse_date_variants() {
        let d = parse_date("2024-01-15").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2024, 1, 15));
        assert_eq!(parse_date("2024-01-15Z").unwrap(), d);
        assert_eq!(parse_date("2024-01-15+05:00").unwrap(), d);
        assert_eq!(parse_date("2024-01-15T23:59:59Z").unwrap(), d);
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_parse_time_best() {
        match parse_time_best("10:30:00").unwrap() {
            NativeValue::LocalTime(t) => assert_eq!(t.hour(), 10),
            other => panic!("expected local time, got {:?}", other),
        }
        match parse_time_best("10:30:00.250+02:00").unwrap() {
            NativeValue::OffsetTime(t, off) => {
                assert_eq!(t.nanosecond(), 250_000_000);
                assert_eq!(off.local_minus_utc(), 7200);
            }
            other => panic!("expected offset time, got {:?}", other),
        }
        match parse_time_best("2024-01-15T08:00:00Z").unwrap() {
            NativeValue::OffsetTime(t, _) => assert_eq!(t.hour(), 8),
            other => panic!("expected offset time, got {:?}", other),
        }
        assert!(parse_time_best("25:00:00").is_err());
    }

    #[test]
    fn test_parse_date_time_best() {
        match parse_date_time_best("2024-01-15T10:30:00").unwrap() {
            NativeValue::LocalDateTime(dt) => assert_eq!(dt.hour(), 10),
            other => panic!("expected local date-time, got {:?}", other),
        }
        match parse_date_time_best("2024-01-15T10:30:00.123Z").unwrap() {
            NativeValue::OffsetDateTime(dt) => {
                assert_eq!(dt.offset().local_minus_utc(), 0);
                assert_eq!(dt.timestamp_subsec_millis(), 123);
            }
            other => panic!("expected offset date-time, got {:?}", other),
        }
        match parse_date_time_best("2024-01-15").unwrap() {
            NativeValue::LocalDateTime(dt) => {
                assert_eq!((dt.hour(), dt.minute()), (0, 0));
            }
            other => panic!("expected midnight, got {:?}", other),
        }
        assert!(parse_date_time_stamp("2024-01-15T10:30:00").is_err());
        assert!(parse_date_time_stamp("2024-01-15T10:30:00+01:00").is_ok());
    }

    #[test]
    fn test_calendar_component() {
        assert_eq!(calendar_component("gYear", "2024").unwrap(), "2024");
        assert_eq!(calendar_component("gYear", "-0044Z").unwrap(), "-0044");
        assert_eq!(calendar_component("gMonth", "--05").unwrap(), "05");
        assert_eq!(calendar_component("gDay", "---31+01:00").unwrap(), "31");
        assert!(calendar_component("gMonth", "--May").is_err());
        assert!(calendar_component("gYearMonth", "2024-05").is_err());
    }
}
