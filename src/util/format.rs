use std::time::Duration;

use chrono::{DateTime, Datelike, FixedOffset, Offset, TimeZone};

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3600;

/// Format a timestamp as an RFC 2822 date in its own offset, e.g.
/// `Thu, 01 Jan 2015 00:00:00 +0000`.
///
/// Every representable instant yields a string that
/// `DateTime::parse_from_rfc2822` accepts:
///
/// - The year is written as plain digits, at least four wide. Years past
///   9999 grow (`10000`), never gaining a sign.
/// - RFC 2822 has no negative years, so instants before year 0 in their own
///   offset are clamped to `Sat, 01 Jan 0000 00:00:00` in that offset.
/// - The zone has only hours and minutes. An offset with a seconds part is
///   truncated toward zero to whole minutes and the local time is shifted
///   with it, so the string still names the same instant.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use podcast_feed::util::format_pub_date;
///
/// let date = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
/// assert_eq!(format_pub_date(&date), "Thu, 01 Jan 2015 00:00:00 +0000");
/// ```
pub fn format_pub_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    let own = date.offset().fix();
    let offset = FixedOffset::east_opt(own.local_minus_utc() / 60 * 60).unwrap_or(own);
    let mut local = date.with_timezone(&offset);
    if local.year() < 0 {
        local = offset.with_ymd_and_hms(0, 1, 1, 0, 0, 0).single().unwrap_or(local);
    }
    format!(
        "{} {:04} {}",
        local.format("%a, %d %b"),
        local.year(),
        local.format("%H:%M:%S %z")
    )
}

/// Format an episode length for `itunes:duration`.
///
/// Sub-second precision is truncated. Below one hour the result is `M:SS`
/// (minutes without padding), from one hour on it is `H:MM:SS` (hours without
/// padding, so `25:30:45` is valid).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use podcast_feed::util::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(0)), "0:00");
/// assert_eq!(format_duration(Duration::from_secs(94)), "1:34");
/// assert_eq!(format_duration(Duration::from_secs(37_000)), "10:16:40");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / SECONDS_PER_HOUR;
    let minutes = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = total % SECONDS_PER_MINUTE;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use proptest::prelude::*;

    #[test]
    fn test_pub_date_utc() {
        let date = Utc.with_ymd_and_hms(2015, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(format_pub_date(&date), "Fri, 02 Jan 2015 00:00:00 +0000");
    }

    #[test]
    fn test_pub_date_keeps_own_offset() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let date = offset.with_ymd_and_hms(2024, 3, 9, 18, 30, 5).unwrap();
        assert_eq!(format_pub_date(&date), "Sat, 09 Mar 2024 18:30:05 -0500");

        let offset = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let date = offset.with_ymd_and_hms(2024, 3, 9, 18, 30, 5).unwrap();
        assert_eq!(format_pub_date(&date), "Sat, 09 Mar 2024 18:30:05 +0530");
    }

    #[test]
    fn test_pub_date_epoch() {
        let date = Utc.timestamp_opt(0, 0).unwrap();
        assert_eq!(format_pub_date(&date), "Thu, 01 Jan 1970 00:00:00 +0000");
    }

    #[test]
    fn test_pub_date_five_digit_year() {
        let date = Utc.with_ymd_and_hms(10_000, 1, 1, 0, 0, 0).unwrap();
        let formatted = format_pub_date(&date);
        assert_eq!(formatted, "Sat, 01 Jan 10000 00:00:00 +0000");
        assert_eq!(DateTime::parse_from_rfc2822(&formatted).unwrap(), date);
    }

    #[test]
    fn test_pub_date_extremes_parse_back() {
        let max = DateTime::<Utc>::MAX_UTC;
        let formatted = format_pub_date(&max);
        assert_eq!(formatted.matches('+').count(), 1, "{formatted}");
        let parsed = DateTime::parse_from_rfc2822(&formatted).unwrap();
        assert_eq!(parsed.timestamp(), max.timestamp());

        let min = format_pub_date(&DateTime::<Utc>::MIN_UTC);
        assert_eq!(min, "Sat, 01 Jan 0000 00:00:00 +0000");
        assert!(DateTime::parse_from_rfc2822(&min).is_ok());
    }

    #[test]
    fn test_pub_date_year_zero_not_clamped() {
        let date = Utc.with_ymd_and_hms(0, 6, 15, 12, 0, 0).unwrap();
        let formatted = format_pub_date(&date);
        assert!(formatted.contains(" Jun 0000 12:00:00 "), "{formatted}");
        assert_eq!(DateTime::parse_from_rfc2822(&formatted).unwrap(), date);
    }

    #[test]
    fn test_pub_date_offset_seconds_keep_instant() {
        let offset = FixedOffset::east_opt(5 * 3600 + 30 * 60 + 45).unwrap();
        let date = offset.with_ymd_and_hms(2024, 3, 9, 18, 30, 5).unwrap();
        let formatted = format_pub_date(&date);
        assert_eq!(formatted, "Sat, 09 Mar 2024 18:29:20 +0530");
        assert_eq!(DateTime::parse_from_rfc2822(&formatted).unwrap(), date);

        let offset = FixedOffset::west_opt(3600 + 59).unwrap();
        let date = offset.with_ymd_and_hms(2024, 3, 9, 0, 0, 30).unwrap();
        let formatted = format_pub_date(&date);
        assert_eq!(formatted, "Sat, 09 Mar 2024 00:01:29 -0100");
        assert_eq!(DateTime::parse_from_rfc2822(&formatted).unwrap(), date);
    }

    #[test]
    fn test_duration_known_values() {
        let cases = [
            (0, "0:00"),
            (6, "0:06"),
            (64, "1:04"),
            (94, "1:34"),
            (125, "2:05"),
            (3599, "59:59"),
            (3600, "1:00:00"),
            (37_000, "10:16:40"),
            (25 * 3600 + 30 * 60 + 45, "25:30:45"),
        ];
        for (secs, want) in cases {
            assert_eq!(format_duration(Duration::from_secs(secs)), want, "{secs}s");
        }
    }

    #[test]
    fn test_duration_truncates_fraction() {
        assert_eq!(format_duration(Duration::from_millis(1999)), "0:01");
        assert_eq!(format_duration(Duration::from_nanos(1)), "0:00");
    }

    #[test]
    fn test_duration_huge_value() {
        let formatted = format_duration(Duration::from_secs(u64::MAX));
        assert_eq!(formatted.matches(':').count(), 2);
    }

    /// Parse `H:MM:SS` or `M:SS` back into seconds, checking the padding rules.
    fn parse_formatted(s: &str) -> Option<u64> {
        let parts: Vec<&str> = s.split(':').collect();
        let lead_ok = |p: &str| p == "0" || !p.starts_with('0');
        match parts.as_slice() {
            [m, sec] if lead_ok(m) && sec.len() == 2 => {
                Some(m.parse::<u64>().ok()? * 60 + sec.parse::<u64>().ok()?)
            }
            [h, m, sec] if lead_ok(h) && m.len() == 2 && sec.len() == 2 => Some(
                h.parse::<u64>().ok()? * 3600
                    + m.parse::<u64>().ok()? * 60
                    + sec.parse::<u64>().ok()?,
            ),
            _ => None,
        }
    }

    proptest! {
        #[test]
        fn prop_under_a_minute(secs in 0u64..60) {
            let formatted = format_duration(Duration::from_secs(secs));
            prop_assert!(formatted.starts_with("0:"));
            prop_assert_eq!(formatted.len(), 4);
            prop_assert_eq!(parse_formatted(&formatted), Some(secs));
        }

        #[test]
        fn prop_under_an_hour(secs in 60u64..3600) {
            let formatted = format_duration(Duration::from_secs(secs));
            prop_assert_eq!(formatted.matches(':').count(), 1);
            prop_assert!(!formatted.starts_with('0'));
            prop_assert_eq!(parse_formatted(&formatted), Some(secs));
        }

        #[test]
        fn prop_hours(secs in 3600u64..10_000_000) {
            let formatted = format_duration(Duration::from_secs(secs));
            prop_assert_eq!(formatted.matches(':').count(), 2);
            prop_assert_eq!(parse_formatted(&formatted), Some(secs));
        }

        #[test]
        fn prop_pub_date_four_digit_years(ts in -62_167_219_200i64..253_402_300_800) {
            let date = Utc.timestamp_opt(ts, 0).unwrap();
            let formatted = format_pub_date(&date);
            prop_assert_eq!(formatted.len(), 31);
            prop_assert_eq!(DateTime::parse_from_rfc2822(&formatted).unwrap(), date);
        }

        #[test]
        fn prop_pub_date_parses_to_any_year(
            ts in 253_402_300_800i64..=DateTime::<Utc>::MAX_UTC.timestamp(),
        ) {
            let date = Utc.timestamp_opt(ts, 0).unwrap();
            let formatted = format_pub_date(&date);
            prop_assert!(formatted.len() > 31);
            prop_assert_eq!(formatted.matches('+').count(), 1);
            prop_assert_eq!(DateTime::parse_from_rfc2822(&formatted).unwrap(), date);
        }

        #[test]
        fn prop_pub_date_any_offset_same_instant(
            ts in 0i64..253_402_300_800,
            offset_secs in -86_399i32..86_400,
        ) {
            let offset = FixedOffset::east_opt(offset_secs).unwrap();
            let date = offset.timestamp_opt(ts, 0).unwrap();
            let formatted = format_pub_date(&date);
            let parsed = DateTime::parse_from_rfc2822(&formatted).unwrap();
            prop_assert_eq!(parsed.timestamp(), ts);
            prop_assert_eq!(parsed.offset().local_minus_utc(), offset_secs / 60 * 60);
        }
    }
}
