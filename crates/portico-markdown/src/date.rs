//! UTC calendar dates without a date-crate dependency.
//!
//! Blog posts only carry day precision, so a `(year, month, day)` triple is
//! enough. RFC 2822 and RFC 3339 formatting cover the feed generators.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer};
use serde::Serialize;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A UTC calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl Date {
    /// Parse a `YYYY-MM-DD` string, rejecting impossible dates.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();

        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return None;
        }

        let year = parse_u16(&bytes[0..4])?;
        let month = parse_u8(&bytes[5..7])?;
        let day = parse_u8(&bytes[8..10])?;

        if !(1..=12).contains(&month) {
            return None;
        }
        if day == 0 || day > days_in_month(year, month) {
            return None;
        }

        Some(Self { year, month, day })
    }

    /// Format for RSS `pubDate`: `Sun, 15 Jun 2025 00:00:00 GMT`.
    pub fn to_rfc2822(self) -> String {
        const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
        const MONTHS_ABBR: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];

        format!(
            "{}, {:02} {} {:04} 00:00:00 GMT",
            WEEKDAYS[self.weekday_index()],
            self.day,
            MONTHS_ABBR[(self.month - 1) as usize],
            self.year
        )
    }

    /// Format for Atom `updated`: `YYYY-MM-DDT00:00:00Z`.
    pub fn to_rfc3339(self) -> String {
        format!(
            "{:04}-{:02}-{:02}T00:00:00Z",
            self.year, self.month, self.day
        )
    }

    /// Zero-based index into a Monday-first weekday table.
    fn weekday_index(self) -> usize {
        // Days since 1970-01-01, which was a Thursday.
        let days = days_from_civil(i64::from(self.year), self.month, self.day);
        (days + 3).rem_euclid(7) as usize
    }
}

impl fmt::Display for Date {
    /// Human-readable form used on blog pages: `June 15, 2025`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {}",
            MONTHS[(self.month - 1) as usize],
            self.day,
            self.year
        )
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Date::parse(&s)
            .ok_or_else(|| de::Error::custom(format!("invalid date '{}' (expected YYYY-MM-DD)", s)))
    }
}

/// Current UTC year, derived from the system clock.
pub fn current_utc_year() -> u16 {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let days = (secs / 86_400) as i64;
    civil_year_from_days(days)
}

fn parse_u16(digits: &[u8]) -> Option<u16> {
    let mut value: u16 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value.checked_mul(10)?.checked_add(u16::from(b - b'0'))?;
    }
    Some(value)
}

fn parse_u8(digits: &[u8]) -> Option<u8> {
    parse_u16(digits).and_then(|v| u8::try_from(v).ok())
}

const fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Days since 1970-01-01 for a civil date (Howard Hinnant's algorithm).
fn days_from_civil(y: i64, m: u8, d: u8) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = i64::from((m + 9) % 12);
    let doy = (153 * mp + 2) / 5 + i64::from(d) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Year of the civil date that is `days` after 1970-01-01.
fn civil_year_from_days(days: i64) -> u16 {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };

    (if m <= 2 { y + 1 } else { y }) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_dates() {
        let date = Date::parse("2025-06-15").unwrap();

        assert_eq!(date.year, 2025);
        assert_eq!(date.month, 6);
        assert_eq!(date.day, 15);
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(Date::parse("2025-6-15").is_none());
        assert!(Date::parse("2025/06/15").is_none());
        assert!(Date::parse("not a date").is_none());
        assert!(Date::parse("").is_none());
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(Date::parse("2025-13-01").is_none());
        assert!(Date::parse("2025-02-30").is_none());
        assert!(Date::parse("2025-04-31").is_none());
        assert!(Date::parse("2025-02-29").is_none());
        // 2024 is a leap year
        assert!(Date::parse("2024-02-29").is_some());
    }

    #[test]
    fn formats_rfc2822() {
        // 2024-06-15 was a Saturday
        let date = Date::parse("2024-06-15").unwrap();
        assert_eq!(date.to_rfc2822(), "Sat, 15 Jun 2024 00:00:00 GMT");
    }

    #[test]
    fn formats_rfc3339() {
        let date = Date::parse("2024-06-15").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-06-15T00:00:00Z");
    }

    #[test]
    fn displays_human_readable() {
        let date = Date::parse("2025-01-03").unwrap();
        assert_eq!(date.to_string(), "January 3, 2025");
    }

    #[test]
    fn orders_chronologically() {
        let earlier = Date::parse("2024-12-31").unwrap();
        let later = Date::parse("2025-01-01").unwrap();

        assert!(earlier < later);
    }

    #[test]
    fn deserializes_from_yaml_string() {
        let date: Date = serde_yaml::from_str("\"2025-03-10\"").unwrap();
        assert_eq!(date, Date::parse("2025-03-10").unwrap());

        let bad: Result<Date, _> = serde_yaml::from_str("\"2025-03-99\"");
        assert!(bad.is_err());
    }

    #[test]
    fn current_year_is_plausible() {
        let year = current_utc_year();
        assert!((2024..2100).contains(&year));
    }
}
