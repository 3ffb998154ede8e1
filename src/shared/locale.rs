//! Indonesian (`id-ID`) formatting for dates, times and measured values.
//!
//! Reports are read by local building authorities, so every human-facing
//! date and number goes through here rather than chrono's English defaults.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Long date form, e.g. `15 Juli 2024`.
pub fn long_date<D: Datelike>(date: &D) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Long date plus time with the Indonesian `.` separator, e.g. `15 Juli 2024 14.05`.
pub fn long_date_time(value: &DateTime<FixedOffset>) -> String {
    format!(
        "{} {:02}.{:02}",
        long_date(value),
        value.hour(),
        value.minute()
    )
}

/// Parses a stored timestamp and shifts it into `offset`.
///
/// Accepts RFC 3339 as well as offset-less `YYYY-MM-DD HH:MM:SS` /
/// `YYYY-MM-DDTHH:MM:SS` values, which are taken as UTC.
pub fn parse_timestamp(raw: &str, offset: &FixedOffset) -> Result<DateTime<FixedOffset>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("timestamp is empty".to_string());
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(offset));
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(offset))
        .ok_or_else(|| format!("unrecognized timestamp '{}'", raw))
}

/// Parses a calendar date, tolerating full timestamps.
pub fn parse_date(raw: &str, offset: &FixedOffset) -> Result<NaiveDate, String> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    parse_timestamp(trimmed, offset)
        .map(|value| value.date_naive())
        .map_err(|_| format!("unrecognized date '{}'", trimmed))
}

/// Formats a measured value with `.` thousands grouping and `,` decimals,
/// keeping at most two fractional digits: `1250.5` -> `1.250,5`.
pub fn format_number(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let frac = frac_part.trim_end_matches('0');
    let is_zero = int_part.chars().all(|c| c == '0') && frac.is_empty();
    let sign = if value.is_sign_negative() && !is_zero {
        "-"
    } else {
        ""
    };

    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{},{}", sign, grouped, frac)
    }
}

/// Builds a fixed offset from minutes east of UTC.
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(minutes.checked_mul(60)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wib() -> FixedOffset {
        offset_from_minutes(7 * 60).unwrap()
    }

    #[test]
    fn test_long_date_uses_indonesian_months() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        assert_eq!(long_date(&date), "15 Juli 2024");
        let date = NaiveDate::from_ymd_opt(2023, 2, 1).unwrap();
        assert_eq!(long_date(&date), "1 Februari 2023");
    }

    #[test]
    fn test_timestamp_is_shifted_into_offset() {
        let parsed = parse_timestamp("2024-07-15T07:05:00Z", &wib()).unwrap();
        assert_eq!(long_date_time(&parsed), "15 Juli 2024 14.05");

        let parsed = parse_timestamp("2024-12-31 20:30:00", &wib()).unwrap();
        assert_eq!(long_date_time(&parsed), "1 Januari 2025 03.30");
    }

    #[test]
    fn test_malformed_timestamp_is_an_error() {
        assert!(parse_timestamp("kemarin sore", &wib()).is_err());
        assert!(parse_timestamp("", &wib()).is_err());
    }

    #[test]
    fn test_parse_date_accepts_plain_and_full_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        assert_eq!(parse_date("2024-07-15", &wib()), Ok(expected));
        assert_eq!(parse_date("2024-07-15T01:00:00+07:00", &wib()), Ok(expected));
        assert!(parse_date("15/07/2024", &wib()).is_err());
    }

    #[test]
    fn test_format_number_groups_thousands() {
        assert_eq!(format_number(1250.5), "1.250,5");
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(1234567.891), "1.234.567,89");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-3.25), "-3,25");
    }
}
