//! Canonical date and time strings.
//!
//! Dates are `YYYY-MM-DD`, times of day are `HH:MM` (24h). Both are zero-padded
//! so lexicographic comparison is chronological comparison; the whole crate
//! relies on that and validates the format at input boundaries instead of
//! trusting it.

use chrono::{Datelike, Local, Months, NaiveDate};

/// Check that a string is a valid `YYYY-MM-DD` calendar date.
pub fn is_canonical_date(s: &str) -> bool {
    s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// Check that a string is a valid zero-padded `HH:MM` time of day.
pub fn is_canonical_time(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return false;
    }
    let (hh, mm) = (&s[0..2], &s[3..5]);
    let hour: u32 = match hh.parse() {
        Ok(h) => h,
        Err(_) => return false,
    };
    let minute: u32 = match mm.parse() {
        Ok(m) => m,
        Err(_) => return false,
    };
    hour < 24 && minute < 60
}

/// Today's date in canonical form, from the local clock.
pub fn local_today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Current local time of day in canonical form.
pub fn local_time_of_day() -> String {
    Local::now().format("%H:%M").to_string()
}

/// The canonical date six months before `today`.
///
/// Returns `None` when `today` is not a canonical date. Month arithmetic
/// clamps to the end of shorter months (e.g. six months before Aug 31 is
/// Feb 28/29), matching calendar expectations.
pub fn six_months_before(today: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(today, "%Y-%m-%d").ok()?;
    let shifted = date.checked_sub_months(Months::new(6))?;
    Some(format!(
        "{:04}-{:02}-{:02}",
        shifted.year(),
        shifted.month(),
        shifted.day()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_date() {
        assert!(is_canonical_date("2024-01-10"));
        assert!(!is_canonical_date("2024-1-10"));
        assert!(!is_canonical_date("2024-13-01"));
        assert!(!is_canonical_date("10-01-2024"));
        assert!(!is_canonical_date(""));
    }

    #[test]
    fn test_canonical_time() {
        assert!(is_canonical_time("09:00"));
        assert!(is_canonical_time("23:59"));
        assert!(!is_canonical_time("9:00"));
        assert!(!is_canonical_time("24:00"));
        assert!(!is_canonical_time("09:60"));
        assert!(!is_canonical_time("09-00"));
    }

    #[test]
    fn test_six_months_before() {
        assert_eq!(six_months_before("2024-07-15").as_deref(), Some("2024-01-15"));
        assert_eq!(six_months_before("2024-08-31").as_deref(), Some("2024-02-29"));
        assert_eq!(six_months_before("not-a-date"), None);
    }

    #[test]
    fn test_local_today_is_canonical() {
        assert!(is_canonical_date(&local_today()));
        assert!(is_canonical_time(&local_time_of_day()));
    }
}
