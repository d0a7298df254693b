//! Working-day arithmetic for leave accounting.
//!
//! A working day is a date that is neither Saturday/Sunday nor listed in the
//! `HolidaySet`. The holiday set is injected by the caller (usually from
//! `ClientConfig`) rather than baked in, so a new year's list needs no rebuild.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::ApiError;

/// Built-in holiday list, used when configuration does not supply one.
pub const DEFAULT_HOLIDAYS: [&str; 8] = [
    "2025-01-26",
    "2025-03-14",
    "2025-03-31",
    "2025-04-18",
    "2025-08-15",
    "2025-10-02",
    "2025-10-20",
    "2025-12-25",
];

const ISO_FORMAT: &str = "%Y-%m-%d";

/// Immutable set of holiday dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidaySet {
    dates: BTreeSet<NaiveDate>,
}

impl HolidaySet {
    pub fn empty() -> Self {
        Self {
            dates: BTreeSet::new(),
        }
    }

    /// Parse a list of `YYYY-MM-DD` strings. Fails on the first malformed entry.
    pub fn from_iso<I, S>(dates: I) -> Result<Self, ApiError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dates = dates
            .into_iter()
            .map(|s| parse_iso_date(s.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { dates })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }
}

impl Default for HolidaySet {
    fn default() -> Self {
        let dates = DEFAULT_HOLIDAYS
            .iter()
            .filter_map(|s| NaiveDate::parse_from_str(s, ISO_FORMAT).ok())
            .collect();
        Self { dates }
    }
}

impl FromIterator<NaiveDate> for HolidaySet {
    fn from_iter<T: IntoIterator<Item = NaiveDate>>(iter: T) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

/// Parse a `YYYY-MM-DD` string into a calendar date.
pub fn parse_iso_date(s: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(s.trim(), ISO_FORMAT)
        .map_err(|_| ApiError::InvalidDate(s.to_string()))
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// True when `date` is neither a weekend nor a holiday.
pub fn is_working_day(date: NaiveDate, holidays: &HolidaySet) -> bool {
    !is_weekend(date) && !holidays.contains(date)
}

/// Comp-off is earned only for work done on a weekend or a holiday.
pub fn is_compoff_eligible(date: NaiveDate, holidays: &HolidaySet) -> bool {
    !is_working_day(date, holidays)
}

/// Count working days in `start..=end`. A reversed range counts zero.
pub fn count_working_days(start: NaiveDate, end: NaiveDate, holidays: &HolidaySet) -> u32 {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_working_day(*d, holidays))
        .count() as u32
}

/// `count_working_days` over ISO date strings, as form inputs supply them.
pub fn count_working_days_iso(
    start: &str,
    end: &str,
    holidays: &HolidaySet,
) -> Result<u32, ApiError> {
    let start = parse_iso_date(start)?;
    let end = parse_iso_date(end)?;
    Ok(count_working_days(start, end, holidays))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_iso_date(s).unwrap()
    }

    #[test]
    fn monday_to_sunday_with_holiday_on_sunday() {
        // 2025-01-26 is both a Sunday and Republic Day.
        let n = count_working_days(d("2025-01-20"), d("2025-01-26"), &HolidaySet::default());
        assert_eq!(n, 5);
    }

    #[test]
    fn weekday_holiday_is_excluded() {
        // 2025-08-15 is a Friday.
        let n = count_working_days(d("2025-08-11"), d("2025-08-17"), &HolidaySet::default());
        assert_eq!(n, 4);
        let n = count_working_days(d("2025-08-11"), d("2025-08-17"), &HolidaySet::empty());
        assert_eq!(n, 5);
    }

    #[test]
    fn single_day_ranges() {
        let holidays = HolidaySet::default();
        assert_eq!(count_working_days(d("2025-01-20"), d("2025-01-20"), &holidays), 1);
        assert_eq!(count_working_days(d("2025-01-25"), d("2025-01-25"), &holidays), 0);
        assert_eq!(count_working_days(d("2025-03-14"), d("2025-03-14"), &holidays), 0);
    }

    #[test]
    fn reversed_range_is_zero() {
        let n = count_working_days(d("2025-01-26"), d("2025-01-20"), &HolidaySet::default());
        assert_eq!(n, 0);
    }

    #[test]
    fn spans_year_boundary() {
        // Wed 2025-12-31 .. Fri 2026-01-02, no holidays configured for 2026.
        let n = count_working_days(d("2025-12-31"), d("2026-01-02"), &HolidaySet::default());
        assert_eq!(n, 3);
        // Christmas 2025 is a Thursday.
        let n = count_working_days(d("2025-12-22"), d("2026-01-02"), &HolidaySet::default());
        assert_eq!(n, 9);
    }

    #[test]
    fn spans_leap_day() {
        // Wed 2024-02-28 through Mon 2024-03-04 crosses the 29th.
        let n = count_working_days(d("2024-02-28"), d("2024-03-04"), &HolidaySet::empty());
        assert_eq!(n, 4);
    }

    #[test]
    fn never_exceeds_inclusive_day_count() {
        let holidays = HolidaySet::default();
        let start = d("2025-01-01");
        for offset in 0..120 {
            let end = start + chrono::Duration::days(offset);
            let n = count_working_days(start, end, &holidays);
            assert!(n as i64 <= offset + 1, "range of {} days counted {n}", offset + 1);
        }
    }

    #[test]
    fn repeated_calls_agree() {
        let holidays = HolidaySet::default();
        let a = count_working_days(d("2025-03-01"), d("2025-04-30"), &holidays);
        let b = count_working_days(d("2025-03-01"), d("2025-04-30"), &holidays);
        assert_eq!(a, b);
    }

    #[test]
    fn iso_variant_rejects_malformed_dates() {
        let holidays = HolidaySet::default();
        assert_eq!(count_working_days_iso("2025-01-20", "2025-01-24", &holidays).unwrap(), 5);
        let err = count_working_days_iso("2025-02-30", "2025-03-01", &holidays).unwrap_err();
        assert!(matches!(err, ApiError::InvalidDate(s) if s == "2025-02-30"));
        assert!(count_working_days_iso("20/01/2025", "2025-01-24", &holidays).is_err());
    }

    #[test]
    fn from_iso_builds_set() {
        let set = HolidaySet::from_iso(["2026-01-26", "2026-08-15"]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(d("2026-08-15")));
        assert!(HolidaySet::from_iso(["not-a-date"]).is_err());
    }

    #[test]
    fn default_set_has_builtin_list() {
        let set = HolidaySet::default();
        assert_eq!(set.len(), DEFAULT_HOLIDAYS.len());
        assert_eq!(set.iter().next(), Some(d("2025-01-26")));
    }

    #[test]
    fn compoff_eligibility() {
        let holidays = HolidaySet::default();
        assert!(is_compoff_eligible(d("2025-01-25"), &holidays)); // Saturday
        assert!(is_compoff_eligible(d("2025-10-02"), &holidays)); // Thursday holiday
        assert!(!is_compoff_eligible(d("2025-10-03"), &holidays));
    }
}
