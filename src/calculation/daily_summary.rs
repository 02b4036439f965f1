//! Daily work summaries.
//!
//! This module groups completed time entries by their clock-in date and
//! turns each day's entries into a [`DailyWorkSummary`].

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{DailyWorkSummary, TimeEntry};

/// Decimal places kept on worked and overtime hours.
pub const HOURS_DECIMAL_PLACES: u32 = 2;

/// Groups completed entries by clock-in date. Open entries are skipped.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::group_completed_entries;
/// use payroll_engine::models::TimeEntry;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
/// let entry = |id: &str, closed: bool| TimeEntry {
///     id: id.to_string(),
///     user_id: "emp_001".to_string(),
///     project_id: None,
///     clock_in: day.and_hms_opt(8, 0, 0).unwrap(),
///     clock_out: closed.then(|| day.and_hms_opt(12, 0, 0).unwrap()),
///     approved: false,
/// };
/// let entries = vec![entry("a", true), entry("b", false)];
///
/// let grouped = group_completed_entries(&entries);
/// assert_eq!(grouped[&day].len(), 1);
/// ```
pub fn group_completed_entries<'a, I>(entries: I) -> BTreeMap<NaiveDate, Vec<&'a TimeEntry>>
where
    I: IntoIterator<Item = &'a TimeEntry>,
{
    let mut grouped: BTreeMap<NaiveDate, Vec<&'a TimeEntry>> = BTreeMap::new();
    for entry in entries.into_iter().filter(|entry| !entry.is_open()) {
        grouped.entry(entry.work_date()).or_default().push(entry);
    }
    grouped
}

/// Total completed hours across entries, rounded to 2 decimal places.
///
/// Minutes are summed before converting to hours so that many short entries
/// do not accumulate rounding error.
pub fn worked_hours(entries: &[&TimeEntry]) -> Decimal {
    let minutes: i64 = entries.iter().filter_map(|entry| entry.worked_minutes()).sum();
    round_hours(Decimal::from(minutes) / Decimal::from(60))
}

/// Rounds an hour quantity to [`HOURS_DECIMAL_PLACES`].
pub fn round_hours(hours: Decimal) -> Decimal {
    hours.round_dp_with_strategy(HOURS_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Builds the summary for one date.
///
/// Overtime is the excess over the norm, and only accrues once the norm has
/// been met.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::summarize_day;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let date = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
/// let summary = summarize_day(date, Decimal::new(925, 2), Decimal::new(8, 0));
/// assert_eq!(summary.overtime_hours, Decimal::new(125, 2));
/// ```
pub fn summarize_day(date: NaiveDate, worked_hours: Decimal, norm_hours: Decimal) -> DailyWorkSummary {
    let overtime_hours = if worked_hours >= norm_hours {
        worked_hours - norm_hours
    } else {
        Decimal::ZERO
    };

    DailyWorkSummary {
        date,
        weekday: date.weekday(),
        worked_hours,
        norm_hours,
        overtime_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, Weekday};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn make_datetime(day: u32, hour: u32, min: u32) -> NaiveDateTime {
        make_date(day).and_hms_opt(hour, min, 0).unwrap()
    }

    fn create_entry(id: &str, start: NaiveDateTime, end: Option<NaiveDateTime>) -> TimeEntry {
        TimeEntry {
            id: id.to_string(),
            user_id: "emp_001".to_string(),
            project_id: None,
            clock_in: start,
            clock_out: end,
            approved: true,
        }
    }

    #[test]
    fn test_groups_by_clock_in_date() {
        let entries = vec![
            create_entry("a", make_datetime(7, 8, 0), Some(make_datetime(7, 12, 0))),
            create_entry("b", make_datetime(7, 13, 0), Some(make_datetime(7, 17, 0))),
            create_entry("c", make_datetime(8, 22, 0), Some(make_datetime(9, 2, 0))),
        ];

        let grouped = group_completed_entries(&entries);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&make_date(7)].len(), 2);
        assert_eq!(grouped[&make_date(8)].len(), 1);
        assert!(!grouped.contains_key(&make_date(9)));
    }

    #[test]
    fn test_open_entries_are_excluded() {
        let entries = vec![create_entry("open", make_datetime(7, 8, 0), None)];
        assert!(group_completed_entries(&entries).is_empty());
    }

    #[test]
    fn test_worked_hours_sums_minutes() {
        let a = create_entry("a", make_datetime(7, 8, 0), Some(make_datetime(7, 12, 20)));
        let b = create_entry("b", make_datetime(7, 13, 0), Some(make_datetime(7, 17, 40)));
        // 260 + 280 = 540 minutes
        assert_eq!(worked_hours(&[&a, &b]), dec("9"));
    }

    #[test]
    fn test_worked_hours_rounds_to_two_places() {
        let a = create_entry("a", make_datetime(7, 8, 0), Some(make_datetime(7, 8, 10)));
        // 10 / 60 = 0.1666..
        assert_eq!(worked_hours(&[&a]), dec("0.17"));
    }

    #[test]
    fn test_overtime_only_when_norm_met() {
        let under = summarize_day(make_date(7), dec("7.99"), dec("8"));
        assert_eq!(under.overtime_hours, Decimal::ZERO);

        let exact = summarize_day(make_date(7), dec("8"), dec("8"));
        assert_eq!(exact.overtime_hours, Decimal::ZERO);

        let over = summarize_day(make_date(7), dec("10.5"), dec("8"));
        assert_eq!(over.overtime_hours, dec("2.5"));
        assert_eq!(over.weekday, Weekday::Mon);
    }

    #[test]
    fn test_zero_norm_counts_all_hours_as_overtime() {
        let summary = summarize_day(make_date(12), dec("5"), Decimal::ZERO);
        assert_eq!(summary.overtime_hours, dec("5"));
    }
}
