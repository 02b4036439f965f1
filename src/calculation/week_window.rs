//! Payroll week windows.
//!
//! Payroll weeks start on a configurable weekday. Every place that needs to
//! place a date inside a week goes through [`weekday_offset`], so the report
//! and the "available weeks" list always agree on week boundaries.

use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::daily_summary::group_completed_entries;
use crate::error::{EngineError, EngineResult};
use crate::models::{TimeEntry, weekday_name};

/// Days from the most recent `week_start` weekday to `date` (0..=6).
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::weekday_offset;
/// use chrono::{NaiveDate, Weekday};
///
/// // Monday 7 July 2025 is four days after Thursday 3 July
/// let monday = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
/// assert_eq!(weekday_offset(monday, Weekday::Thu), 4);
/// assert_eq!(weekday_offset(monday, Weekday::Mon), 0);
/// ```
pub fn weekday_offset(date: NaiveDate, week_start: Weekday) -> u32 {
    (date.weekday().num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7
}

/// A 7-day payroll window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekWindow {
    /// First date of the window.
    pub start_date: NaiveDate,
    /// Last date of the window (start + 6 days).
    pub end_date: NaiveDate,
}

impl WeekWindow {
    fn from_start(start_date: NaiveDate) -> EngineResult<Self> {
        let end_date = start_date.checked_add_days(Days::new(6)).ok_or_else(|| {
            EngineError::InvalidDateRange {
                message: format!(
                    "week starting {} ends past the last supported date",
                    start_date
                ),
            }
        })?;
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// The window that contains `date` for weeks starting on `week_start`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDateRange`] if the window would extend
    /// past the calendar range chrono supports.
    pub fn containing(date: NaiveDate, week_start: Weekday) -> EngineResult<Self> {
        let offset = u64::from(weekday_offset(date, week_start));
        let start_date = date.checked_sub_days(Days::new(offset)).ok_or_else(|| {
            EngineError::InvalidDateRange {
                message: format!(
                    "week containing {} starts before the first supported date",
                    date
                ),
            }
        })?;
        Self::from_start(start_date)
    }

    /// The window starting on `start_date`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDateRange`] if `start_date` does not
    /// fall on `week_start`, or if the window would end past the last
    /// supported date.
    pub fn starting_at(start_date: NaiveDate, week_start: Weekday) -> EngineResult<Self> {
        if start_date.weekday() != week_start {
            return Err(EngineError::InvalidDateRange {
                message: format!(
                    "week start {} is a {}, expected {}",
                    start_date,
                    weekday_name(start_date.weekday()),
                    weekday_name(week_start)
                ),
            });
        }
        Self::from_start(start_date)
    }

    /// The seven dates of the window in calendar order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |date| *date <= end)
    }

    /// Returns true if `date` falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Every window that intersects the inclusive range `start..=end`.
///
/// `start` is aligned down to the week start, so the first window may begin
/// before the range does.
///
/// # Errors
///
/// Returns [`EngineError::InvalidDateRange`] if `end` is before `start`,
/// or if a window in the range would end past the last supported date.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::windows_covering;
/// use chrono::{NaiveDate, Weekday};
///
/// let start = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 7, 11).unwrap();
/// let windows = windows_covering(start, end, Weekday::Thu).unwrap();
///
/// // Thu 3 Jul - Wed 9 Jul and Thu 10 Jul - Wed 16 Jul
/// assert_eq!(windows.len(), 2);
/// assert_eq!(windows[0].start_date, NaiveDate::from_ymd_opt(2025, 7, 3).unwrap());
/// ```
pub fn windows_covering(
    start: NaiveDate,
    end: NaiveDate,
    week_start: Weekday,
) -> EngineResult<Vec<WeekWindow>> {
    if end < start {
        return Err(EngineError::InvalidDateRange {
            message: format!("end date {} is before start date {}", end, start),
        });
    }

    let mut windows = Vec::new();
    let mut next_start = Some(WeekWindow::containing(start, week_start)?.start_date);
    while let Some(start_date) = next_start.filter(|start_date| *start_date <= end) {
        windows.push(WeekWindow::from_start(start_date)?);
        next_start = start_date.checked_add_days(Days::new(7));
    }
    Ok(windows)
}

/// Distinct windows that contain at least one completed time entry, newest
/// first.
///
/// When `year` is given, only windows starting in that year are returned.
///
/// # Errors
///
/// Returns [`EngineError::InvalidDateRange`] if an entry's week cannot be
/// represented.
pub fn available_weeks<'a, I>(
    entries: I,
    week_start: Weekday,
    year: Option<i32>,
) -> EngineResult<Vec<WeekWindow>>
where
    I: IntoIterator<Item = &'a TimeEntry>,
{
    let mut windows = BTreeSet::new();
    for date in group_completed_entries(entries).into_keys() {
        let window = WeekWindow::containing(date, week_start)?;
        if year.is_none_or(|year| window.start_date.year() == year) {
            windows.insert(window);
        }
    }
    Ok(windows.into_iter().rev().collect())
}
