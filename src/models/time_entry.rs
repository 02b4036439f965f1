//! Time entry model.
//!
//! A [`TimeEntry`] is one clock-in/clock-out record. Entries are attributed
//! to the calendar date of their clock-in, even when they run past midnight.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A single clock-in/clock-out record for an employee.
///
/// # Example
///
/// ```
/// use payroll_engine::models::TimeEntry;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
/// let entry = TimeEntry {
///     id: "te_001".to_string(),
///     user_id: "emp_001".to_string(),
///     project_id: None,
///     clock_in: day.and_hms_opt(8, 0, 0).unwrap(),
///     clock_out: Some(day.and_hms_opt(16, 30, 0).unwrap()),
///     approved: true,
/// };
/// assert_eq!(entry.worked_minutes(), Some(510));
/// assert_eq!(entry.work_date(), day);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Unique identifier for the entry.
    pub id: String,
    /// The employee who clocked in.
    pub user_id: String,
    /// Project the time was booked against, if any.
    #[serde(default)]
    pub project_id: Option<String>,
    /// When the employee clocked in.
    pub clock_in: NaiveDateTime,
    /// When the employee clocked out. `None` while the entry is still open.
    #[serde(default)]
    pub clock_out: Option<NaiveDateTime>,
    /// Whether a manager approved the entry.
    #[serde(default)]
    pub approved: bool,
}

impl TimeEntry {
    /// The date the entry counts towards (the clock-in date).
    pub fn work_date(&self) -> NaiveDate {
        self.clock_in.date()
    }

    /// Returns true if the employee has not clocked out yet.
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    /// Whole minutes between clock-in and clock-out, or `None` for open entries.
    pub fn worked_minutes(&self) -> Option<i64> {
        self.clock_out
            .map(|clock_out| (clock_out - self.clock_in).num_minutes())
    }

    /// Returns true if the two entries share any instant.
    ///
    /// Open entries are treated as extending indefinitely. Entries that only
    /// touch (one ends exactly when the other starts) do not overlap.
    pub fn overlaps(&self, other: &TimeEntry) -> bool {
        let self_before_other_ends = other.clock_out.is_none_or(|end| self.clock_in < end);
        let other_before_self_ends = self.clock_out.is_none_or(|end| other.clock_in < end);
        self_before_other_ends && other_before_self_ends
    }

    /// Validates the entry on its own.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidTimeEntry`] if the entry has no id or
    /// user, or if it clocks out before it clocks in.
    pub fn validate(&self) -> EngineResult<()> {
        if self.id.trim().is_empty() {
            return Err(EngineError::InvalidTimeEntry {
                entry_id: self.id.clone(),
                message: "entry id must not be empty".to_string(),
            });
        }
        if self.user_id.trim().is_empty() {
            return Err(EngineError::InvalidTimeEntry {
                entry_id: self.id.clone(),
                message: "user id must not be empty".to_string(),
            });
        }
        if let Some(clock_out) = self.clock_out {
            if clock_out < self.clock_in {
                return Err(EngineError::InvalidTimeEntry {
                    entry_id: self.id.clone(),
                    message: format!(
                        "clock out {} is before clock in {}",
                        clock_out, self.clock_in
                    ),
                });
            }
        }
        Ok(())
    }
}
