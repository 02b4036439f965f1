//! Payroll result models.
//!
//! This module contains the per-day and per-week outputs of the payroll
//! calculation: [`DailyWorkSummary`], [`DailyPayResult`], [`PayrollDay`] and
//! the [`WeeklyPayrollEntry`] that collects seven of them.

use chrono::{DateTime, Days, NaiveDate, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hours worked on one calendar date, measured against the daily norm.
///
/// # Example
///
/// ```
/// use payroll_engine::models::DailyWorkSummary;
/// use chrono::{NaiveDate, Weekday};
/// use rust_decimal::Decimal;
///
/// let summary = DailyWorkSummary {
///     date: NaiveDate::from_ymd_opt(2025, 7, 7).unwrap(),
///     weekday: Weekday::Mon,
///     worked_hours: Decimal::new(9, 0),
///     norm_hours: Decimal::new(8, 0),
///     overtime_hours: Decimal::new(1, 0),
/// };
/// assert!(!summary.is_underworked());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyWorkSummary {
    /// The calendar date.
    pub date: NaiveDate,
    /// Day of the week of `date`.
    pub weekday: Weekday,
    /// Completed hours, rounded to 2 decimal places.
    pub worked_hours: Decimal,
    /// Daily norm copied from the resolved salary setting.
    pub norm_hours: Decimal,
    /// Hours above the norm, zero unless the norm was met.
    pub overtime_hours: Decimal,
}

impl DailyWorkSummary {
    /// Returns true if fewer hours were worked than the norm requires.
    pub fn is_underworked(&self) -> bool {
        self.worked_hours < self.norm_hours
    }
}

/// Pay computed for one worked day.
///
/// Exactly one of `is_regular_day` and `is_extra_day` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPayResult {
    /// Daily salary for the weekday.
    pub daily_salary: Decimal,
    /// Hourly overtime rate for the weekday.
    pub overtime_rate: Decimal,
    /// Overtime hours that were actually paid.
    pub paid_overtime_hours: Decimal,
    /// `paid_overtime_hours * overtime_rate`, rounded.
    pub overtime_pay: Decimal,
    /// Pay for a regular day.
    pub regular_pay: Decimal,
    /// Pay for a day worked outside a monthly salary schedule.
    pub extra_pay: Decimal,
    /// `regular_pay + extra_pay`.
    pub total_pay: Decimal,
    /// The day counts as a regular day.
    pub is_regular_day: bool,
    /// The day is paid on top of the monthly salary.
    pub is_extra_day: bool,
}

/// One calendar day inside a weekly payroll entry.
///
/// A day is in exactly one of four situations: worked and paid, worked but
/// without any effective salary setting, a scheduled day without entries,
/// or an unscheduled day without entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollDay {
    /// The calendar date.
    pub date: NaiveDate,
    /// Day of the week of `date`.
    pub weekday: Weekday,
    /// Number of completed time entries clocked in on this date.
    pub entry_count: usize,
    /// Completed hours on this date, rounded to 2 decimal places.
    pub worked_hours: Decimal,
    /// Whether the effective setting schedules this weekday.
    pub was_scheduled_workday: bool,
    /// Work summary, present when a salary setting was resolved.
    pub summary: Option<DailyWorkSummary>,
    /// Computed pay, present only for days with entries and a setting.
    pub pay: Option<DailyPayResult>,
}

impl PayrollDay {
    /// Returns true if at least one completed entry was clocked in on this date.
    pub fn has_entries(&self) -> bool {
        self.entry_count > 0
    }

    /// Returns true if a salary setting was effective on this date.
    pub fn has_schedule(&self) -> bool {
        self.summary.is_some()
    }

    /// A scheduled workday on which nothing was recorded.
    pub fn is_day_off(&self) -> bool {
        !self.has_entries() && self.was_scheduled_workday
    }

    /// Total pay for the day, zero when no pay was computed.
    pub fn total_pay(&self) -> Decimal {
        self.pay
            .as_ref()
            .map(|pay| pay.total_pay)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Aggregated totals for a payroll week.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyTotals {
    /// Sum of daily regular pay.
    pub regular_pay: Decimal,
    /// Sum of daily extra pay.
    pub extra_pay: Decimal,
    /// Sum of daily total pay.
    pub total_pay: Decimal,
    /// Hours worked on paid days.
    pub worked_hours: Decimal,
    /// Overtime hours on paid days.
    pub overtime_hours: Decimal,
}

impl WeeklyTotals {
    /// Sums the paid days. Days without a pay result contribute nothing.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{PayrollDay, WeeklyTotals};
    ///
    /// let totals = WeeklyTotals::from_days(&[] as &[PayrollDay]);
    /// assert!(totals.total_pay.is_zero());
    /// ```
    pub fn from_days(days: &[PayrollDay]) -> Self {
        days.iter()
            .filter_map(|day| day.pay.as_ref().zip(day.summary.as_ref()))
            .fold(WeeklyTotals::default(), |mut totals, (pay, summary)| {
                totals.regular_pay += pay.regular_pay;
                totals.extra_pay += pay.extra_pay;
                totals.total_pay += pay.total_pay;
                totals.worked_hours += summary.worked_hours;
                totals.overtime_hours += pay.paid_overtime_hours;
                totals
            })
    }
}

/// A non-fatal problem found while building a payroll week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollWarning {
    /// A code identifying the type of warning (e.g. `missing_schedule`).
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The date the warning refers to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// Warning code for a worked day with no effective salary setting.
pub const WARNING_MISSING_SCHEDULE: &str = "missing_schedule";

/// One employee's payroll for one 7-day window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPayrollEntry {
    /// The employee id.
    pub user_id: String,
    /// The employee's display name.
    pub user_name: String,
    /// Display label for the employee type.
    pub user_type: String,
    /// First date of the window.
    pub week_start_date: NaiveDate,
    /// Scheduled workdays per week under the setting effective on the last
    /// day of the window. `None` when no setting was effective then.
    pub scheduled_workdays_count: Option<u32>,
    /// Exactly seven days in calendar order from `week_start_date`.
    pub days: Vec<PayrollDay>,
    /// Sum of the paid days.
    pub totals: WeeklyTotals,
    /// Problems that did not stop the calculation.
    #[serde(default)]
    pub warnings: Vec<PayrollWarning>,
}

impl WeeklyPayrollEntry {
    /// Last date of the window.
    ///
    /// Entries are only built for windows that fit the calendar, so this
    /// saturates rather than fails.
    pub fn week_end_date(&self) -> NaiveDate {
        self.week_start_date
            .checked_add_days(Days::new(6))
            .unwrap_or(NaiveDate::MAX)
    }
}

/// The envelope returned by a stateless payroll calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollCalculation {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The computed week.
    pub entry: WeeklyPayrollEntry,
}
