//! Weekly payroll aggregation.
//!
//! This module assembles one employee's [`WeeklyPayrollEntry`] for a 7-day
//! window: it groups the employee's time entries per day, resolves the
//! salary setting for each date, computes daily pay and sums the week.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::daily_pay::calculate_daily_pay;
use super::daily_summary::{group_completed_entries, summarize_day, worked_hours};
use super::schedule_resolver::SalarySchedule;
use super::week_window::WeekWindow;
use crate::error::EngineResult;
use crate::models::{
    Employee, PayrollDay, PayrollWarning, TimeEntry, WARNING_MISSING_SCHEDULE,
    WeeklyPayrollEntry, WeeklyTotals,
};

/// Builds one employee's payroll for the week starting on `week_start_date`.
///
/// Entries belonging to other employees or falling outside the window are
/// ignored, as are open entries. A day with entries but no effective salary
/// setting is left out of the totals and reported as a
/// [`WARNING_MISSING_SCHEDULE`] warning.
///
/// # Errors
///
/// Returns [`EngineError::InvalidDateRange`](crate::error::EngineError::InvalidDateRange)
/// if `week_start_date` does not fall on `week_start_weekday`, and
/// [`EngineError::InvalidTimeEntry`](crate::error::EngineError::InvalidTimeEntry)
/// if one of the employee's entries clocks out before it clocks in.
pub fn build_week(
    employee: &Employee,
    time_entries: &[TimeEntry],
    schedule: &SalarySchedule,
    week_start_date: NaiveDate,
    week_start_weekday: Weekday,
) -> EngineResult<WeeklyPayrollEntry> {
    let window = WeekWindow::starting_at(week_start_date, week_start_weekday)?;

    let own_entries: Vec<&TimeEntry> = time_entries
        .iter()
        .filter(|entry| entry.user_id == employee.id && window.contains(entry.work_date()))
        .collect();
    for entry in &own_entries {
        entry.validate()?;
    }
    let grouped = group_completed_entries(own_entries);

    let mut days = Vec::with_capacity(7);
    let mut warnings = Vec::new();

    for date in window.dates() {
        let day_entries = grouped.get(&date).map(Vec::as_slice).unwrap_or_default();
        let hours = worked_hours(day_entries);

        let day = match schedule.resolve(date) {
            Ok(setting) => {
                let was_scheduled_workday = setting.works_on(date.weekday());
                let summary = summarize_day(date, hours, setting.norm_daily_hours);
                let pay = (!day_entries.is_empty())
                    .then(|| calculate_daily_pay(&summary, setting, was_scheduled_workday));

                PayrollDay {
                    date,
                    weekday: date.weekday(),
                    entry_count: day_entries.len(),
                    worked_hours: hours,
                    was_scheduled_workday,
                    summary: Some(summary),
                    pay,
                }
            }
            Err(error) => {
                if !day_entries.is_empty() {
                    warn!(
                        user_id = %employee.id,
                        %date,
                        worked_hours = %hours,
                        "worked day has no salary setting, excluded from totals"
                    );
                    warnings.push(PayrollWarning {
                        code: WARNING_MISSING_SCHEDULE.to_string(),
                        message: error.to_string(),
                        date: Some(date),
                    });
                }

                PayrollDay {
                    date,
                    weekday: date.weekday(),
                    entry_count: day_entries.len(),
                    worked_hours: hours,
                    was_scheduled_workday: false,
                    summary: None,
                    pay: None,
                }
            }
        };
        days.push(day);
    }

    let scheduled_workdays_count = schedule
        .resolve_at(window.end_date)
        .map(|setting| setting.work_schedule.len());
    let totals = WeeklyTotals::from_days(&days);

    debug!(
        user_id = %employee.id,
        week_start = %week_start_date,
        total_pay = %totals.total_pay,
        warnings = warnings.len(),
        "built payroll week"
    );

    Ok(WeeklyPayrollEntry {
        user_id: employee.id.clone(),
        user_name: employee.full_name.clone(),
        user_type: employee.user_type.clone(),
        week_start_date,
        scheduled_workdays_count,
        days,
        totals,
        warnings,
    })
}

/// Returns true if the employee has a completed entry inside the window.
pub fn has_completed_entries(employee_id: &str, time_entries: &[TimeEntry], window: &WeekWindow) -> bool {
    time_entries.iter().any(|entry| {
        entry.user_id == employee_id && !entry.is_open() && window.contains(entry.work_date())
    })
}

/// Sum of the daily totals of a week. Always equal to `entry.totals.total_pay`.
pub fn sum_day_totals(entry: &WeeklyPayrollEntry) -> Decimal {
    entry.days.iter().map(PayrollDay::total_pay).sum()
}
