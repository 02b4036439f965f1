//! Payroll reports over a date range.
//!
//! A report runs the weekly aggregation for every active employee and every
//! week window that intersects the requested range. Employees are processed
//! in parallel with [`rayon`].

use chrono::{NaiveDate, Weekday};
use rayon::prelude::*;
use tracing::info;

use super::schedule_resolver::SalarySchedule;
use super::week_window::{WeekWindow, available_weeks, windows_covering};
use super::weekly_payroll::{build_week, has_completed_entries};
use crate::error::EngineResult;
use crate::models::{Employee, SalarySetting, WeeklyPayrollEntry};
use crate::repository::PayrollRepository;

/// One employee-week of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportWeek {
    /// The computed week.
    pub week: WeeklyPayrollEntry,
    /// Settings effective on or before the week's last day, most recent
    /// first. This is the history the week was computed from.
    pub salary_settings: Vec<SalarySetting>,
}

/// Builds the payroll report for `start..=end`.
///
/// `start` is aligned down to the week start. Only employee-weeks with at
/// least one completed time entry are included. Results are ordered by week
/// start, then by employee name.
///
/// # Errors
///
/// Returns [`EngineError::InvalidDateRange`](crate::error::EngineError::InvalidDateRange)
/// if `end` is before `start`, or any error raised by the repository.
pub fn build_report(
    repository: &dyn PayrollRepository,
    start: NaiveDate,
    end: NaiveDate,
    week_start: Weekday,
) -> EngineResult<Vec<ReportWeek>> {
    let windows = windows_covering(start, end, week_start)?;
    let employees = repository.active_employees()?;

    let per_employee = employees
        .par_iter()
        .map(|employee| employee_weeks(repository, employee, &windows, week_start))
        .collect::<EngineResult<Vec<Vec<ReportWeek>>>>()?;

    let mut entries: Vec<ReportWeek> = per_employee.into_iter().flatten().collect();
    entries.sort_by(|a, b| {
        a.week
            .week_start_date
            .cmp(&b.week.week_start_date)
            .then_with(|| a.week.user_name.cmp(&b.week.user_name))
            .then_with(|| a.week.user_id.cmp(&b.week.user_id))
    });

    info!(
        %start,
        %end,
        weeks = windows.len(),
        employees = employees.len(),
        entries = entries.len(),
        "built payroll report"
    );
    Ok(entries)
}

fn employee_weeks(
    repository: &dyn PayrollRepository,
    employee: &Employee,
    windows: &[WeekWindow],
    week_start: Weekday,
) -> EngineResult<Vec<ReportWeek>> {
    let (Some(first), Some(last)) = (windows.first(), windows.last()) else {
        return Ok(Vec::new());
    };

    let time_entries = repository.time_entries(&employee.id, first.start_date, last.end_date)?;
    if time_entries.is_empty() {
        return Ok(Vec::new());
    }
    let schedule =
        SalarySchedule::from_settings(employee.id.clone(), repository.salary_settings(&employee.id)?)?;

    windows
        .iter()
        .filter(|window| has_completed_entries(&employee.id, &time_entries, window))
        .map(|window| {
            let week = build_week(employee, &time_entries, &schedule, window.start_date, week_start)?;
            Ok(ReportWeek {
                week,
                salary_settings: schedule.applicable_up_to(window.end_date).cloned().collect(),
            })
        })
        .collect()
}

/// Week windows that contain completed time entries of active employees,
/// newest first, optionally limited to windows starting in `year`.
pub fn report_weeks(
    repository: &dyn PayrollRepository,
    week_start: Weekday,
    year: Option<i32>,
) -> EngineResult<Vec<WeekWindow>> {
    let active: Vec<String> = repository
        .active_employees()?
        .into_iter()
        .map(|employee| employee.id)
        .collect();
    let entries = repository.all_time_entries()?;

    available_weeks(
        entries.iter().filter(|entry| active.contains(&entry.user_id)),
        week_start,
        year,
    )
}
