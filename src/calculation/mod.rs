//! Calculation logic for the payroll engine.
//!
//! This module contains the payroll rules: effective-dated salary setting
//! resolution, daily work summaries, daily pay, week windows, weekly
//! aggregation and reports over a date range.

mod daily_pay;
mod daily_summary;
mod effective_history;
mod report;
mod schedule_resolver;
mod week_window;
mod weekly_payroll;

pub use daily_pay::{MONEY_DECIMAL_PLACES, calculate_daily_pay, round_money};
pub use daily_summary::{
    HOURS_DECIMAL_PLACES, group_completed_entries, round_hours, summarize_day, worked_hours,
};
pub use effective_history::{EffectiveDated, EffectiveHistory};
pub use report::{ReportWeek, build_report, report_weeks};
pub use schedule_resolver::{SalarySchedule, resolve_salary_setting};
pub use week_window::{WeekWindow, available_weeks, weekday_offset, windows_covering};
pub use weekly_payroll::{build_week, has_completed_entries, sum_day_totals};
