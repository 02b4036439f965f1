//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod payroll;
mod salary_setting;
mod schedule;
mod time_entry;

pub use employee::{Employee, Principal, Role};
pub use payroll::{
    DailyPayResult, DailyWorkSummary, PayrollCalculation, PayrollDay, PayrollWarning,
    WARNING_MISSING_SCHEDULE, WeeklyPayrollEntry, WeeklyTotals,
};
pub use salary_setting::{ALLOWED_MONTHLY_PERIODS, SalarySetting, SalarySettingRecord};
pub use schedule::{
    ALL_WEEKDAYS, WeekdayAmounts, WorkSchedule, parse_weekday, weekday_key, weekday_name,
};
pub use time_entry::TimeEntry;
