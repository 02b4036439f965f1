//! Daily pay calculation.
//!
//! This module turns one day's [`DailyWorkSummary`] and the resolved
//! [`SalarySetting`] into a [`DailyPayResult`].
//!
//! Employees on a monthly salary are already paid for their scheduled
//! workdays, so only days worked outside the schedule produce pay ("extra"
//! days). Everyone else is paid the daily salary plus overtime for every
//! day worked.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{DailyPayResult, DailyWorkSummary, SalarySetting};

/// Decimal places kept on monetary amounts.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Rounds a monetary amount to [`MONEY_DECIMAL_PLACES`], midpoint away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Computes the pay for one worked day.
///
/// Overtime is paid only when the setting has a positive norm and the norm
/// was met, regardless of the overtime hours carried on the summary.
///
/// # Arguments
///
/// * `summary` - Hours worked on the day
/// * `setting` - The salary setting in force on the day
/// * `was_scheduled_workday` - Whether the setting schedules this weekday
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_daily_pay;
/// use payroll_engine::models::{DailyWorkSummary, SalarySetting, WeekdayAmounts, WorkSchedule};
/// use chrono::{NaiveDate, Weekday};
/// use rust_decimal::Decimal;
///
/// let setting = SalarySetting {
///     user_id: "emp_001".to_string(),
///     effective_from: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     daily_salary: WeekdayAmounts::uniform(Decimal::new(30, 0)),
///     overtime_rate: WeekdayAmounts::uniform(Decimal::new(9, 0)),
///     norm_daily_hours: Decimal::new(8, 0),
///     has_monthly_salary: false,
///     monthly_salary: None,
///     monthly_periods: None,
///     work_schedule: WorkSchedule::monday_to_friday(),
/// };
/// let summary = DailyWorkSummary {
///     date: NaiveDate::from_ymd_opt(2025, 7, 7).unwrap(),
///     weekday: Weekday::Mon,
///     worked_hours: Decimal::new(9, 0),
///     norm_hours: Decimal::new(8, 0),
///     overtime_hours: Decimal::new(1, 0),
/// };
///
/// let pay = calculate_daily_pay(&summary, &setting, true);
/// assert_eq!(pay.regular_pay, Decimal::new(39, 0));
/// assert_eq!(pay.total_pay, Decimal::new(39, 0));
/// assert!(pay.is_regular_day);
/// ```
pub fn calculate_daily_pay(
    summary: &DailyWorkSummary,
    setting: &SalarySetting,
    was_scheduled_workday: bool,
) -> DailyPayResult {
    let daily_salary = setting.daily_salary_for(summary.weekday);
    let overtime_rate = setting.overtime_rate_for(summary.weekday);

    let overtime_eligible =
        summary.norm_hours > Decimal::ZERO && summary.worked_hours >= summary.norm_hours;
    let paid_overtime_hours = if overtime_eligible {
        summary.overtime_hours
    } else {
        Decimal::ZERO
    };
    let overtime_pay = round_money(paid_overtime_hours * overtime_rate);
    let day_pay = round_money(daily_salary) + overtime_pay;

    let (regular_pay, extra_pay, is_regular_day, is_extra_day) = if setting.has_monthly_salary {
        if was_scheduled_workday {
            // Covered by the monthly salary
            (Decimal::ZERO, Decimal::ZERO, true, false)
        } else {
            (Decimal::ZERO, day_pay, false, true)
        }
    } else {
        (day_pay, Decimal::ZERO, true, false)
    };

    DailyPayResult {
        daily_salary,
        overtime_rate,
        paid_overtime_hours,
        overtime_pay,
        regular_pay,
        extra_pay,
        total_pay: regular_pay + extra_pay,
        is_regular_day,
        is_extra_day,
    }
}
