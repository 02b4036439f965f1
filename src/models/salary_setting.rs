//! Salary setting model.
//!
//! A [`SalarySetting`] is one versioned salary configuration for one
//! employee. Settings are never edited in place: a change in pay is recorded
//! as a new setting with a later `effective_from` date.

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::schedule::{WeekdayAmounts, WorkSchedule, weekday_key};
use crate::error::{EngineError, EngineResult};

/// Pay periods per year accepted for monthly-salaried employees.
pub const ALLOWED_MONTHLY_PERIODS: [u8; 2] = [12, 14];

/// One effective-dated salary configuration for an employee.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{SalarySetting, WeekdayAmounts, WorkSchedule};
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
/// assert!(setting.works_on(Weekday::Mon));
/// assert!(!setting.works_on(Weekday::Sun));
/// assert!(setting.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalarySetting {
    /// The employee this setting belongs to.
    pub user_id: String,
    /// Inclusive date from which this setting applies.
    pub effective_from: NaiveDate,
    /// Base daily salary for each weekday.
    pub daily_salary: WeekdayAmounts,
    /// Hourly overtime rate for each weekday.
    pub overtime_rate: WeekdayAmounts,
    /// Hours per day before overtime accrues.
    pub norm_daily_hours: Decimal,
    /// When true, scheduled workdays are covered by a monthly salary and only
    /// unscheduled days are paid on top.
    #[serde(default)]
    pub has_monthly_salary: bool,
    /// Monthly salary amount (informational).
    #[serde(default)]
    pub monthly_salary: Option<Decimal>,
    /// Salary payments per year, 12 or 14 (informational).
    #[serde(default)]
    pub monthly_periods: Option<u8>,
    /// Weekdays the employee is regularly scheduled to work.
    pub work_schedule: WorkSchedule,
}

impl SalarySetting {
    /// Returns true if the weekday is a scheduled workday under this setting.
    pub fn works_on(&self, weekday: Weekday) -> bool {
        self.work_schedule.contains(weekday)
    }

    /// Returns the daily salary for the weekday.
    pub fn daily_salary_for(&self, weekday: Weekday) -> Decimal {
        self.daily_salary.get(weekday)
    }

    /// Returns the hourly overtime rate for the weekday.
    pub fn overtime_rate_for(&self, weekday: Weekday) -> Decimal {
        self.overtime_rate.get(weekday)
    }

    /// Validates the setting before it is stored.
    ///
    /// Invalid values are reported field by field and never clamped.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSalarySetting`] if any amount is
    /// negative, the user id is blank, or `monthly_periods` is not 12 or 14.
    pub fn validate(&self) -> EngineResult<()> {
        if self.user_id.trim().is_empty() {
            return Err(invalid("user_id", "must not be empty"));
        }

        for (table, amounts) in [
            ("daily_salary", &self.daily_salary),
            ("overtime_rate", &self.overtime_rate),
        ] {
            if let Some((day, _)) = amounts.iter().find(|(_, amount)| amount.is_sign_negative()) {
                return Err(invalid(
                    &format!("{}.{}", table, weekday_key(day)),
                    "must not be negative",
                ));
            }
        }

        if self.norm_daily_hours.is_sign_negative() {
            return Err(invalid("norm_daily_hours", "must not be negative"));
        }
        if self.norm_daily_hours > Decimal::from(24) {
            return Err(invalid("norm_daily_hours", "must not exceed 24 hours"));
        }

        if let Some(amount) = self.monthly_salary {
            if amount.is_sign_negative() {
                return Err(invalid("monthly_salary", "must not be negative"));
            }
        }
        if let Some(periods) = self.monthly_periods {
            if !ALLOWED_MONTHLY_PERIODS.contains(&periods) {
                return Err(invalid("monthly_periods", "must be 12 or 14"));
            }
        }

        Ok(())
    }
}

/// The stored or submitted form of a salary setting.
///
/// Older records carry a `days_per_week` count instead of a weekday set.
/// Those are converted once, into the first N weekdays starting Monday, when
/// the record becomes a [`SalarySetting`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalarySettingRecord {
    /// The employee this setting belongs to.
    pub user_id: String,
    /// Inclusive date from which this setting applies.
    pub effective_from: NaiveDate,
    /// Base daily salary for each weekday.
    pub daily_salary: WeekdayAmounts,
    /// Hourly overtime rate for each weekday.
    pub overtime_rate: WeekdayAmounts,
    /// Hours per day before overtime accrues.
    pub norm_daily_hours: Decimal,
    /// Whether the employee is on a monthly salary.
    #[serde(default)]
    pub has_monthly_salary: bool,
    /// Monthly salary amount.
    #[serde(default)]
    pub monthly_salary: Option<Decimal>,
    /// Salary payments per year.
    #[serde(default)]
    pub monthly_periods: Option<u8>,
    /// Scheduled weekdays.
    #[serde(default)]
    pub work_schedule: Option<WorkSchedule>,
    /// Legacy workday count, used only when `work_schedule` is absent.
    #[serde(default)]
    pub days_per_week: Option<u8>,
}

impl TryFrom<SalarySettingRecord> for SalarySetting {
    type Error = EngineError;

    fn try_from(record: SalarySettingRecord) -> EngineResult<Self> {
        let work_schedule = match (record.work_schedule, record.days_per_week) {
            (Some(schedule), _) => schedule,
            (None, Some(days)) => WorkSchedule::from_days_per_week(days)
                .ok_or_else(|| invalid("days_per_week", "must be between 0 and 7"))?,
            (None, None) => return Err(invalid("work_schedule", "is required")),
        };

        Ok(SalarySetting {
            user_id: record.user_id,
            effective_from: record.effective_from,
            daily_salary: record.daily_salary,
            overtime_rate: record.overtime_rate,
            norm_daily_hours: record.norm_daily_hours,
            has_monthly_salary: record.has_monthly_salary,
            monthly_salary: record.monthly_salary,
            monthly_periods: record.monthly_periods,
            work_schedule,
        })
    }
}

fn invalid(field: &str, message: &str) -> EngineError {
    EngineError::InvalidSalarySetting {
        field: field.to_string(),
        message: message.to_string(),
    }
}
