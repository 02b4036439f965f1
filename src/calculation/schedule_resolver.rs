//! Salary setting resolution.
//!
//! Given an employee's salary setting history and a date, these functions
//! find the single setting in force on that date.

use chrono::NaiveDate;
use tracing::debug;

use super::effective_history::EffectiveHistory;
use crate::error::{EngineError, EngineResult};
use crate::models::SalarySetting;

/// One employee's salary setting history, sorted by effective date.
pub type SalarySchedule = EffectiveHistory<SalarySetting>;

/// Resolves the salary setting in force on `date` from an unsorted history.
///
/// The applicable setting is the one with the latest `effective_from` on or
/// before `date`. `user_id` is only used to describe the error.
///
/// # Errors
///
/// Returns [`EngineError::MissingSchedule`] when every setting starts after
/// `date` or the history is empty.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::resolve_salary_setting;
/// use payroll_engine::models::{SalarySetting, WeekdayAmounts, WorkSchedule};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let setting = |from: NaiveDate, salary: i64| SalarySetting {
///     user_id: "emp_001".to_string(),
///     effective_from: from,
///     daily_salary: WeekdayAmounts::uniform(Decimal::new(salary, 0)),
///     overtime_rate: WeekdayAmounts::default(),
///     norm_daily_hours: Decimal::new(8, 0),
///     has_monthly_salary: false,
///     monthly_salary: None,
///     monthly_periods: None,
///     work_schedule: WorkSchedule::monday_to_friday(),
/// };
/// let history = vec![
///     setting(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), 40),
///     setting(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), 30),
/// ];
///
/// let resolved = resolve_salary_setting(
///     "emp_001",
///     &history,
///     NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(resolved.daily_salary.mon, Decimal::new(30, 0));
/// ```
pub fn resolve_salary_setting<'a>(
    user_id: &str,
    history: &'a [SalarySetting],
    date: NaiveDate,
) -> EngineResult<&'a SalarySetting> {
    history
        .iter()
        .filter(|setting| setting.effective_from <= date)
        .max_by_key(|setting| setting.effective_from)
        .ok_or_else(|| EngineError::MissingSchedule {
            user_id: user_id.to_string(),
            date,
        })
}

impl EffectiveHistory<SalarySetting> {
    /// Builds a schedule from an employee's settings, in any order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateEffectiveDate`] if two settings share
    /// an effective date.
    pub fn from_settings(
        user_id: impl Into<String>,
        settings: Vec<SalarySetting>,
    ) -> EngineResult<Self> {
        EffectiveHistory::from_records(user_id, settings)
    }

    /// Resolves the setting in force on `date`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingSchedule`] when no setting is effective
    /// on or before `date`.
    pub fn resolve(&self, date: NaiveDate) -> EngineResult<&SalarySetting> {
        match self.resolve_at(date) {
            Some(setting) => Ok(setting),
            None => {
                debug!(user_id = %self.subject(), %date, "no salary setting effective");
                Err(EngineError::MissingSchedule {
                    user_id: self.subject().to_string(),
                    date,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{WeekdayAmounts, WorkSchedule};
    use rust_decimal::Decimal;

    fn make_date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    fn create_setting(from: NaiveDate, salary: i64) -> SalarySetting {
        SalarySetting {
            user_id: "emp_001".to_string(),
            effective_from: from,
            daily_salary: WeekdayAmounts::uniform(Decimal::new(salary, 0)),
            overtime_rate: WeekdayAmounts::uniform(Decimal::new(9, 0)),
            norm_daily_hours: Decimal::new(8, 0),
            has_monthly_salary: false,
            monthly_salary: None,
            monthly_periods: None,
            work_schedule: WorkSchedule::monday_to_friday(),
        }
    }

    fn create_history() -> Vec<SalarySetting> {
        vec![
            create_setting(make_date(6, 1), 40),
            create_setting(make_date(1, 1), 30),
            create_setting(make_date(3, 15), 35),
        ]
    }

    #[test]
    fn test_resolves_latest_setting_on_or_before_date() {
        let history = create_history();
        let resolved = resolve_salary_setting("emp_001", &history, make_date(5, 31)).unwrap();
        assert_eq!(resolved.effective_from, make_date(3, 15));
    }

    #[test]
    fn test_effective_date_is_inclusive() {
        let history = create_history();
        let resolved = resolve_salary_setting("emp_001", &history, make_date(6, 1)).unwrap();
        assert_eq!(resolved.daily_salary.mon, Decimal::new(40, 0));
    }

    #[test]
    fn test_date_before_every_setting_is_missing_schedule() {
        let history = create_history();
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();

        match resolve_salary_setting("emp_001", &history, date) {
            Err(EngineError::MissingSchedule { user_id, date: d }) => {
                assert_eq!(user_id, "emp_001");
                assert_eq!(d, date);
            }
            other => panic!("Expected MissingSchedule, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_history_is_missing_schedule() {
        let result = resolve_salary_setting("emp_001", &[], make_date(1, 1));
        assert!(matches!(result, Err(EngineError::MissingSchedule { .. })));
    }

    #[test]
    fn test_prepending_earlier_setting_keeps_later_resolution() {
        let mut history = create_history();
        let before = resolve_salary_setting("emp_001", &history, make_date(2, 1))
            .unwrap()
            .clone();

        history.push(create_setting(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), 20));
        let after = resolve_salary_setting("emp_001", &history, make_date(2, 1)).unwrap();
        assert_eq!(&before, after);
    }

    #[test]
    fn test_schedule_agrees_with_slice_resolution() {
        let history = create_history();
        let schedule = SalarySchedule::from_settings("emp_001", history.clone()).unwrap();

        for month in 1..=12 {
            let date = make_date(month, 1);
            assert_eq!(
                schedule.resolve(date).ok(),
                resolve_salary_setting("emp_001", &history, date).ok()
            );
        }
    }

    #[test]
    fn test_schedule_rejects_duplicate_dates() {
        let settings = vec![
            create_setting(make_date(1, 1), 30),
            create_setting(make_date(1, 1), 31),
        ];
        assert!(matches!(
            SalarySchedule::from_settings("emp_001", settings),
            Err(EngineError::DuplicateEffectiveDate { .. })
        ));
    }

    #[test]
    fn test_schedule_missing_before_first_setting() {
        let schedule = SalarySchedule::from_settings("emp_001", create_history()).unwrap();
        let result = schedule.resolve(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(matches!(result, Err(EngineError::MissingSchedule { .. })));
    }
}
