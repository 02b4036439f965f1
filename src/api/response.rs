//! Response types for the payroll API.
//!
//! This module defines the JSON shapes returned by the endpoints, the
//! presentation status of each payroll day, and the mapping from
//! [`EngineError`] to HTTP error responses.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::WeekWindow;
use crate::error::EngineError;
use crate::models::{
    PayrollDay, PayrollWarning, SalarySetting, WeeklyPayrollEntry, WeeklyTotals, weekday_name,
};

/// How a payroll day is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// Time was recorded and paid.
    Worked,
    /// A scheduled workday with no time recorded.
    DayOff,
    /// An unscheduled day with no time recorded.
    Blank,
    /// Time was recorded but no salary setting was in force.
    MissingSchedule,
}

impl DayStatus {
    /// Classifies a day. Every day gets exactly one status.
    pub fn of(day: &PayrollDay) -> Self {
        match (day.has_entries(), day.has_schedule()) {
            (true, true) => DayStatus::Worked,
            (true, false) => DayStatus::MissingSchedule,
            (false, _) if day.was_scheduled_workday => DayStatus::DayOff,
            (false, _) => DayStatus::Blank,
        }
    }
}

/// One day of a payroll report entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayResponse {
    /// The calendar date.
    pub date: NaiveDate,
    /// Weekday name.
    pub day: String,
    /// Presentation status.
    pub status: DayStatus,
    /// Daily norm, absent without a salary setting.
    pub norm_hours: Option<Decimal>,
    /// Completed hours.
    pub worked_hours: Decimal,
    /// Hours above the norm.
    pub overtime: Decimal,
    /// Fewer hours worked than the norm on a worked day.
    pub underworked: bool,
    /// Whether the day was a scheduled workday.
    pub was_scheduled_workday: bool,
    /// Number of completed entries.
    pub entry_count: usize,
    /// Daily salary for the weekday.
    pub daily_salary: Option<Decimal>,
    /// Hourly overtime rate for the weekday.
    pub overtime_rate: Option<Decimal>,
    /// Overtime pay.
    pub overtime_pay: Decimal,
    /// Regular pay.
    pub regular_pay: Decimal,
    /// Extra pay.
    pub extra_pay: Decimal,
    /// Total pay.
    pub total_pay: Decimal,
    /// Counted as a regular day.
    pub is_regular_day: bool,
    /// Paid on top of a monthly salary.
    pub is_extra_day: bool,
}

impl From<&PayrollDay> for DayResponse {
    fn from(day: &PayrollDay) -> Self {
        let status = DayStatus::of(day);
        let summary = day.summary.as_ref();
        let pay = day.pay.as_ref();

        DayResponse {
            date: day.date,
            day: weekday_name(day.weekday).to_string(),
            status,
            norm_hours: summary.map(|s| s.norm_hours),
            worked_hours: day.worked_hours,
            overtime: summary
                .filter(|_| status == DayStatus::Worked)
                .map(|s| s.overtime_hours)
                .unwrap_or(Decimal::ZERO),
            underworked: status == DayStatus::Worked && summary.is_some_and(|s| s.is_underworked()),
            was_scheduled_workday: day.was_scheduled_workday,
            entry_count: day.entry_count,
            daily_salary: pay.map(|p| p.daily_salary),
            overtime_rate: pay.map(|p| p.overtime_rate),
            overtime_pay: pay.map(|p| p.overtime_pay).unwrap_or(Decimal::ZERO),
            regular_pay: pay.map(|p| p.regular_pay).unwrap_or(Decimal::ZERO),
            extra_pay: pay.map(|p| p.extra_pay).unwrap_or(Decimal::ZERO),
            total_pay: day.total_pay(),
            is_regular_day: pay.is_some_and(|p| p.is_regular_day),
            is_extra_day: pay.is_some_and(|p| p.is_extra_day),
        }
    }
}

/// One employee-week in a payroll report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollReportEntry {
    /// The employee's display name.
    pub user_name: String,
    /// The employee id.
    pub user_id: String,
    /// Display label for the employee type.
    pub user_type: String,
    /// First date of the week.
    pub week_start: NaiveDate,
    /// Last date of the week.
    pub week_end: NaiveDate,
    /// Scheduled workdays per week.
    pub scheduled_workdays_count: Option<u32>,
    /// Settings effective on or before the week end, most recent first.
    pub salary_settings: Vec<SalarySetting>,
    /// The seven days of the week.
    pub days: Vec<DayResponse>,
    /// Week totals.
    pub totals: WeeklyTotals,
    /// Non-fatal problems.
    pub warnings: Vec<PayrollWarning>,
}

impl PayrollReportEntry {
    /// Builds the report entry from a computed week and the employee's
    /// salary history (in any order).
    pub fn new(entry: WeeklyPayrollEntry, history: &[SalarySetting]) -> Self {
        let week_end = entry.week_end_date();
        let mut salary_settings: Vec<SalarySetting> = history
            .iter()
            .filter(|setting| setting.effective_from <= week_end)
            .cloned()
            .collect();
        salary_settings.sort_by(|a, b| b.effective_from.cmp(&a.effective_from));

        PayrollReportEntry {
            days: entry.days.iter().map(DayResponse::from).collect(),
            user_name: entry.user_name,
            user_id: entry.user_id,
            user_type: entry.user_type,
            week_start: entry.week_start_date,
            week_end,
            scheduled_workdays_count: entry.scheduled_workdays_count,
            salary_settings,
            totals: entry.totals,
            warnings: entry.warnings,
        }
    }
}

/// A week window offered for selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekResponse {
    /// First date of the week.
    pub start_date: NaiveDate,
    /// Last date of the week.
    pub end_date: NaiveDate,
    /// Display label, e.g. `10/07/2025 - 16/07/2025`.
    pub label: String,
}

impl From<WeekWindow> for WeekResponse {
    fn from(window: WeekWindow) -> Self {
        WeekResponse {
            start_date: window.start_date,
            end_date: window.end_date,
            label: format!(
                "{} - {}",
                window.start_date.format("%d/%m/%Y"),
                window.end_date.format("%d/%m/%Y")
            ),
        }
    }
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` when the server answers.
    pub status: String,
    /// Engine version.
    pub version: String,
    /// Organisation the payroll is run for.
    pub organization: String,
    /// ISO currency code of all amounts.
    pub currency: String,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response with the given error body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::MissingSchedule { user_id, date } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "MISSING_SCHEDULE",
                    message,
                    format!(
                        "Add a salary setting for '{}' effective on or before {}",
                        user_id, date
                    ),
                ),
            ),
            EngineError::DuplicateEffectiveDate { .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "DUPLICATE_EFFECTIVE_DATE",
                    message,
                    "Salary settings are immutable; use a different effective date",
                ),
            ),
            EngineError::InvalidSalarySetting { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_SALARY_SETTING", message),
            ),
            EngineError::InvalidTimeEntry { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_TIME_ENTRY", message),
            ),
            EngineError::InvalidDateRange { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_DATE_RANGE", message),
            ),
            EngineError::EmployeeNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("EMPLOYEE_NOT_FOUND", message),
            ),
            EngineError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ApiError::with_details(
                    "UNAUTHORIZED",
                    message,
                    "Send the x-user-id and x-user-role headers",
                ),
            ),
            EngineError::Forbidden { .. } => {
                (StatusCode::FORBIDDEN, ApiError::new("FORBIDDEN", message))
            }
            EngineError::RepositoryError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("REPOSITORY_ERROR", "Data access failed", message),
            ),
            EngineError::CalculationError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyPayResult, DailyWorkSummary};
    use chrono::{Datelike, Weekday};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_day(entries: usize, scheduled: bool, resolved: bool, worked: &str) -> PayrollDay {
        let date = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
        let summary = resolved.then(|| DailyWorkSummary {
            date,
            weekday: date.weekday(),
            worked_hours: dec(worked),
            norm_hours: dec("8"),
            overtime_hours: Decimal::ZERO,
        });
        let pay = (resolved && entries > 0).then(|| DailyPayResult {
            daily_salary: dec("30"),
            overtime_rate: dec("9"),
            paid_overtime_hours: Decimal::ZERO,
            overtime_pay: Decimal::ZERO,
            regular_pay: dec("30"),
            extra_pay: Decimal::ZERO,
            total_pay: dec("30"),
            is_regular_day: true,
            is_extra_day: false,
        });
        PayrollDay {
            date,
            weekday: Weekday::Mon,
            entry_count: entries,
            worked_hours: dec(worked),
            was_scheduled_workday: scheduled,
            summary,
            pay,
        }
    }

    #[test]
    fn test_day_status_classification() {
        assert_eq!(DayStatus::of(&create_day(1, true, true, "8")), DayStatus::Worked);
        assert_eq!(DayStatus::of(&create_day(1, false, false, "8")), DayStatus::MissingSchedule);
        assert_eq!(DayStatus::of(&create_day(0, true, true, "0")), DayStatus::DayOff);
        assert_eq!(DayStatus::of(&create_day(0, false, true, "0")), DayStatus::Blank);
        assert_eq!(DayStatus::of(&create_day(0, false, false, "0")), DayStatus::Blank);
    }

    #[test]
    fn test_day_response_flags_underworked() {
        let response = DayResponse::from(&create_day(1, true, true, "7.5"));
        assert!(response.underworked);
        assert_eq!(response.day, "Monday");
        assert_eq!(response.total_pay, dec("30"));

        let day_off = DayResponse::from(&create_day(0, true, true, "0"));
        assert!(!day_off.underworked);
        assert_eq!(day_off.total_pay, Decimal::ZERO);
    }

    #[test]
    fn test_day_status_serializes_snake_case() {
        let json = serde_json::to_string(&DayStatus::MissingSchedule).unwrap();
        assert_eq!(json, "\"missing_schedule\"");
        let json = serde_json::to_string(&DayStatus::DayOff).unwrap();
        assert_eq!(json, "\"day_off\"");
    }

    #[test]
    fn test_week_label() {
        let window = WeekWindow {
            start_date: NaiveDate::from_ymd_opt(2025, 7, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 7, 16).unwrap(),
        };
        assert_eq!(WeekResponse::from(window).label, "10/07/2025 - 16/07/2025");
    }

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_engine_error_status_codes() {
        let cases: Vec<(EngineError, StatusCode, &str)> = vec![
            (
                EngineError::DuplicateEffectiveDate {
                    subject: "emp_001".to_string(),
                    effective_from: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                },
                StatusCode::CONFLICT,
                "DUPLICATE_EFFECTIVE_DATE",
            ),
            (
                EngineError::InvalidSalarySetting {
                    field: "monthly_periods".to_string(),
                    message: "must be 12 or 14".to_string(),
                },
                StatusCode::BAD_REQUEST,
                "INVALID_SALARY_SETTING",
            ),
            (EngineError::Unauthorized, StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (
                EngineError::Forbidden {
                    message: "no".to_string(),
                },
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
            ),
            (
                EngineError::EmployeeNotFound {
                    user_id: "ghost".to_string(),
                },
                StatusCode::NOT_FOUND,
                "EMPLOYEE_NOT_FOUND",
            ),
            (
                EngineError::MissingSchedule {
                    user_id: "emp_001".to_string(),
                    date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
                "MISSING_SCHEDULE",
            ),
        ];

        for (engine_error, status, code) in cases {
            let response: ApiErrorResponse = engine_error.into();
            assert_eq!(response.status, status);
            assert_eq!(response.error.code, code);
        }
    }
}
