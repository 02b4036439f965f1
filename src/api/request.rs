//! Request types for the payroll API.
//!
//! This module defines the query and body structures accepted by the
//! endpoints, and how the calling principal is read from request headers.

use axum::http::HeaderMap;
use chrono::{Days, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, Principal, Role, SalarySettingRecord, TimeEntry, parse_weekday};

/// Header carrying the calling user's id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the calling user's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Reads the calling principal from the `x-user-id` and `x-user-role` headers.
///
/// # Errors
///
/// Returns [`EngineError::Unauthorized`] if either header is missing or
/// empty, and [`EngineError::Forbidden`] for an unknown role.
pub fn principal_from_headers(headers: &HeaderMap) -> EngineResult<Principal> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    let user_id = header(USER_ID_HEADER).ok_or(EngineError::Unauthorized)?;
    let role = header(USER_ROLE_HEADER)
        .ok_or(EngineError::Unauthorized)?
        .parse::<Role>()?;
    Ok(Principal::new(user_id, role))
}

fn resolve_week_start_day(name: Option<&str>, default: Weekday) -> EngineResult<Weekday> {
    match name {
        None => Ok(default),
        Some(name) => parse_weekday(name).ok_or_else(|| EngineError::InvalidDateRange {
            message: format!("unknown week start day '{}'", name),
        }),
    }
}

/// Query parameters for `GET /payroll-report`.
///
/// Either `start_date` and `end_date`, or the older single `week_start`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    /// First date of the range (inclusive).
    pub start_date: Option<NaiveDate>,
    /// Last date of the range (inclusive).
    pub end_date: Option<NaiveDate>,
    /// Start of a single 7-day window.
    pub week_start: Option<NaiveDate>,
    /// Weekday payroll weeks start on, overriding the configured one.
    pub week_start_day: Option<String>,
}

/// A validated report range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRange {
    /// First date of the range (inclusive).
    pub start: NaiveDate,
    /// Last date of the range (inclusive).
    pub end: NaiveDate,
    /// Weekday payroll weeks start on.
    pub week_start_day: Weekday,
}

impl ReportQuery {
    /// Normalises the query into a date range.
    ///
    /// `week_start=D` is equivalent to `start_date=D&end_date=D+6`.
    pub fn resolve(&self, default_week_start: Weekday) -> EngineResult<ReportRange> {
        let week_start_day =
            resolve_week_start_day(self.week_start_day.as_deref(), default_week_start)?;

        let (start, end) = match (self.start_date, self.end_date, self.week_start) {
            (Some(start), Some(end), _) => (start, end),
            (None, None, Some(week_start)) => {
                let end = week_start.checked_add_days(Days::new(6)).ok_or_else(|| {
                    EngineError::InvalidDateRange {
                        message: format!(
                            "week starting {} ends past the last supported date",
                            week_start
                        ),
                    }
                })?;
                (week_start, end)
            }
            _ => {
                return Err(EngineError::InvalidDateRange {
                    message: "start_date and end_date are required".to_string(),
                });
            }
        };

        if end < start {
            return Err(EngineError::InvalidDateRange {
                message: format!("end date {} is before start date {}", end, start),
            });
        }

        Ok(ReportRange {
            start,
            end,
            week_start_day,
        })
    }
}

/// Query parameters for `GET /payroll-report/weeks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeeksQuery {
    /// Only list weeks starting in this year.
    pub year: Option<i32>,
    /// Weekday payroll weeks start on, overriding the configured one.
    pub week_start_day: Option<String>,
}

impl WeeksQuery {
    /// The week start day to group by.
    pub fn week_start_day(&self, default_week_start: Weekday) -> EngineResult<Weekday> {
        resolve_week_start_day(self.week_start_day.as_deref(), default_week_start)
    }
}

/// Query parameters for `GET /salary-settings`.
#[derive(Debug, Clone, Deserialize)]
pub struct SalarySettingsQuery {
    /// The employee whose history is requested.
    pub user_id: String,
}

/// Employee information in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's display name.
    pub full_name: String,
    /// Display label for the employee type.
    #[serde(default)]
    pub user_type: String,
}

impl From<EmployeeRequest> for Employee {
    fn from(req: EmployeeRequest) -> Self {
        Employee {
            id: req.id,
            full_name: req.full_name,
            user_type: req.user_type,
            is_active: true,
        }
    }
}

/// Time entry information in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeEntryRequest {
    /// Unique identifier for the entry.
    pub id: String,
    /// Project the time was booked against.
    #[serde(default)]
    pub project_id: Option<String>,
    /// When the employee clocked in.
    pub clock_in: NaiveDateTime,
    /// When the employee clocked out, absent while still open.
    #[serde(default)]
    pub clock_out: Option<NaiveDateTime>,
    /// Whether the entry was approved.
    #[serde(default)]
    pub approved: bool,
}

impl TimeEntryRequest {
    /// Converts the request into a time entry for `user_id`.
    pub fn into_entry(self, user_id: &str) -> TimeEntry {
        TimeEntry {
            id: self.id,
            user_id: user_id.to_string(),
            project_id: self.project_id,
            clock_in: self.clock_in,
            clock_out: self.clock_out,
            approved: self.approved,
        }
    }
}

/// Request body for `POST /payroll/calculate`.
///
/// Carries everything needed to compute one employee-week without touching
/// stored data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateRequest {
    /// The employee being paid.
    pub employee: EmployeeRequest,
    /// The employee's salary history, in any order.
    pub salary_settings: Vec<SalarySettingRecord>,
    /// Time entries for the week.
    #[serde(default)]
    pub time_entries: Vec<TimeEntryRequest>,
    /// First date of the week.
    pub week_start_date: NaiveDate,
    /// Weekday payroll weeks start on, overriding the configured one.
    #[serde(default)]
    pub week_start_day: Option<String>,
    /// Fail with a missing schedule error instead of warning about worked
    /// days without a salary setting.
    #[serde(default)]
    pub strict: bool,
}

impl CalculateRequest {
    /// The week start day for this calculation.
    pub fn week_start_day(&self, default_week_start: Weekday) -> EngineResult<Weekday> {
        resolve_week_start_day(self.week_start_day.as_deref(), default_week_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn make_date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn headers(user: Option<&str>, role: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(user) = user {
            headers.insert(USER_ID_HEADER, HeaderValue::from_str(user).unwrap());
        }
        if let Some(role) = role {
            headers.insert(USER_ROLE_HEADER, HeaderValue::from_str(role).unwrap());
        }
        headers
    }

    #[test]
    fn test_principal_from_headers() {
        let principal = principal_from_headers(&headers(Some("u1"), Some("admin"))).unwrap();
        assert_eq!(principal.user_id, "u1");
        assert_eq!(principal.role, Role::Admin);
    }

    #[test]
    fn test_missing_headers_are_unauthorized() {
        assert!(matches!(
            principal_from_headers(&headers(None, Some("admin"))),
            Err(EngineError::Unauthorized)
        ));
        assert!(matches!(
            principal_from_headers(&headers(Some("u1"), None)),
            Err(EngineError::Unauthorized)
        ));
        assert!(matches!(
            principal_from_headers(&headers(Some(" "), Some("admin"))),
            Err(EngineError::Unauthorized)
        ));
    }

    #[test]
    fn test_unknown_role_is_forbidden() {
        assert!(matches!(
            principal_from_headers(&headers(Some("u1"), Some("employee"))),
            Err(EngineError::Forbidden { .. })
        ));
    }

    #[test]
    fn test_explicit_range() {
        let query = ReportQuery {
            start_date: Some(make_date(1)),
            end_date: Some(make_date(31)),
            ..Default::default()
        };
        let range = query.resolve(Weekday::Thu).unwrap();
        assert_eq!(range.start, make_date(1));
        assert_eq!(range.end, make_date(31));
        assert_eq!(range.week_start_day, Weekday::Thu);
    }

    #[test]
    fn test_legacy_week_start_is_seven_days() {
        let query = ReportQuery {
            week_start: Some(make_date(10)),
            week_start_day: Some("Πέμπτη".to_string()),
            ..Default::default()
        };
        let range = query.resolve(Weekday::Mon).unwrap();
        assert_eq!(range.start, make_date(10));
        assert_eq!(range.end, make_date(16));
        assert_eq!(range.week_start_day, Weekday::Thu);
    }

    #[test]
    fn test_incomplete_range_rejected() {
        let query = ReportQuery {
            start_date: Some(make_date(1)),
            ..Default::default()
        };
        assert!(matches!(
            query.resolve(Weekday::Thu),
            Err(EngineError::InvalidDateRange { .. })
        ));
        assert!(ReportQuery::default().resolve(Weekday::Thu).is_err());
    }

    #[test]
    fn test_reversed_range_rejected() {
        let query = ReportQuery {
            start_date: Some(make_date(20)),
            end_date: Some(make_date(10)),
            ..Default::default()
        };
        assert!(query.resolve(Weekday::Thu).is_err());
    }

    #[test]
    fn test_legacy_week_start_near_last_date_rejected() {
        let query: ReportQuery = serde_json::from_str(r#"{"week_start": "+262142-12-28"}"#).unwrap();
        assert!(matches!(
            query.resolve(Weekday::Thu),
            Err(EngineError::InvalidDateRange { .. })
        ));

        let query = ReportQuery {
            week_start: Some(NaiveDate::MAX - Days::new(6)),
            ..Default::default()
        };
        assert_eq!(query.resolve(Weekday::Thu).unwrap().end, NaiveDate::MAX);
    }

    #[test]
    fn test_unknown_week_start_day_rejected() {
        let query = WeeksQuery {
            year: None,
            week_start_day: Some("someday".to_string()),
        };
        assert!(matches!(
            query.week_start_day(Weekday::Thu),
            Err(EngineError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_time_entry_request_takes_employee_id() {
        let json = r#"{"id": "te_1", "clock_in": "2025-07-10T08:00:00", "clock_out": "2025-07-10T16:00:00"}"#;
        let request: TimeEntryRequest = serde_json::from_str(json).unwrap();
        let entry = request.into_entry("emp_001");
        assert_eq!(entry.user_id, "emp_001");
        assert_eq!(entry.worked_minutes(), Some(480));
    }
}
