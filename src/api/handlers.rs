//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Utc, Weekday};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{SalarySchedule, build_report, build_week, report_weeks};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Employee, PayrollCalculation, SalarySetting, SalarySettingRecord, TimeEntry,
    WARNING_MISSING_SCHEDULE,
};
use crate::repository::PayrollRepository;

use super::request::{
    CalculateRequest, ReportQuery, ReportRange, SalarySettingsQuery, WeeksQuery,
    principal_from_headers,
};
use super::response::{
    ApiError, ApiErrorResponse, HealthResponse, PayrollReportEntry, WeekResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/payroll-report", get(payroll_report_handler))
        .route("/payroll-report/weeks", get(report_weeks_handler))
        .route("/payroll/calculate", post(calculate_handler))
        .route(
            "/salary-settings",
            get(list_salary_settings_handler).post(create_salary_setting_handler),
        )
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, error: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %error,
        "Request failed"
    );
    ApiErrorResponse::from(error).into_response()
}

fn json_rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's description of the problem
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error).into_response()
}

fn query_rejection_response(correlation_id: Uuid, rejection: QueryRejection) -> Response {
    let body_text = rejection.body_text();
    warn!(
        correlation_id = %correlation_id,
        error = %body_text,
        "Invalid query string"
    );
    ApiErrorResponse::bad_request(ApiError::validation_error(body_text)).into_response()
}

/// Runs repository work on the blocking thread pool.
async fn with_repository<T, F>(state: &AppState, work: F) -> EngineResult<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn PayrollRepository) -> EngineResult<T> + Send + 'static,
{
    let repository = state.repository_handle();
    tokio::task::spawn_blocking(move || work(repository.as_ref()))
        .await
        .unwrap_or_else(|err| {
            Err(EngineError::CalculationError {
                message: format!("repository task failed: {}", err),
            })
        })
}

/// Handler for GET /health.
async fn health_handler(State(state): State<AppState>) -> Response {
    json_response(
        StatusCode::OK,
        HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            organization: state.config().organization_name().to_string(),
            currency: state.config().currency().to_string(),
        },
    )
}

/// Handler for GET /payroll-report.
///
/// Returns one entry per active employee and week with completed time
/// entries in the requested range.
async fn payroll_report_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let principal = match principal_from_headers(&headers) {
        Ok(principal) => principal,
        Err(err) => return error_response(correlation_id, err),
    };
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };
    let range = match query.resolve(state.config().week_start_day()) {
        Ok(range) => range,
        Err(err) => return error_response(correlation_id, err),
    };

    info!(
        correlation_id = %correlation_id,
        user_id = %principal.user_id,
        role = %principal.role,
        start = %range.start,
        end = %range.end,
        week_start_day = %range.week_start_day,
        "Processing payroll report request"
    );

    let start_time = Instant::now();
    let result =
        with_repository(&state, move |repository| payroll_report(repository, &range)).await;

    match result {
        Ok(entries) => {
            info!(
                correlation_id = %correlation_id,
                entries = entries.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Payroll report completed"
            );
            json_response(StatusCode::OK, entries)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

fn payroll_report(
    repository: &dyn PayrollRepository,
    range: &ReportRange,
) -> EngineResult<Vec<PayrollReportEntry>> {
    let report = build_report(repository, range.start, range.end, range.week_start_day)?;
    Ok(report
        .into_iter()
        .map(|report_week| PayrollReportEntry::new(report_week.week, &report_week.salary_settings))
        .collect())
}

/// Handler for GET /payroll-report/weeks.
async fn report_weeks_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<WeeksQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    if let Err(err) = principal_from_headers(&headers) {
        return error_response(correlation_id, err);
    }
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };

    let year = query.year;
    let weeks = match query.week_start_day(state.config().week_start_day()) {
        Ok(week_start) => {
            with_repository(&state, move |repository| report_weeks(repository, week_start, year))
                .await
        }
        Err(err) => Err(err),
    };

    match weeks {
        Ok(weeks) => {
            info!(
                correlation_id = %correlation_id,
                year = ?year,
                weeks = weeks.len(),
                "Listed payroll weeks"
            );
            let body: Vec<WeekResponse> = weeks.into_iter().map(WeekResponse::from).collect();
            json_response(StatusCode::OK, body)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /payroll/calculate.
///
/// Computes one employee-week from the data in the request body alone.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match perform_calculation(request, state.config().week_start_day()) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %result.entry.user_id,
                total_pay = %result.entry.totals.total_pay,
                warnings = result.entry.warnings.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Performs a stateless payroll calculation for one employee-week.
fn perform_calculation(
    request: CalculateRequest,
    default_week_start: Weekday,
) -> EngineResult<PayrollCalculation> {
    let week_start_day = request.week_start_day(default_week_start)?;
    let CalculateRequest {
        employee,
        salary_settings,
        time_entries,
        week_start_date,
        strict,
        ..
    } = request;
    let employee: Employee = employee.into();

    let settings = salary_settings
        .into_iter()
        .map(|record| {
            let setting = SalarySetting::try_from(record)?;
            if setting.user_id != employee.id {
                return Err(EngineError::InvalidSalarySetting {
                    field: "user_id".to_string(),
                    message: format!(
                        "setting belongs to '{}', not '{}'",
                        setting.user_id, employee.id
                    ),
                });
            }
            setting.validate()?;
            Ok(setting)
        })
        .collect::<EngineResult<Vec<SalarySetting>>>()?;
    let schedule = SalarySchedule::from_settings(employee.id.clone(), settings)?;

    let entries: Vec<TimeEntry> = time_entries
        .into_iter()
        .map(|entry| entry.into_entry(&employee.id))
        .collect();
    for entry in &entries {
        entry.validate()?;
    }
    for (index, entry) in entries.iter().enumerate() {
        if let Some(other) = entries[index + 1..].iter().find(|other| entry.overlaps(other)) {
            return Err(EngineError::InvalidTimeEntry {
                entry_id: other.id.clone(),
                message: format!("overlaps entry '{}'", entry.id),
            });
        }
    }

    let entry = build_week(&employee, &entries, &schedule, week_start_date, week_start_day)?;

    if strict {
        if let Some(warning) = entry
            .warnings
            .iter()
            .find(|warning| warning.code == WARNING_MISSING_SCHEDULE)
        {
            return Err(EngineError::MissingSchedule {
                user_id: employee.id,
                date: warning.date.unwrap_or(week_start_date),
            });
        }
    }

    Ok(PayrollCalculation {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        entry,
    })
}

/// Handler for GET /salary-settings.
///
/// Returns an employee's salary history, most recent first.
async fn list_salary_settings_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<SalarySettingsQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    if let Err(err) = principal_from_headers(&headers) {
        return error_response(correlation_id, err);
    }
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };

    let history = with_repository(&state, move |repository| {
        let employee = repository.employee(&query.user_id)?;
        repository.salary_settings(&employee.id)
    })
    .await;

    match history {
        Ok(mut settings) => {
            settings.reverse();
            json_response(StatusCode::OK, settings)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /salary-settings.
///
/// Admin only. Settings are immutable, so a second setting for the same
/// employee and effective date is a conflict.
async fn create_salary_setting_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SalarySettingRecord>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let principal = match principal_from_headers(&headers) {
        Ok(principal) => principal,
        Err(err) => return error_response(correlation_id, err),
    };
    let record = match payload {
        Ok(Json(record)) => record,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let actor = principal.clone();
    let result = with_repository(&state, move |repository| {
        let setting = SalarySetting::try_from(record)?;
        repository.insert_salary_setting(&actor, setting.clone())?;
        Ok(setting)
    })
    .await;

    match result {
        Ok(setting) => {
            info!(
                correlation_id = %correlation_id,
                actor = %principal.user_id,
                user_id = %setting.user_id,
                effective_from = %setting.effective_from,
                "Salary setting created"
            );
            json_response(StatusCode::CREATED, setting)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::request::{EmployeeRequest, TimeEntryRequest};
    use crate::config::ConfigLoader;
    use crate::models::{WeekdayAmounts, WorkSchedule, weekday_key};
    use crate::repository::InMemoryRepository;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn config_path() -> &'static str {
        concat!(env!("CARGO_MANIFEST_DIR"), "/config")
    }

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load(config_path()).expect("Failed to load config");
        let repository =
            InMemoryRepository::load_from_dir(config.data_dir()).expect("Failed to load data");
        AppState::new(config, Arc::new(repository))
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn create_setting_record(effective_from: &str) -> SalarySettingRecord {
        SalarySettingRecord {
            user_id: "emp_100".to_string(),
            effective_from: make_date(effective_from),
            daily_salary: WeekdayAmounts::uniform(dec("30")),
            overtime_rate: WeekdayAmounts::uniform(dec("9")),
            norm_daily_hours: dec("8"),
            has_monthly_salary: false,
            monthly_salary: None,
            monthly_periods: None,
            work_schedule: Some(WorkSchedule::monday_to_friday()),
            days_per_week: None,
        }
    }

    fn create_valid_request() -> CalculateRequest {
        CalculateRequest {
            employee: EmployeeRequest {
                id: "emp_100".to_string(),
                full_name: "Test Worker".to_string(),
                user_type: "Ωρομίσθιος".to_string(),
            },
            salary_settings: vec![create_setting_record("2025-01-01")],
            time_entries: vec![TimeEntryRequest {
                id: "te_1".to_string(),
                project_id: None,
                clock_in: make_datetime("2025-07-14", "08:00:00"),
                clock_out: Some(make_datetime("2025-07-14", "17:00:00")),
                approved: true,
            }],
            week_start_date: make_date("2025-07-10"),
            week_start_day: None,
            strict: false,
        }
    }

    async fn post_calculate(body: String) -> Response {
        create_router(create_test_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/payroll/calculate")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_calculate_valid_request_returns_200() {
        let body = serde_json::to_string(&create_valid_request()).unwrap();
        let response = post_calculate(body).await;

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let result: PayrollCalculation = serde_json::from_slice(&body).unwrap();

        // Monday, 9 hours: 30 + 1 * 9
        assert_eq!(result.entry.user_id, "emp_100");
        assert_eq!(result.entry.totals.total_pay, dec("39"));
        assert_eq!(result.engine_version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_calculate_malformed_json_returns_400() {
        let response = post_calculate("{invalid json".to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_calculate_missing_field_returns_validation_error() {
        let body = r#"{"employee": {"id": "emp_100", "full_name": "X"}, "salary_settings": []}"#;
        let response = post_calculate(body.to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("week_start_date"));
    }

    #[tokio::test]
    async fn test_calculate_misaligned_week_returns_400() {
        let mut request = create_valid_request();
        request.week_start_date = make_date("2025-07-14");
        let response = post_calculate(serde_json::to_string(&request).unwrap()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_calculate_duplicate_setting_dates_returns_409() {
        let mut request = create_valid_request();
        request
            .salary_settings
            .push(create_setting_record("2025-01-01"));
        let response = post_calculate(serde_json::to_string(&request).unwrap()).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_calculate_strict_missing_schedule_returns_422() {
        let mut request = create_valid_request();
        request.salary_settings = vec![create_setting_record("2025-07-15")];
        request.strict = true;
        let response = post_calculate(serde_json::to_string(&request).unwrap()).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MISSING_SCHEDULE");
    }

    #[tokio::test]
    async fn test_calculate_lenient_missing_schedule_warns() {
        let mut request = create_valid_request();
        request.salary_settings = vec![create_setting_record("2025-07-15")];
        let response = post_calculate(serde_json::to_string(&request).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let result: PayrollCalculation = serde_json::from_slice(&body).unwrap();
        assert_eq!(result.entry.warnings.len(), 1);
        assert_eq!(result.entry.totals.total_pay, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_calculate_overlapping_entries_returns_400() {
        let mut request = create_valid_request();
        request.time_entries.push(TimeEntryRequest {
            id: "te_2".to_string(),
            project_id: None,
            clock_in: make_datetime("2025-07-14", "12:00:00"),
            clock_out: Some(make_datetime("2025-07-14", "13:00:00")),
            approved: false,
        });
        let response = post_calculate(serde_json::to_string(&request).unwrap()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "INVALID_TIME_ENTRY");
    }

    #[tokio::test]
    async fn test_calculate_foreign_setting_returns_400() {
        let mut request = create_valid_request();
        request.salary_settings[0].user_id = "someone_else".to_string();
        let response = post_calculate(serde_json::to_string(&request).unwrap()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health() {
        let response = create_router(create_test_state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.currency, "EUR");
        assert_eq!(health.status, "ok");
    }

    #[tokio::test]
    async fn test_report_without_principal_returns_401() {
        let response = create_router(create_test_state())
            .oneshot(
                Request::builder()
                    .uri("/payroll-report?start_date=2025-07-10&end_date=2025-07-16")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_report_with_bad_date_returns_400() {
        let response = create_router(create_test_state())
            .oneshot(
                Request::builder()
                    .uri("/payroll-report?start_date=not-a-date&end_date=2025-07-16")
                    .header("x-user-id", "mgr_1")
                    .header("x-user-role", "manager")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    async fn get_report(uri: &str) -> Response {
        create_router(create_test_state())
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header("x-user-id", "mgr_1")
                    .header("x-user-role", "manager")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_report_week_past_last_date_returns_400() {
        for uri in [
            "/payroll-report?week_start=%2B262142-12-28",
            "/payroll-report?start_date=%2B262142-12-20&end_date=%2B262142-12-31",
        ] {
            let response = get_report(uri).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);

            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let error: ApiError = serde_json::from_slice(&body).unwrap();
            assert_eq!(error.code, "INVALID_DATE_RANGE");
        }
    }

    #[tokio::test]
    async fn test_calculate_week_past_last_date_returns_400() {
        let start = NaiveDate::MAX - Days::new(2);
        let mut request = create_valid_request();
        request.week_start_date = start;
        request.week_start_day = Some(weekday_key(start.weekday()).to_string());

        let response = post_calculate(serde_json::to_string(&request).unwrap()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
