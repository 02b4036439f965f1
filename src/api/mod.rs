//! HTTP API module for the payroll engine.
//!
//! This module provides the REST API endpoints for payroll reports,
//! stateless weekly calculations and salary setting management.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CalculateRequest, EmployeeRequest, ReportQuery, ReportRange, TimeEntryRequest,
    USER_ID_HEADER, USER_ROLE_HEADER, WeeksQuery, principal_from_headers,
};
pub use response::{
    ApiError, DayResponse, DayStatus, HealthResponse, PayrollReportEntry, WeekResponse,
};
pub use state::AppState;
