//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while resolving salary settings,
//! validating time entries and building payroll reports.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
/// use chrono::NaiveDate;
///
/// let error = EngineError::MissingSchedule {
///     user_id: "50.00.01.0001".to_string(),
///     date: NaiveDate::from_ymd_opt(2025, 7, 10).unwrap(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "No salary setting for user '50.00.01.0001' effective on 2025-07-10"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No salary setting is effective on or before the requested date.
    #[error("No salary setting for user '{user_id}' effective on {date}")]
    MissingSchedule {
        /// The employee whose history was searched.
        user_id: String,
        /// The date that precedes every known setting.
        date: NaiveDate,
    },

    /// An effective-dated record already exists for the same subject and date.
    #[error("A record for '{subject}' effective from {effective_from} already exists")]
    DuplicateEffectiveDate {
        /// The subject the record belongs to (for salary settings, the user id).
        subject: String,
        /// The conflicting effective date.
        effective_from: NaiveDate,
    },

    /// A salary setting failed validation.
    #[error("Invalid salary setting field '{field}': {message}")]
    InvalidSalarySetting {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A time entry was invalid or conflicts with another entry.
    #[error("Invalid time entry '{entry_id}': {message}")]
    InvalidTimeEntry {
        /// The ID of the invalid entry.
        entry_id: String,
        /// A description of what made the entry invalid.
        message: String,
    },

    /// A requested date range or week window was malformed.
    #[error("Invalid date range: {message}")]
    InvalidDateRange {
        /// A description of the problem.
        message: String,
    },

    /// The referenced employee does not exist.
    #[error("Employee not found: {user_id}")]
    EmployeeNotFound {
        /// The unknown employee id.
        user_id: String,
    },

    /// The caller did not identify itself.
    #[error("Authentication required")]
    Unauthorized,

    /// The caller is authenticated but lacks the required role.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Why access was denied.
        message: String,
    },

    /// The data store could not serve the request.
    #[error("Repository error: {message}")]
    RepositoryError {
        /// A description of the failure.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
