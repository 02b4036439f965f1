//! Access to employees, salary settings and time entries.
//!
//! The payroll calculation itself is pure; everything it reads comes
//! through the [`PayrollRepository`] trait. [`InMemoryRepository`] is the
//! implementation used by the server and the tests, seeded from YAML files.

mod memory;

use chrono::NaiveDate;

use crate::error::EngineResult;
use crate::models::{Employee, Principal, SalarySetting, TimeEntry};

pub use memory::InMemoryRepository;

/// Read and write access to payroll data.
///
/// Every write validates its input before storing it, so data read back from
/// a repository is always consistent: salary histories have unique effective
/// dates and one employee's time entries never overlap.
pub trait PayrollRepository: Send + Sync {
    /// All employees that are currently active, ordered by name.
    fn active_employees(&self) -> EngineResult<Vec<Employee>>;

    /// Looks up one employee.
    ///
    /// Returns [`EngineError::EmployeeNotFound`](crate::error::EngineError::EmployeeNotFound)
    /// for an unknown id.
    fn employee(&self, user_id: &str) -> EngineResult<Employee>;

    /// The employee's full salary history in ascending effective-date order.
    fn salary_settings(&self, user_id: &str) -> EngineResult<Vec<SalarySetting>>;

    /// The employee's time entries whose clock-in date is within `start..=end`.
    fn time_entries(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<TimeEntry>>;

    /// Every stored time entry.
    fn all_time_entries(&self) -> EngineResult<Vec<TimeEntry>>;

    /// Stores a new salary setting on behalf of `principal`.
    ///
    /// Only admins may change salaries. A second setting for the same
    /// employee and effective date is rejected with
    /// [`EngineError::DuplicateEffectiveDate`](crate::error::EngineError::DuplicateEffectiveDate).
    fn insert_salary_setting(&self, principal: &Principal, setting: SalarySetting)
    -> EngineResult<()>;

    /// Stores a new time entry on behalf of `principal`.
    ///
    /// Entries that are malformed or overlap another entry of the same
    /// employee are rejected with
    /// [`EngineError::InvalidTimeEntry`](crate::error::EngineError::InvalidTimeEntry).
    fn insert_time_entry(&self, principal: &Principal, entry: TimeEntry) -> EngineResult<()>;
}
