//! In-memory repository.
//!
//! Holds all payroll data behind [`RwLock`]s so a single instance can be
//! shared between request handlers. Seed data is read from YAML files and
//! goes through the same validation as any other write.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use super::PayrollRepository;
use crate::calculation::SalarySchedule;
use crate::config::load_yaml;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, Principal, Role, SalarySetting, SalarySettingRecord, TimeEntry};

#[derive(Debug, Deserialize)]
struct EmployeesFile {
    employees: Vec<Employee>,
}

#[derive(Debug, Deserialize)]
struct SalarySettingsFile {
    salary_settings: Vec<SalarySettingRecord>,
}

#[derive(Debug, Deserialize)]
struct TimeEntriesFile {
    #[serde(default)]
    time_entries: Vec<TimeEntry>,
}

/// A [`PayrollRepository`] that keeps everything in memory.
///
/// # Data Directory
///
/// ```text
/// data/
/// ├── employees.yaml        # employees: [...]
/// ├── salary_settings.yaml  # salary_settings: [...]
/// └── time_entries.yaml     # time_entries: [...]
/// ```
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    employees: RwLock<BTreeMap<String, Employee>>,
    salary_settings: RwLock<HashMap<String, SalarySchedule>>,
    time_entries: RwLock<HashMap<String, Vec<TimeEntry>>>,
}

impl InMemoryRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a repository from the YAML files in `dir`.
    ///
    /// Legacy salary records with only `days_per_week` are migrated to a
    /// weekday schedule here.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a file is missing or malformed, and
    /// the usual validation errors if a seed row is invalid.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> EngineResult<Self> {
        let dir = dir.as_ref();
        let repository = Self::new();
        let loader = Principal::new("seed", Role::Admin);

        let employees = load_yaml::<EmployeesFile>(&dir.join("employees.yaml"))?.employees;
        for employee in employees {
            repository.add_employee(employee)?;
        }

        let records =
            load_yaml::<SalarySettingsFile>(&dir.join("salary_settings.yaml"))?.salary_settings;
        for record in records {
            repository.insert_salary_setting(&loader, SalarySetting::try_from(record)?)?;
        }

        let entries = load_yaml::<TimeEntriesFile>(&dir.join("time_entries.yaml"))?.time_entries;
        for entry in entries {
            repository.insert_time_entry(&loader, entry)?;
        }

        info!(
            data_dir = %dir.display(),
            employees = read(&repository.employees)?.len(),
            "loaded payroll data"
        );
        Ok(repository)
    }

    /// Adds an employee.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RepositoryError`] if the id is already taken.
    pub fn add_employee(&self, employee: Employee) -> EngineResult<()> {
        let mut employees = write(&self.employees)?;
        if employees.contains_key(&employee.id) {
            return Err(EngineError::RepositoryError {
                message: format!("employee '{}' already exists", employee.id),
            });
        }
        employees.insert(employee.id.clone(), employee);
        Ok(())
    }

    fn ensure_employee(&self, user_id: &str) -> EngineResult<()> {
        if read(&self.employees)?.contains_key(user_id) {
            Ok(())
        } else {
            Err(EngineError::EmployeeNotFound {
                user_id: user_id.to_string(),
            })
        }
    }
}

fn read<T>(lock: &RwLock<T>) -> EngineResult<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|_| EngineError::RepositoryError {
        message: "repository lock poisoned".to_string(),
    })
}

fn write<T>(lock: &RwLock<T>) -> EngineResult<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|_| EngineError::RepositoryError {
        message: "repository lock poisoned".to_string(),
    })
}

impl PayrollRepository for InMemoryRepository {
    fn active_employees(&self) -> EngineResult<Vec<Employee>> {
        let mut active: Vec<Employee> = read(&self.employees)?
            .values()
            .filter(|employee| employee.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.full_name.cmp(&b.full_name).then_with(|| a.id.cmp(&b.id)));
        Ok(active)
    }

    fn employee(&self, user_id: &str) -> EngineResult<Employee> {
        read(&self.employees)?
            .get(user_id)
            .cloned()
            .ok_or_else(|| EngineError::EmployeeNotFound {
                user_id: user_id.to_string(),
            })
    }

    fn salary_settings(&self, user_id: &str) -> EngineResult<Vec<SalarySetting>> {
        Ok(read(&self.salary_settings)?
            .get(user_id)
            .map(|schedule| schedule.records().to_vec())
            .unwrap_or_default())
    }

    fn time_entries(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<TimeEntry>> {
        Ok(read(&self.time_entries)?
            .get(user_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|entry| (start..=end).contains(&entry.work_date()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn all_time_entries(&self) -> EngineResult<Vec<TimeEntry>> {
        Ok(read(&self.time_entries)?
            .values()
            .flatten()
            .cloned()
            .collect())
    }

    fn insert_salary_setting(
        &self,
        principal: &Principal,
        setting: SalarySetting,
    ) -> EngineResult<()> {
        principal.require_admin()?;
        setting.validate()?;
        self.ensure_employee(&setting.user_id)?;

        let user_id = setting.user_id.clone();
        let effective_from = setting.effective_from;
        write(&self.salary_settings)?
            .entry(user_id.clone())
            .or_insert_with(|| SalarySchedule::new(user_id.clone()))
            .insert(setting)?;

        debug!(
            actor = %principal.user_id,
            user_id = %user_id,
            %effective_from,
            "stored salary setting"
        );
        Ok(())
    }

    fn insert_time_entry(&self, principal: &Principal, entry: TimeEntry) -> EngineResult<()> {
        entry.validate()?;
        self.ensure_employee(&entry.user_id)?;

        let mut all_entries = write(&self.time_entries)?;
        if all_entries.values().flatten().any(|existing| existing.id == entry.id) {
            return Err(EngineError::InvalidTimeEntry {
                entry_id: entry.id,
                message: "an entry with this id already exists".to_string(),
            });
        }

        let user_entries = all_entries.entry(entry.user_id.clone()).or_default();
        if let Some(existing) = user_entries.iter().find(|existing| existing.overlaps(&entry)) {
            return Err(EngineError::InvalidTimeEntry {
                message: format!("overlaps entry '{}'", existing.id),
                entry_id: entry.id,
            });
        }

        debug!(
            actor = %principal.user_id,
            entry_id = %entry.id,
            user_id = %entry.user_id,
            "stored time entry"
        );
        let position = user_entries.partition_point(|existing| existing.clock_in <= entry.clock_in);
        user_entries.insert(position, entry);
        Ok(())
    }
}
