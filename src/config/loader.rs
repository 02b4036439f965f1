//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the payroll
//! configuration from YAML files.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::de::DeserializeOwned;

use crate::error::{EngineError, EngineResult};

use super::types::PayrollConfig;

/// Loads and provides access to the payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── payroll.yaml          # Organisation, week start day, server
/// └── data/                 # Seed data (see `InMemoryRepository`)
///     ├── employees.yaml
///     ├── salary_settings.yaml
///     └── time_entries.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// println!("Payroll weeks start on {}", loader.week_start_day());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
    base_dir: PathBuf,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if
    /// `payroll.yaml` is missing or contains invalid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let config = load_yaml::<PayrollConfig>(&path.join("payroll.yaml"))?;
        Ok(Self::from_config(config, path))
    }

    /// Wraps an already parsed configuration rooted at `base_dir`.
    pub fn from_config<P: AsRef<Path>>(config: PayrollConfig, base_dir: P) -> Self {
        Self {
            config,
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the full configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Display name of the organisation.
    pub fn organization_name(&self) -> &str {
        &self.config.organization.name
    }

    /// ISO currency code of all amounts.
    pub fn currency(&self) -> &str {
        &self.config.organization.currency
    }

    /// Weekday on which payroll weeks start.
    pub fn week_start_day(&self) -> Weekday {
        self.config.payroll.week_start_day
    }

    /// Configured server bind address.
    pub fn bind_address(&self) -> &str {
        &self.config.server.bind_address
    }

    /// The seed data directory, resolved against the config directory.
    pub fn data_dir(&self) -> PathBuf {
        if self.config.data_dir.is_absolute() {
            self.config.data_dir.clone()
        } else {
            self.base_dir.join(&self.config.data_dir)
        }
    }
}

/// Loads and parses a YAML file.
///
/// A file that cannot be read is reported as [`EngineError::ConfigNotFound`],
/// one that cannot be parsed as [`EngineError::ConfigParseError`].
pub(crate) fn load_yaml<T: DeserializeOwned>(path: &Path) -> EngineResult<T> {
    let path_str = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
        path: path_str.clone(),
    })?;

    serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
        path: path_str,
        message: e.to_string(),
    })
}
