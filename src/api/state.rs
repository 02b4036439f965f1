//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::repository::PayrollRepository;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded configuration and the payroll data repository.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    repository: Arc<dyn PayrollRepository>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(config: ConfigLoader, repository: Arc<dyn PayrollRepository>) -> Self {
        Self {
            config: Arc::new(config),
            repository,
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns a reference to the repository.
    pub fn repository(&self) -> &dyn PayrollRepository {
        self.repository.as_ref()
    }

    /// Returns a shared handle to the repository, for use on blocking tasks.
    pub fn repository_handle(&self) -> Arc<dyn PayrollRepository> {
        Arc::clone(&self.repository)
    }
}
