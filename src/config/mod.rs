//! Configuration loading for the payroll engine.
//!
//! This module loads `payroll.yaml`, which names the organisation, the
//! weekday payroll weeks start on, the server address and the seed data
//! directory.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Loaded payroll for: {}", config.organization_name());
//! ```

mod loader;
mod types;

pub(crate) use loader::load_yaml;
pub use loader::ConfigLoader;
pub use types::{OrganizationConfig, PayrollConfig, PayrollSettings, ServerConfig};
