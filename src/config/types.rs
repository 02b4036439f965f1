//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from `payroll.yaml`.

use std::path::PathBuf;

use chrono::Weekday;
use serde::{Deserialize, Deserializer};

use crate::models::parse_weekday;

/// The organisation the payroll is run for.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationConfig {
    /// Display name of the organisation.
    pub name: String,
    /// ISO currency code the amounts are paid in, reported by `/health`.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// Payroll rules that apply to the whole organisation.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollSettings {
    /// Weekday on which payroll weeks start.
    #[serde(default = "default_week_start_day", deserialize_with = "deserialize_weekday")]
    pub week_start_day: Weekday,
}

fn default_week_start_day() -> Weekday {
    Weekday::Thu
}

fn deserialize_weekday<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
    let name = String::deserialize(deserializer)?;
    parse_weekday(&name)
        .ok_or_else(|| serde::de::Error::custom(format!("unknown weekday '{}'", name)))
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the server listens on, e.g. `0.0.0.0:3000`.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// Complete payroll configuration as read from `payroll.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollConfig {
    /// Organisation details.
    pub organization: OrganizationConfig,
    /// Payroll rules.
    pub payroll: PayrollSettings,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Directory holding the seed data, relative to the config directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
