//! Weekly payroll engine for timesheet-based salary settings
//!
//! This crate turns clock-in/clock-out time entries and versioned,
//! day-of-week-specific salary settings into a weekly pay breakdown per
//! employee: regular pay, overtime pay and pay for extra workdays. Hourly
//! and monthly-salaried employees are handled differently, and the weekday
//! on which payroll weeks start is configurable.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
