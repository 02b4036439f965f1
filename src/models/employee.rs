//! Employee and caller identity models.
//!
//! This module defines the [`Employee`] whose hours are paid and the
//! [`Principal`] on whose behalf an operation is performed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

fn default_active() -> bool {
    true
}

/// Represents an employee whose time entries are paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's display name.
    pub full_name: String,
    /// Display label for the employee type (e.g. "Εργατοτεχνίτης").
    #[serde(default)]
    pub user_type: String,
    /// Inactive employees are left out of payroll reports.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// The role a caller acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including salary setting changes.
    Admin,
    /// Read access to payroll reports.
    Manager,
}

impl FromStr for Role {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            other => Err(EngineError::Forbidden {
                message: format!("unknown role '{}'", other),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Manager => write!(f, "manager"),
        }
    }
}

/// The authenticated caller of an operation.
///
/// Passed explicitly into every mutating operation.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Principal, Role};
///
/// let admin = Principal::new("u1", Role::Admin);
/// assert!(admin.require_admin().is_ok());
///
/// let manager = Principal::new("u2", Role::Manager);
/// assert!(manager.require_admin().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Identifier of the calling user.
    pub user_id: String,
    /// The role the caller acts under.
    pub role: Role,
}

impl Principal {
    /// Creates a principal.
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// Returns true if the caller is an admin.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fails with [`EngineError::Forbidden`] unless the caller is an admin.
    pub fn require_admin(&self) -> EngineResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(EngineError::Forbidden {
                message: format!("user '{}' requires the admin role", self.user_id),
            })
        }
    }
}
