//! User roles.
//!
//! The string forms must match the `CHECK` constraint on `users.role` in
//! `20250301000002_create_users.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_PROFESSOR: &str = "professor";
pub const ROLE_INSTITUTION: &str = "institution";
pub const ROLE_ADMIN: &str = "admin";

/// Role carried by every user account and embedded in access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Professor,
    Institution,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Professor => ROLE_PROFESSOR,
            Role::Institution => ROLE_INSTITUTION,
            Role::Admin => ROLE_ADMIN,
        }
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_PROFESSOR => Ok(Role::Professor),
            ROLE_INSTITUTION => Ok(Role::Institution),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(CoreError::Validation(format!(
                "Unknown role '{other}'. Must be one of: {ROLE_PROFESSOR}, {ROLE_INSTITUTION}, {ROLE_ADMIN}"
            ))),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
