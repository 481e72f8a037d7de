//! The role hierarchy carried by an access context.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The capability level a context claims.
///
/// The string forms (`none`, `user`, `business`, `admin`) are what the
/// database session state carries and what row-security policies compare
/// against; they are stable and must not change without a schema migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// No identity; the public/anonymous caller.
    #[default]
    #[serde(rename = "none")]
    Anonymous,
    /// An authenticated individual user.
    User,
    /// An authenticated caller acting on behalf of a business.
    Business,
    /// An administrator. Only reachable through the dedicated admin wrapper.
    Admin,
}

impl Role {
    /// Returns the stable string form stored in session state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Anonymous => "none",
            Role::User => "user",
            Role::Business => "business",
            Role::Admin => "admin",
        }
    }

    /// Returns `true` for any authenticated role.
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Role::Anonymous)
    }

    /// Returns `true` for the admin role.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role string.
#[derive(Debug, Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Role::Anonymous),
            "user" => Ok(Role::User),
            "business" => Ok(Role::Business),
            "admin" => Ok(Role::Admin),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Anonymous, Role::User, Role::Business, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_anonymous_is_none() {
        assert_eq!(Role::Anonymous.to_string(), "none");
        assert_eq!("none".parse::<Role>().unwrap(), Role::Anonymous);
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::Anonymous).unwrap(), "\"none\"");
        let role: Role = serde_json::from_str("\"business\"").unwrap();
        assert_eq!(role, Role::Business);
    }

    #[test]
    fn test_authenticated() {
        assert!(!Role::Anonymous.is_authenticated());
        assert!(Role::User.is_authenticated());
        assert!(Role::Admin.is_admin());
        assert!(!Role::Business.is_admin());
    }
}
