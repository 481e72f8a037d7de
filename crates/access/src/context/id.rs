//! Identifier types for callers and businesses.
//!
//! This module defines [`SubjectId`] and [`BusinessId`], opaque identifiers
//! for the caller and the tenant (business) a caller acts on behalf of.
//! Both are stored as strings because that is the form the database session
//! state carries; numeric directory ids convert losslessly via `From<i64>`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque identifier for the internal identity of a caller.
///
/// # Examples
///
/// ```
/// use trovia_access::SubjectId;
///
/// let from_directory = SubjectId::from(7);
/// let from_token = SubjectId::new("usr_01J9");
/// assert_eq!(from_directory.as_str(), "7");
/// assert_eq!(from_token.as_str(), "usr_01J9");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    /// Creates a new subject ID from the given string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the subject ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for SubjectId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SubjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opaque identifier for a business (tenant).
///
/// Distinct from [`SubjectId`]: a business ID names the tenant a caller is
/// currently operating on behalf of, not the caller itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessId(String);

impl BusinessId {
    /// Creates a new business ID from the given string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the business ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for BusinessId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for BusinessId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BusinessId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for BusinessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_id_from_integer() {
        let id = SubjectId::from(42);
        assert_eq!(id.as_str(), "42");
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_subject_id_from_string() {
        let id = SubjectId::new("usr_8f2");
        assert_eq!(id.as_str(), "usr_8f2");
    }

    #[test]
    fn test_business_id_from_integer() {
        let id = BusinessId::from(7);
        assert_eq!(id.as_str(), "7");
    }

    #[test]
    fn test_serde_transparent() {
        let id: SubjectId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(id, SubjectId::from(7));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }
}
