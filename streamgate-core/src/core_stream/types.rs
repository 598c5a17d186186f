//! Identifier types for stream entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric identifier of a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub i64);

impl PersonId {
    /// Get the raw numeric value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "person:{}", self.0)
    }
}

impl From<i64> for PersonId {
    fn from(id: i64) -> Self {
        PersonId(id)
    }
}

/// Numeric identifier of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub i64);

impl GroupId {
    /// Get the raw numeric value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group:{}", self.0)
    }
}

impl From<i64> for GroupId {
    fn from(id: i64) -> Self {
        GroupId(id)
    }
}

/// Identifier of a persisted activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActivityId(pub i64);

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "activity:{}", self.0)
    }
}

impl From<i64> for ActivityId {
    fn from(id: i64) -> Self {
        ActivityId(id)
    }
}

/// Identifier of a persisted comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommentId(pub i64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "comment:{}", self.0)
    }
}

impl From<i64> for CommentId {
    fn from(id: i64) -> Self {
        CommentId(id)
    }
}

/// The authenticated caller attempting an interaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// Numeric person id
    pub id: PersonId,

    /// Account id (login name)
    pub account_id: String,
}

impl Principal {
    /// Create a new principal
    pub fn new(id: impl Into<PersonId>, account_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            account_id: account_id.into(),
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.account_id, self.id)
    }
}

/// Compare two account ids, optionally ignoring ASCII case
pub fn same_account(a: &str, b: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(PersonId(6).to_string(), "person:6");
        assert_eq!(GroupId(38982).to_string(), "group:38982");
        assert_eq!(ActivityId(42).to_string(), "activity:42");
        assert_eq!(CommentId(5).to_string(), "comment:5");
    }

    #[test]
    fn test_principal_new() {
        let principal = Principal::new(99, "smithers");
        assert_eq!(principal.id, PersonId(99));
        assert_eq!(principal.account_id, "smithers");
        assert_eq!(principal.to_string(), "smithers (person:99)");
    }

    #[test]
    fn test_same_account() {
        assert!(same_account("jdoe", "JDoe", true));
        assert!(!same_account("jdoe", "JDoe", false));
        assert!(same_account("jdoe", "jdoe", false));
        assert!(!same_account("jdoe", "bob", true));
    }

    #[test]
    fn test_ids_serialize_transparently_as_numbers() {
        let json = serde_json::to_string(&ActivityId(100)).unwrap();
        assert_eq!(json, "100");
        let id: PersonId = serde_json::from_str("7").unwrap();
        assert_eq!(id, PersonId(7));
    }
}
