//! Core group domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, auth::UserID, database_id::GroupId};

/// A validated, non-empty group name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct GroupName(String);

impl GroupName {
    /// Create a group name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyGroupName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyGroupName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a group name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for GroupName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for GroupName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupName::new(s)
    }
}

impl Display for GroupName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named bucket that items belong to, usually a room of the house
/// (e.g. 'Kitchen', 'Living Room').
///
/// A fixed set of room groups is seeded when the database is created. These
/// system groups have no creator and cannot be deleted. Residents can add
/// their own custom groups on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// The group's ID in the application database.
    pub id: GroupId,
    /// The display name, used as the aggregation key on the dashboard.
    pub name: GroupName,
    /// The user that created the group. `None` for system groups.
    pub created_by: Option<UserID>,
    /// Whether the group was created by a user rather than seeded by the system.
    pub is_custom: bool,
    /// When the group was created.
    pub created_at: OffsetDateTime,
}

/// Form data for group creation.
#[derive(Debug, Serialize, Deserialize)]
pub struct GroupFormData {
    pub name: String,
}

#[cfg(test)]
mod group_name_tests {
    use crate::{Error, group::GroupName};

    #[test]
    fn new_fails_on_empty_string() {
        let group_name = GroupName::new("");

        assert_eq!(group_name, Err(Error::EmptyGroupName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        let group_name = GroupName::new("\n\t \r");

        assert_eq!(group_name, Err(Error::EmptyGroupName));
    }

    #[test]
    fn new_trims_whitespace() {
        let group_name = GroupName::new("  Pantry ").unwrap();

        assert_eq!(group_name.as_ref(), "Pantry");
    }

    #[test]
    fn new_succeeds_on_non_empty_string() {
        let group_name = GroupName::new("🛋️");

        assert!(group_name.is_ok())
    }
}
