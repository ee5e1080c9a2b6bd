use core::str::FromStr;

use serde::{Deserialize, Serialize};

use campusboard_core::{DomainError, ValueObject};

/// Role attached to every account.
///
/// Role names are matched exactly and case-sensitively; the role is part of
/// the login key, not just an attribute looked up afterwards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Role {
    /// The login form preselects `Student`.
    #[default]
    Student,
    Faculty,
    Staff,
    Moderator,
    Administrator,
}

impl Role {
    /// Every role, in the order the login form offers them.
    pub const ALL: [Role; 5] = [
        Role::Student,
        Role::Faculty,
        Role::Staff,
        Role::Moderator,
        Role::Administrator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Faculty => "Faculty",
            Role::Staff => "Staff",
            Role::Moderator => "Moderator",
            Role::Administrator => "Administrator",
        }
    }

    /// Moderators and administrators may remove other users' content.
    pub fn is_moderator(&self) -> bool {
        matches!(self, Role::Moderator | Role::Administrator)
    }

    pub fn is_administrator(&self) -> bool {
        *self == Role::Administrator
    }
}

impl ValueObject for Role {}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown role '{s}'")))
    }
}
