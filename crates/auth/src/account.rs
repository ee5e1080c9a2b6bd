use serde::{Deserialize, Serialize};

use campusboard_core::Entity;

use crate::Role;

/// A known account.
///
/// The password is kept as plaintext and compared verbatim. This is a
/// demonstration directory, not a credential store; it is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    username: String,
    #[serde(skip_serializing, default)]
    password: String,
    role: Role,
    disabled: bool,
}

impl Account {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
            disabled: false,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Label shown in the user management table.
    pub fn status_label(&self) -> &'static str {
        if self.disabled { "Disabled" } else { "Active" }
    }

    /// Exact, case-sensitive match on all three login fields.
    pub(crate) fn matches(&self, username: &str, password: &str, role: Role) -> bool {
        self.username == username && self.password == password && self.role == role
    }

    pub(crate) fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }
}

impl Entity for Account {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.username
    }
}
