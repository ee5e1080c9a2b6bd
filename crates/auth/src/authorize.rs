use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Role, Session, SessionAccount};

/// A privileged or authenticated-only intent a caller may want to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    CreatePost,
    Reply,
    DeletePost,
    ViewAccounts,
    ManageAccounts,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::CreatePost,
        Action::Reply,
        Action::DeletePost,
        Action::ViewAccounts,
        Action::ManageAccounts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreatePost => "forum.post.create",
            Action::Reply => "forum.post.reply",
            Action::DeletePost => "forum.post.delete",
            Action::ViewAccounts => "auth.accounts.view",
            Action::ManageAccounts => "auth.accounts.manage",
        }
    }

    /// Whether `role` may perform this action.
    pub fn permits(&self, role: Role) -> bool {
        match self {
            Action::CreatePost | Action::Reply => true,
            Action::DeletePost => role.is_moderator(),
            Action::ViewAccounts | Action::ManageAccounts => role.is_administrator(),
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not logged in")]
    NotAuthenticated,

    #[error("forbidden: role {role} may not perform '{action}'")]
    Forbidden { role: Role, action: Action },

    #[error("account '{0}' is protected and cannot be toggled")]
    ProtectedAccount(String),
}

/// Pure role policy check.
///
/// - No IO
/// - No panics
pub fn authorize(role: Role, action: Action) -> Result<(), AuthzError> {
    if action.permits(role) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden { role, action })
    }
}

/// Resolve the acting account from `session` and check `action` against its role.
pub fn authorize_session(session: &Session, action: Action) -> Result<&SessionAccount, AuthzError> {
    let account = session.current().ok_or(AuthzError::NotAuthenticated)?;
    authorize(account.role, action)?;
    Ok(account)
}

/// Every action `role` may perform, e.g. to decide which controls to show.
pub fn permitted_actions(role: Role) -> Vec<Action> {
    Action::ALL
        .into_iter()
        .filter(|action| action.permits(role))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AccountDirectory;

    #[test]
    fn any_role_may_post_and_reply() {
        for role in Role::ALL {
            assert!(authorize(role, Action::CreatePost).is_ok());
            assert!(authorize(role, Action::Reply).is_ok());
        }
    }

    #[test]
    fn delete_requires_moderator_or_administrator() {
        assert!(authorize(Role::Moderator, Action::DeletePost).is_ok());
        assert!(authorize(Role::Administrator, Action::DeletePost).is_ok());
        for role in [Role::Student, Role::Faculty, Role::Staff] {
            assert_eq!(
                authorize(role, Action::DeletePost).unwrap_err(),
                AuthzError::Forbidden {
                    role,
                    action: Action::DeletePost
                }
            );
        }
    }

    #[test]
    fn account_management_is_administrator_only() {
        assert!(authorize(Role::Administrator, Action::ManageAccounts).is_ok());
        assert!(authorize(Role::Moderator, Action::ManageAccounts).is_err());
        assert!(authorize(Role::Moderator, Action::ViewAccounts).is_err());
    }

    #[test]
    fn logged_out_session_is_not_authenticated() {
        let err = authorize_session(&Session::LoggedOut, Action::CreatePost).unwrap_err();
        assert_eq!(err, AuthzError::NotAuthenticated);
    }

    #[test]
    fn session_role_drives_decision() {
        let dir = AccountDirectory::seeded();
        let mut session = Session::new();
        session.login(&dir, "moderator", "mod123", Role::Moderator).unwrap();

        assert_eq!(
            authorize_session(&session, Action::DeletePost).unwrap().username,
            "moderator"
        );
        assert!(authorize_session(&session, Action::ManageAccounts).is_err());
    }

    #[test]
    fn permitted_actions_per_role() {
        assert_eq!(
            permitted_actions(Role::Student),
            vec![Action::CreatePost, Action::Reply]
        );
        assert_eq!(permitted_actions(Role::Administrator), Action::ALL.to_vec());
    }

    #[test]
    fn forbidden_message_names_role_and_action() {
        let err = authorize(Role::Staff, Action::DeletePost).unwrap_err();
        assert_eq!(
            err.to_string(),
            "forbidden: role Staff may not perform 'forum.post.delete'"
        );
    }
}
