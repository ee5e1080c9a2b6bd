//! Session: the single currently-authenticated account.
//!
//! ```text
//! LoggedOut --login ok--> LoggedIn --logout--> LoggedOut
//! LoggedOut --login err--> LoggedOut
//! ```
//!
//! `login` is only accepted from `LoggedOut`.

use serde::{Deserialize, Serialize};

use crate::{Account, AccountDirectory, AuthError, Role};

/// What a session remembers about its account.
///
/// This is a snapshot taken at login. Later changes to the directory record
/// (e.g. the account being disabled) do not reach an active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAccount {
    pub username: String,
    pub role: Role,
}

impl From<&Account> for SessionAccount {
    fn from(account: &Account) -> Self {
        Self {
            username: account.username().to_string(),
            role: account.role(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "account", rename_all = "snake_case")]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn(SessionAccount),
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticate against `directory` and, on success, install the account.
    ///
    /// Refused with `AlreadyAuthenticated` while a session is active. On any
    /// failure the session keeps the state it had before the attempt.
    pub fn login(
        &mut self,
        directory: &AccountDirectory,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<SessionAccount, AuthError> {
        if self.is_authenticated() {
            return Err(AuthError::AlreadyAuthenticated);
        }
        let account = SessionAccount::from(directory.authenticate(username, password, role)?);
        *self = Session::LoggedIn(account.clone());
        Ok(account)
    }

    /// Clear the session. Always succeeds, also when already logged out.
    pub fn logout(&mut self) -> Option<SessionAccount> {
        match std::mem::take(self) {
            Session::LoggedIn(account) => Some(account),
            Session::LoggedOut => None,
        }
    }

    pub fn current(&self) -> Option<&SessionAccount> {
        match self {
            Session::LoggedIn(account) => Some(account),
            Session::LoggedOut => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::LoggedIn(_))
    }
}
