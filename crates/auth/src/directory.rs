//! Account directory: the fixed registry of known accounts.
//!
//! The directory never gains or loses entries after construction; the only
//! mutation is flipping an account's `disabled` flag. It performs no
//! authorization of its own: callers check [`crate::authorize`] first.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use campusboard_core::{Aggregate, AggregateRoot, DomainError, DomainResult};
use campusboard_events::Event;

use crate::{Account, Role};

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Authentication failure.
///
/// `AccountDisabled` is only reported after all three login fields matched,
/// so a wrong role never reveals that a disabled account exists.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid username, password, or role")]
    InvalidCredentials,

    #[error("account is disabled")]
    AccountDisabled,

    /// A session is active; it must be logged out before another login.
    #[error("already logged in")]
    AlreadyAuthenticated,
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands & Events
// ─────────────────────────────────────────────────────────────────────────────

/// Command: flip the `disabled` flag of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleDisabled {
    pub username: String,
    pub occurred_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectoryCommand {
    ToggleDisabled(ToggleDisabled),
}

/// Event: an account's `disabled` flag now holds `disabled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatusChanged {
    pub username: String,
    pub disabled: bool,
    pub occurred_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectoryEvent {
    AccountStatusChanged(AccountStatusChanged),
}

impl Event for DirectoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DirectoryEvent::AccountStatusChanged(e) if e.disabled => "auth.account.disabled",
            DirectoryEvent::AccountStatusChanged(_) => "auth.account.enabled",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_on(&self) -> NaiveDate {
        match self {
            DirectoryEvent::AccountStatusChanged(e) => e.occurred_on,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Directory
// ─────────────────────────────────────────────────────────────────────────────

/// The registry of accounts, in seed order.
///
/// # Invariants
/// - Usernames are non-empty and unique.
/// - The set of usernames is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDirectory {
    accounts: Vec<Account>,
    version: u64,
}

impl AccountDirectory {
    /// Build a directory, rejecting empty or duplicate usernames.
    pub fn new(accounts: Vec<Account>) -> DomainResult<Self> {
        let mut seen = HashSet::new();
        for account in &accounts {
            if account.username().is_empty() {
                return Err(DomainError::validation("username cannot be empty"));
            }
            if !seen.insert(account.username()) {
                return Err(DomainError::conflict(format!(
                    "duplicate username '{}'",
                    account.username()
                )));
            }
        }

        Ok(Self {
            accounts,
            version: 0,
        })
    }

    /// The six reference accounts.
    pub fn seeded() -> Self {
        Self {
            accounts: vec![
                Account::new("student1", "student123", Role::Student),
                Account::new("faculty1", "faculty123", Role::Faculty),
                Account::new("staff1", "staff123", Role::Staff),
                Account::new("moderator", "mod123", Role::Moderator),
                Account::new("admin", "admin123", Role::Administrator),
                Account::new("disabled_user", "test123", Role::Student).disabled(),
            ],
            version: 0,
        }
    }

    /// Look up the account matching all of `username`, `password` and `role`.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<&Account, AuthError> {
        let account = self
            .accounts
            .iter()
            .find(|a| a.matches(username, password, role))
            .ok_or(AuthError::InvalidCredentials)?;

        if account.is_disabled() {
            return Err(AuthError::AccountDisabled);
        }

        Ok(account)
    }

    /// Flip `disabled` for `username` and return the updated account.
    ///
    /// Applying this twice restores the original flag.
    pub fn toggle_disabled(&mut self, username: &str, on: NaiveDate) -> DomainResult<&Account> {
        self.execute(&DirectoryCommand::ToggleDisabled(ToggleDisabled {
            username: username.to_string(),
            occurred_on: on,
        }))?;
        self.get(username)
            .ok_or_else(|| DomainError::account_not_found(username))
    }

    pub fn get(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.username() == username)
    }

    /// Snapshot of every account, in seed order.
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Default for AccountDirectory {
    fn default() -> Self {
        Self::seeded()
    }
}

impl AggregateRoot for AccountDirectory {
    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for AccountDirectory {
    type Command = DirectoryCommand;
    type Event = DirectoryEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            DirectoryEvent::AccountStatusChanged(e) => {
                if let Some(account) = self.accounts.iter_mut().find(|a| a.username() == e.username)
                {
                    account.set_disabled(e.disabled);
                }
            }
        }
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            DirectoryCommand::ToggleDisabled(cmd) => {
                let account = self
                    .get(&cmd.username)
                    .ok_or_else(|| DomainError::account_not_found(&cmd.username))?;

                Ok(vec![DirectoryEvent::AccountStatusChanged(AccountStatusChanged {
                    username: cmd.username.clone(),
                    disabled: !account.is_disabled(),
                    occurred_on: cmd.occurred_on,
                })])
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
