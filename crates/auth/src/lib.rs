//! `campusboard-auth` — account directory, session and role policy.
//!
//! This crate is intentionally decoupled from presentation: the directory and
//! session perform no authorization themselves, and [`authorize`] is the
//! policy a caller consults before invoking a privileged operation.

pub mod account;
pub mod authorize;
pub mod directory;
pub mod roles;
pub mod session;

pub use account::Account;
pub use authorize::{Action, AuthzError, authorize, authorize_session, permitted_actions};
pub use directory::{
    AccountDirectory, AccountStatusChanged, AuthError, DirectoryCommand, DirectoryEvent,
    ToggleDisabled,
};
pub use roles::Role;
pub use session::{Session, SessionAccount};
