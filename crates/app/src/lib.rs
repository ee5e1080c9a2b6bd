//! `campusboard-app` — the board facade and its line-oriented shell.
//!
//! [`Board`] is the caller the core crates expect: it owns the account
//! directory, the session and the content store, enforces the role policy
//! before every privileged operation, supplies dates from a [`Clock`] and
//! publishes an event for every change so a view can re-render.

pub mod board;
pub mod clock;
pub mod config;
pub mod error;
pub mod shell;

pub use board::{Board, BoardEvent, SessionEvent};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{BoardConfig, ConfigError};
pub use error::BoardError;
