//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a post, unique within a content store for its whole lifetime.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(u64);

/// Identifier of a reply, unique only within its parent post.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplyId(u64);

macro_rules! impl_numeric_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| DomainError::validation(format!("{}: {}", $name, e)))?;
                Ok(Self(value))
            }
        }
    };
}

impl_numeric_newtype!(PostId, "PostId");
impl_numeric_newtype!(ReplyId, "ReplyId");

/// Strictly monotonic id allocator.
///
/// Values are never handed out twice, regardless of how many entries the
/// owning collection currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdSequence {
    last: u64,
}

impl IdSequence {
    /// A sequence whose first allocated value is 1.
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    /// A sequence whose first allocated value is `last + 1`.
    pub const fn starting_after(last: u64) -> Self {
        Self { last }
    }

    /// The value the next call to [`IdSequence::next`] will return.
    pub const fn peek(&self) -> u64 {
        self.last + 1
    }

    /// The most recently allocated value (0 if none).
    pub const fn last(&self) -> u64 {
        self.last
    }

    /// Allocate the next value.
    pub fn next(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    /// Advance past `value` if it is ahead of the sequence.
    pub fn observe(&mut self, value: u64) {
        self.last = self.last.max(value);
    }
}
