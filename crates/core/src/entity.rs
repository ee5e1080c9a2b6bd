//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Accounts are identified by username, posts by [`crate::PostId`]; two
/// snapshots with the same id describe the same entity at different times.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
