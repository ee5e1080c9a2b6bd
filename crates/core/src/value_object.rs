//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Roles and topics are value objects: a `Topic::Sports` is equal to any other
/// `Topic::Sports`, and "changing" one means replacing it.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
