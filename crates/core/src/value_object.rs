//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two values with the same attributes are
/// equal and interchangeable. They are immutable; "changing" one produces a
/// new value.
///
/// In this workspace the fixed-point [`Amount`](crate::Amount) and
/// [`Quantity`](crate::Quantity) types are value objects, and so are the
/// computed totals of a printable quote.
///
/// ```ignore
/// let a = Amount::from_scaled(1_000);
/// let b = Amount::from_scaled(1_000);
/// assert_eq!(a, b); // equal by value
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
