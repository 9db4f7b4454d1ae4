//! Entity trait: records with identity.

/// A stored record addressed by a strongly-typed id.
///
/// Quotes, line items, adjustments, contacts and images are all entities: the
/// resolver keys its lookup tables by `Entity::id`, so two records with the
/// same id are the same record regardless of their field values.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
