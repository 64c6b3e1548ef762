//! Entity trait: what the store and the facade need to know about a record.

/// Entity marker + minimal interface.
///
/// Entities do not carry their own identifier; the store assigns an
/// [`InternalId`](crate::InternalId) and keeps it next to the value.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Short, stable kind name (used in logs).
    const KIND: &'static str;

    /// Whether this entity may be shown through the external-facing path.
    ///
    /// A hidden entity is reported exactly like a missing one.
    fn is_visible(&self) -> bool {
        true
    }
}
