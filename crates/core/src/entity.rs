//! Entity trait: identity that survives state changes.

/// Something with a stable identifier.
///
/// Two entities with the same id are the same thing even if their other
/// fields differ (an account keeps its id across deposits and deactivation).
pub trait Entity {
    /// Strongly-typed identifier.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> &Self::Id;
}
