//! Value object trait: equality by value, not identity.

/// Marker trait for immutable values compared field by field.
///
/// Amounts and transactions are value objects: once built they never change,
/// and two of them with equal fields are interchangeable.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Rate { numerator: u32, denominator: u32 }
///
/// impl ValueObject for Rate {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
