//! Value object trait: equality by value, not identity.
//!
//! Everything the engine consumes or produces is a value object: line items,
//! amounts, totals reports, geometry policies and layout plans. None of them has
//! an identity, and none of them is mutated once built.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. A line item is
/// constructed from persisted records by the caller and stays fixed for the
/// duration of a layout pass; if the underlying list changes, the caller
/// recomputes the whole plan instead of patching it.
///
/// The trait requires:
/// - **Clone**: values are copied freely between calls
/// - **PartialEq**: two values with the same attributes are equal
/// - **Debug**: values show up in logs and test failures
///
/// Because every input is a value object and all intermediate state is local
/// to one call, concurrent layout of *different* documents needs no locking.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// Compile-time check that `T` is usable as a value object.
pub fn assert_value_object<T: ValueObject>() {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Money;

    #[test]
    fn money_is_a_value_object() {
        assert_value_object::<Money>();
        let a = Money::from_minor_units(100);
        let b = a;
        assert_eq!(a, b);
    }
}
