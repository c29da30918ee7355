//! This module defines shared traits used across both integer leaf representations.

use crate::error::IntColumnError;

/// The common, typed surface of an integer leaf array.
///
/// `IntegerColumn` exposes plain `i64` values, `NullableIntegerColumn` exposes
/// `Option<i64>`. Owners that do not care which representation a leaf uses can
/// drive either through this trait.
pub trait IntegerLeaf {
    type Value: Copy + PartialEq + std::fmt::Debug;

    /// The value a new element takes when the owner does not supply one.
    fn default_value(nullable: bool) -> Self::Value;

    /// Number of logical elements.
    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn get(&self, index: usize) -> Result<Self::Value, IntColumnError>;
    fn set(&mut self, index: usize, value: Self::Value) -> Result<(), IntColumnError>;
    fn insert(&mut self, index: usize, value: Self::Value) -> Result<(), IntColumnError>;
    fn add(&mut self, value: Self::Value) -> Result<(), IntColumnError>;
    fn erase(&mut self, index: usize) -> Result<(), IntColumnError>;
    fn clear(&mut self);
    fn is_null(&self, index: usize) -> Result<bool, IntColumnError>;
}
