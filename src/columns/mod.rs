//! This module serves as the public API for the two integer leaf representations.
//!
//! * `IntegerColumn`: plain `i64` values, logical index == physical index.
//! * `NullableIntegerColumn`: `Option<i64>` values, with a hidden sentinel cell
//!   in physical slot 0.
//!
//! Both implement `IntegerLeaf` for typed access and `ScanSource` for search.
//! `RawLeaf` lets the search engine run directly over serialized leaf bytes.

//==================================================================================
// 1. Module Declarations
//==================================================================================

pub mod integer;
pub mod nullable;
pub mod raw_leaf;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================

pub use integer::IntegerColumn;
pub use nullable::{NullableIntegerColumn, CHUNK_LEN};
pub use raw_leaf::RawLeaf;

//==================================================================================
// 3. Unit Tests (Module-level integration tests)
//==================================================================================

#[cfg(test)]
mod nullable_tests;
