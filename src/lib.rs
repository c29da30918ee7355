//! This file is the root of the `intleaf` Rust crate.
//!
//! `intleaf` provides the leaf-level integer arrays of a columnar storage engine:
//! bit-packed `i64` sequences that grow their element width on demand, a
//! nullable variant that encodes nulls with a self-adjusting in-band sentinel,
//! and a condition/action match engine that scans either representation, owned
//! or straight from serialized bytes.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of the library.
//! 2.  Re-exporting the types most callers need.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod columns;
pub mod config;
pub mod error;
pub mod kernels;
pub mod packed_array;
pub mod search;
pub mod traits;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use columns::{IntegerColumn, NullableIntegerColumn, RawLeaf, CHUNK_LEN};
pub use config::{ColumnConfig, SentinelConfig};
pub use error::IntColumnError;
pub use observability::init_logging;
pub use packed_array::{PackedArray, RawArrayView};
pub use search::{Action, Condition, Layout, QueryAccumulator, QueryState, ScanSource};
pub use traits::IntegerLeaf;
