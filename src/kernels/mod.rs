//! This module serves as the public API for the pure, stateless bit-level kernels
//! the packed-array primitive is built on.
//!
//! The kernels know nothing about nulls or columns: they only decide how wide an
//! element must be and move raw bits in and out of a packed buffer.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Width selection and per-width value bounds.
pub mod bitwidth;

/// Fixed-width element access over `bitvec` buffers.
pub mod bitpack;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================

pub use bitwidth::{bit_width, fits, lbound, ubound, WIDTHS};
