// In: src/error.rs

//! This module defines the single, unified error type for the entire intleaf library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

use crate::search::Condition;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IntColumnError {
    // =========================================================================
    // === Bounds Errors (raised by the packed-array primitive)
    // =========================================================================
    #[error("Index {index} out of bounds for array of size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error("Invalid range {start}..{end} for array of size {size}")]
    InvalidRange {
        start: usize,
        end: usize,
        size: usize,
    },

    #[error("Unsupported element width: {0} bits")]
    InvalidWidth(u8),

    // =========================================================================
    // === Semantic Errors (Specific to nullable columns and search)
    // =========================================================================
    #[error("Condition {0:?} cannot be evaluated against a null target")]
    NullTargetUnsupported(Condition),

    #[error("No free value left to use as a null sentinel")]
    SentinelExhausted,

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === Raw Format & Configuration Errors
    // =========================================================================
    #[error("Raw array format error: {0}")]
    RawFormatError(String),

    /// An error from a safe byte-casting operation failing.
    #[error("Byte slice casting error: {0}")]
    PodCast(String), // Manual `From` impl is needed as bytemuck::PodCastError doesn't impl Error

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An error from the Serde JSON library, raised while parsing a `ColumnConfig`.
    #[error("Serde JSON error: {0}")]
    SerdeJson(String),
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

impl From<bytemuck::PodCastError> for IntColumnError {
    fn from(err: bytemuck::PodCastError) -> Self {
        IntColumnError::PodCast(err.to_string())
    }
}

// serde_json::Error is not `PartialEq`, so it is flattened to its message.
impl From<serde_json::Error> for IntColumnError {
    fn from(err: serde_json::Error) -> Self {
        IntColumnError::SerdeJson(err.to_string())
    }
}
