// In: src/config.rs

//! The single source of truth for all intleaf column configuration.
//!
//! This module defines the unified `ColumnConfig` struct, which is designed to be
//! created once by the owning tree/column (e.g., from a JSON settings blob) and
//! then handed to every leaf array through a shared, read-only `Arc<ColumnConfig>`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::IntColumnError;
use crate::kernels::bitwidth;

//==================================================================================
// I. Sentinel Policy
//==================================================================================

/// Controls how nullable columns pick their in-band null sentinel.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SentinelConfig {
    /// The sentinel stored in physical slot 0 of a new or cleared nullable column.
    #[serde(default)]
    pub initial: i64,

    /// Replacement sentinels tried in order when a written value collides with
    /// the current sentinel. When every candidate is taken, the column falls back
    /// to a deterministic search outside the live value range.
    #[serde(default = "default_candidates")]
    pub candidates: Vec<i64>,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            initial: 0,
            candidates: default_candidates(),
        }
    }
}

fn default_candidates() -> Vec<i64> {
    vec![0, -1, i64::MIN, i64::MAX]
}

//==================================================================================
// II. The Unified ColumnConfig
//==================================================================================

/// The single, unified configuration for integer leaf arrays.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ColumnConfig {
    #[serde(default)]
    pub sentinel: SentinelConfig,

    /// Element width (in bits) new arrays start out with. Must be one of
    /// 0, 1, 2, 4, 8, 16, 32 or 64.
    #[serde(default)]
    pub initial_width: u8,

    /// If true, sentinel rewrites and width expansions are reported through
    /// `log_metric!`.
    #[serde(default)]
    pub enable_metrics: bool,
}

impl ColumnConfig {
    /// Parses and validates a configuration from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, IntColumnError> {
        let config: ColumnConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the settings that serde cannot express on its own.
    pub fn validate(&self) -> Result<(), IntColumnError> {
        if !bitwidth::is_valid_width(self.initial_width) {
            return Err(IntColumnError::Config(format!(
                "initial_width must be one of {:?}, got {}",
                bitwidth::WIDTHS,
                self.initial_width
            )));
        }
        Ok(())
    }

    pub fn shared(self) -> Arc<ColumnConfig> {
        Arc::new(self)
    }
}
