//! The nullable integer leaf: `Option<i64>` values encoded against an in-band
//! null sentinel.
//!
//! Physical slot 0 of the packed array holds the sentinel. Logical element `i`
//! lives in physical slot `i + 1` and is null exactly when it holds the sentinel.
//! No non-null element may ever equal the sentinel: before a value that collides
//! with it is written, a fresh sentinel is chosen and every null cell rewritten.

use std::sync::Arc;

use crate::config::ColumnConfig;
use crate::error::IntColumnError;
use crate::packed_array::{PackedArray, RawArrayView};
use crate::search::{Layout, ScanSource};
use crate::traits::IntegerLeaf;

/// Number of elements returned by `get_chunk`.
pub const CHUNK_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullableIntegerColumn {
    array: PackedArray,
    config: Arc<ColumnConfig>,
}

impl Default for NullableIntegerColumn {
    fn default() -> Self {
        Self::new()
    }
}

impl NullableIntegerColumn {
    /// Creates an empty column using the default configuration (sentinel 0).
    pub fn new() -> Self {
        let config = ColumnConfig::default();
        Self {
            array: PackedArray::filled(1, config.sentinel.initial),
            config: Arc::new(config),
        }
    }

    /// Creates an empty column that takes its sentinel policy and initial element
    /// width from `config`.
    pub fn with_config(config: Arc<ColumnConfig>) -> Result<Self, IntColumnError> {
        let mut array = PackedArray::with_width(config.initial_width)?;
        array.add(config.sentinel.initial)?;
        Ok(Self { array, config })
    }

    /// Creates a column holding `size` nulls.
    pub fn with_nulls(size: usize, config: Arc<ColumnConfig>) -> Result<Self, IntColumnError> {
        let mut column = Self::with_config(config)?;
        let sentinel = column.null_value();
        for _ in 0..size {
            column.array.add(sentinel)?;
        }
        Ok(column)
    }

    /// Rebuilds a column from bytes produced by `to_bytes`.
    pub fn from_bytes(bytes: &[u8], config: Arc<ColumnConfig>) -> Result<Self, IntColumnError> {
        let array = PackedArray::from_bytes(bytes)?;
        if array.is_empty() {
            return Err(IntColumnError::RawFormatError(
                "nullable leaf is missing its sentinel cell".to_string(),
            ));
        }
        Ok(Self { array, config })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.array.to_bytes()
    }

    pub fn default_value(nullable: bool) -> Option<i64> {
        if nullable {
            None
        } else {
            Some(0)
        }
    }

    pub fn config(&self) -> &Arc<ColumnConfig> {
        &self.config
    }

    //==============================================================================
    // Reads
    //==============================================================================

    pub fn size(&self) -> usize {
        self.array.size() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// The raw value currently marking nulls.
    pub fn null_value(&self) -> i64 {
        self.array.at(0)
    }

    pub fn width(&self) -> u8 {
        self.array.width()
    }

    pub fn get(&self, index: usize) -> Result<Option<i64>, IntColumnError> {
        let raw = self.array.get(self.physical(index)?)?;
        Ok(self.decode(raw))
    }

    /// Reads logical element `index` straight from a serialized nullable leaf,
    /// using the sentinel stored in the view's slot 0.
    pub fn get_raw(view: &RawArrayView<'_>, index: usize) -> Result<Option<i64>, IntColumnError> {
        let size = view.size().saturating_sub(1);
        if index >= size {
            return Err(IntColumnError::IndexOutOfBounds { index, size });
        }
        let null_value = view.get(0)?;
        let value = view.get(index + 1)?;
        Ok(if value == null_value { None } else { Some(value) })
    }

    pub fn is_null(&self, index: usize) -> Result<bool, IntColumnError> {
        Ok(self.get(index)?.is_none())
    }

    /// Reads up to `CHUNK_LEN` consecutive elements starting at `index`.
    /// Positions past the end of the column are `None`.
    pub fn get_chunk(&self, index: usize) -> Result<[Option<i64>; CHUNK_LEN], IntColumnError> {
        self.physical(index)?;
        let mut chunk = [None; CHUNK_LEN];
        let end = (index + CHUNK_LEN).min(self.size());
        for (slot, i) in chunk.iter_mut().zip(index..end) {
            *slot = self.decode(self.array.at(i + 1));
        }
        Ok(chunk)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<i64>> + '_ {
        let null_value = self.null_value();
        self.array
            .iter()
            .skip(1)
            .map(move |raw| if raw == null_value { None } else { Some(raw) })
    }

    //==============================================================================
    // Mutations
    //==============================================================================

    pub fn set(&mut self, index: usize, value: Option<i64>) -> Result<(), IntColumnError> {
        let physical = self.physical(index)?;
        let raw = self.encode(value)?;
        self.array.set(physical, raw)
    }

    pub fn set_null(&mut self, index: usize) -> Result<(), IntColumnError> {
        self.set(index, None)
    }

    /// Inserts before logical `index`; `index == size()` appends.
    pub fn insert(&mut self, index: usize, value: Option<i64>) -> Result<(), IntColumnError> {
        if index > self.size() {
            return Err(IntColumnError::IndexOutOfBounds {
                index,
                size: self.size(),
            });
        }
        let raw = self.encode(value)?;
        self.array.insert(index + 1, raw)
    }

    pub fn add(&mut self, value: Option<i64>) -> Result<(), IntColumnError> {
        let raw = self.encode(value)?;
        self.array.add(raw)
    }

    pub fn erase(&mut self, index: usize) -> Result<(), IntColumnError> {
        let physical = self.physical(index)?;
        self.array.erase(physical)
    }

    pub fn erase_range(&mut self, begin: usize, end: usize) -> Result<(), IntColumnError> {
        self.check_range(begin, end)?;
        self.array.erase_range(begin + 1, end + 1)
    }

    /// Copies logical `[begin, end)` to start at `dest` (memmove semantics).
    pub fn move_range(&mut self, begin: usize, end: usize, dest: usize) -> Result<(), IntColumnError> {
        self.check_range(begin, end)?;
        let count = end - begin;
        match dest.checked_add(count) {
            Some(dest_end) if dest_end <= self.size() => {}
            _ => {
                return Err(IntColumnError::InvalidRange {
                    start: dest,
                    end: dest.saturating_add(count),
                    size: self.size(),
                })
            }
        }
        self.array.move_range(begin + 1, end + 1, dest + 1)
    }

    /// Drops every logical element from `new_size` on.
    pub fn truncate(&mut self, new_size: usize) -> Result<(), IntColumnError> {
        if new_size > self.size() {
            return Err(IntColumnError::IndexOutOfBounds {
                index: new_size,
                size: self.size(),
            });
        }
        self.array.truncate(new_size + 1)
    }

    /// Empties the column and resets the sentinel to its configured initial value.
    pub fn clear(&mut self) {
        self.array.clear_to(self.config.sentinel.initial);
    }

    /// Moves logical elements `[index, size)` to the end of `dst`, then truncates
    /// `self` to `index`. Values are re-encoded against `dst`'s own sentinel.
    pub fn move_tail_to(&mut self, dst: &mut NullableIntegerColumn, index: usize) -> Result<(), IntColumnError> {
        if index > self.size() {
            return Err(IntColumnError::IndexOutOfBounds {
                index,
                size: self.size(),
            });
        }
        for i in index..self.size() {
            dst.add(self.get(i)?)?;
        }
        self.truncate(index)
    }

    //==============================================================================
    // Sentinel management
    //==============================================================================

    /// Makes `value` safe to store as a non-null element.
    ///
    /// If `value` equals the current sentinel, a new sentinel is chosen that no
    /// live element uses, every null cell is rewritten to it and slot 0 updated.
    pub(crate) fn avoid_null_collision(&mut self, value: i64) -> Result<(), IntColumnError> {
        let old_null = self.null_value();
        if value != old_null {
            return Ok(());
        }
        let new_null = self.choose_null(value)?;
        let rewritten = self.replace_nulls_with(new_null)?;

        log::debug!(
            "null sentinel changed {} -> {} ({} null cells rewritten)",
            old_null,
            new_null,
            rewritten
        );
        if self.config.enable_metrics {
            log_metric!(
                "event" = "null_sentinel_changed",
                "old" = old_null,
                "new" = new_null,
                "rewritten" = rewritten,
                "size" = self.size(),
            );
        }
        Ok(())
    }

    /// Picks a sentinel different from `incoming` and from every live value.
    ///
    /// Configured candidates are tried first, in order. If all of them are taken,
    /// the value just above the live range is used, then the one just below it,
    /// and finally the lowest gap between live values.
    fn choose_null(&self, incoming: i64) -> Result<i64, IntColumnError> {
        if let Some(candidate) = self
            .config
            .sentinel
            .candidates
            .iter()
            .copied()
            .find(|&c| c != incoming && self.can_use_as_null(c))
        {
            return Ok(candidate);
        }

        let mut live: Vec<i64> = self.iter().flatten().collect();
        live.push(incoming);
        let lo = live.iter().copied().min().unwrap_or(incoming);
        let hi = live.iter().copied().max().unwrap_or(incoming);
        if let Some(above) = hi.checked_add(1) {
            return Ok(above);
        }
        if let Some(below) = lo.checked_sub(1) {
            return Ok(below);
        }

        live.sort_unstable();
        live.dedup();
        let mut expected = i64::MIN;
        for v in live {
            if v > expected {
                return Ok(expected);
            }
            match v.checked_add(1) {
                Some(next) => expected = next,
                None => break,
            }
        }
        Err(IntColumnError::SentinelExhausted)
    }

    /// Returns `true` if no live non-null element holds `candidate`.
    fn can_use_as_null(&self, candidate: i64) -> bool {
        let old_null = self.null_value();
        candidate == old_null || !self.array.iter().skip(1).any(|raw| raw == candidate)
    }

    /// Rewrites every null cell and slot 0 to `new_null`. Returns the number of
    /// null cells rewritten.
    fn replace_nulls_with(&mut self, new_null: i64) -> Result<usize, IntColumnError> {
        let old_null = self.null_value();
        let mut rewritten = 0;
        for physical in 1..self.array.size() {
            if self.array.at(physical) == old_null {
                self.array.set(physical, new_null)?;
                rewritten += 1;
            }
        }
        self.array.set(0, new_null)?;
        Ok(rewritten)
    }

    //==============================================================================
    // Private helpers
    //==============================================================================

    /// Validates logical `index` and returns its physical slot.
    fn physical(&self, index: usize) -> Result<usize, IntColumnError> {
        if index >= self.size() {
            return Err(IntColumnError::IndexOutOfBounds {
                index,
                size: self.size(),
            });
        }
        Ok(index + 1)
    }

    fn check_range(&self, begin: usize, end: usize) -> Result<(), IntColumnError> {
        if begin > end || end > self.size() {
            return Err(IntColumnError::InvalidRange {
                start: begin,
                end,
                size: self.size(),
            });
        }
        Ok(())
    }

    /// Maps a logical value to the raw value to store, resolving sentinel
    /// collisions first.
    fn encode(&mut self, value: Option<i64>) -> Result<i64, IntColumnError> {
        match value {
            Some(v) => {
                self.avoid_null_collision(v)?;
                Ok(v)
            }
            None => Ok(self.null_value()),
        }
    }

    fn decode(&self, raw: i64) -> Option<i64> {
        if raw == self.null_value() {
            None
        } else {
            Some(raw)
        }
    }
}

impl IntegerLeaf for NullableIntegerColumn {
    type Value = Option<i64>;

    fn default_value(nullable: bool) -> Option<i64> {
        NullableIntegerColumn::default_value(nullable)
    }

    fn size(&self) -> usize {
        NullableIntegerColumn::size(self)
    }

    fn get(&self, index: usize) -> Result<Option<i64>, IntColumnError> {
        NullableIntegerColumn::get(self, index)
    }

    fn set(&mut self, index: usize, value: Option<i64>) -> Result<(), IntColumnError> {
        NullableIntegerColumn::set(self, index, value)
    }

    fn insert(&mut self, index: usize, value: Option<i64>) -> Result<(), IntColumnError> {
        NullableIntegerColumn::insert(self, index, value)
    }

    fn add(&mut self, value: Option<i64>) -> Result<(), IntColumnError> {
        NullableIntegerColumn::add(self, value)
    }

    fn erase(&mut self, index: usize) -> Result<(), IntColumnError> {
        NullableIntegerColumn::erase(self, index)
    }

    fn clear(&mut self) {
        NullableIntegerColumn::clear(self)
    }

    fn is_null(&self, index: usize) -> Result<bool, IntColumnError> {
        NullableIntegerColumn::is_null(self, index)
    }
}

impl ScanSource for NullableIntegerColumn {
    fn layout(&self) -> Layout {
        Layout::Nullable
    }

    fn physical_size(&self) -> usize {
        self.array.size()
    }

    fn width(&self) -> u8 {
        self.array.width()
    }

    fn read_physical(&self, index: usize) -> i64 {
        self.array.at(index)
    }
}
