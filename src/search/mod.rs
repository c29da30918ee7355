//! This module serves as the public API for the match engine shared by every
//! integer leaf representation.
//!
//! A search is parameterized by a `Condition` (how an element is compared to the
//! target), an `Action` (what happens per match) and an optional per-match
//! callback. Null targets are matched by sentinel identity, never by arithmetic.
//!
//! Leaves opt in by implementing `ScanSource`; the convenience entry points
//! (`find`, `find_first`, `find_all`, ...) then come for free.

use std::ops::{Bound, RangeBounds};

use crate::columns::IntegerColumn;
use crate::error::IntColumnError;

//==================================================================================
// 1. Module Declarations
//==================================================================================

pub mod action;
pub mod condition;
pub mod engine;
pub mod state;


//==================================================================================
// 2. Public API Re-exports
//==================================================================================

pub use action::Action;
pub use condition::Condition;
pub use state::{QueryAccumulator, QueryState};

//==================================================================================
// 3. The ScanSource contract
//==================================================================================

/// How logical elements map onto the underlying packed storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Logical index == physical index; no nulls.
    Plain,
    /// Physical slot 0 holds the null sentinel; logical `i` lives at `i + 1`.
    Nullable,
}

impl Layout {
    pub fn offset(self) -> usize {
        match self {
            Layout::Plain => 0,
            Layout::Nullable => 1,
        }
    }
}

/// Anything the match engine can scan: owned columns and borrowed raw leaves.
pub trait ScanSource {
    fn layout(&self) -> Layout;

    /// Number of physical cells, the sentinel cell included.
    fn physical_size(&self) -> usize;

    /// Current element width in bits.
    fn width(&self) -> u8;

    /// Reads physical cell `index`. The engine only asks for in-bounds cells.
    fn read_physical(&self, index: usize) -> i64;

    fn logical_size(&self) -> usize {
        self.physical_size().saturating_sub(self.layout().offset())
    }

    /// The raw value that marks a null element, if the layout has one.
    fn null_marker(&self) -> Option<i64> {
        match self.layout() {
            Layout::Plain => None,
            Layout::Nullable => Some(self.read_physical(0)),
        }
    }

    /// Runs `condition`/`action` over `[start, end)` feeding `state`. See
    /// [`engine::find`] for the full contract.
    #[allow(clippy::too_many_arguments)]
    fn find(
        &self,
        condition: Condition,
        action: Action,
        target: Option<i64>,
        start: usize,
        end: usize,
        base_index: usize,
        state: &mut dyn QueryAccumulator,
    ) -> Result<bool, IntColumnError> {
        engine::find(
            self,
            condition,
            action,
            target,
            start,
            end,
            base_index,
            state,
            |_, _, _| true,
        )
    }

    /// Like `find`, but calls `callback(index, raw_value, is_null)` for every
    /// match before the action is applied. Returning `false` stops the scan.
    #[allow(clippy::too_many_arguments)]
    fn find_with_callback<F>(
        &self,
        condition: Condition,
        action: Action,
        target: Option<i64>,
        start: usize,
        end: usize,
        base_index: usize,
        state: &mut dyn QueryAccumulator,
        callback: F,
    ) -> Result<bool, IntColumnError>
    where
        F: FnMut(usize, i64, bool) -> bool,
    {
        engine::find(
            self, condition, action, target, start, end, base_index, state, callback,
        )
    }

    /// Logical index of the first element equal to `value` within `range`.
    fn find_first<R>(&self, value: Option<i64>, range: R) -> Result<Option<usize>, IntColumnError>
    where
        R: RangeBounds<usize>,
    {
        self.find_first_with(Condition::Equal, value, range)
    }

    /// Logical index of the first element satisfying `condition` within `range`.
    fn find_first_with<R>(
        &self,
        condition: Condition,
        value: Option<i64>,
        range: R,
    ) -> Result<Option<usize>, IntColumnError>
    where
        R: RangeBounds<usize>,
    {
        let (start, end) = resolve_range(&range, self.logical_size())?;
        let mut state = QueryState::with_limit(Action::ReturnFirst, 1);
        self.find(condition, Action::ReturnFirst, value, start, end, 0, &mut state)?;
        Ok(state.first())
    }

    /// Appends `col_offset + index` to `result` for every element equal to `value`
    /// within `range`.
    fn find_all<R>(
        &self,
        result: &mut IntegerColumn,
        value: Option<i64>,
        col_offset: usize,
        range: R,
    ) -> Result<(), IntColumnError>
    where
        R: RangeBounds<usize>,
    {
        let (start, end) = resolve_range(&range, self.logical_size())?;
        let mut state = QueryState::new(Action::FindAll);
        self.find(Condition::Equal, Action::FindAll, value, start, end, col_offset, &mut state)?;
        for index in state.into_matches() {
            let index = i64::try_from(index).map_err(|_| {
                IntColumnError::InternalError(format!("match index {} exceeds i64", index))
            })?;
            result.add(index)?;
        }
        Ok(())
    }
}

/// Turns any `RangeBounds` into a validated `[start, end)` over `size` elements.
pub fn resolve_range<R>(range: &R, size: usize) -> Result<(usize, usize), IntColumnError>
where
    R: RangeBounds<usize> + ?Sized,
{
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&e) => e.saturating_add(1),
        Bound::Excluded(&e) => e,
        Bound::Unbounded => size,
    };
    if start > end || end > size {
        return Err(IntColumnError::InvalidRange { start, end, size });
    }
    Ok((start, end))
}
