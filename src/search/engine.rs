//! The single generic scan loop behind every search.
//!
//! The condition and action are selected once per call; the loop reads each
//! element of the requested range, classifies it as null or value against the
//! leaf's sentinel, and hands matches to the callback and then the accumulator.

use crate::error::IntColumnError;
use crate::kernels::bitwidth;

use super::action::Action;
use super::condition::Condition;
use super::state::QueryAccumulator;
use super::ScanSource;

/// Scans logical elements `[start, end)` of `source`.
///
/// Every match is first passed to `callback` as `(index, raw_value, is_null)`
/// and then to `state`; either can stop the scan by returning `false`. Reported
/// indices are `base_index + logical index`.
///
/// Returns `Ok(true)` if the scan ran to the end of the range and `Ok(false)`
/// if it was stopped early.
///
/// # Errors
/// * `NullTargetUnsupported` if `target` is null and `condition` is an ordered
///   comparison. Nothing is scanned and `state` is left untouched.
/// * `InvalidRange` if `start > end`, `end` exceeds the logical size, or
///   `base_index` pushes a reported index past `usize::MAX`.
#[allow(clippy::too_many_arguments)]
pub fn find<S, A, F>(
    source: &S,
    condition: Condition,
    action: Action,
    target: Option<i64>,
    start: usize,
    end: usize,
    base_index: usize,
    state: &mut A,
    mut callback: F,
) -> Result<bool, IntColumnError>
where
    S: ScanSource + ?Sized,
    A: QueryAccumulator + ?Sized,
    F: FnMut(usize, i64, bool) -> bool,
{
    if target.is_none() && !condition.accepts_null_target() {
        return Err(IntColumnError::NullTargetUnsupported(condition));
    }

    let size = source.logical_size();
    if start > end || end > size {
        return Err(IntColumnError::InvalidRange { start, end, size });
    }
    if start == end {
        return Ok(true);
    }
    // Every reported index must fit a usize.
    if base_index.checked_add(end - 1).is_none() {
        return Err(IntColumnError::InvalidRange { start, end, size });
    }

    // The element width bounds every stored value, sentinel included.
    if let Some(t) = target {
        let width = source.width();
        if !condition.can_match_within(t, bitwidth::lbound(width), bitwidth::ubound(width)) {
            log::trace!(
                "find {:?} {} skipped: no {}-bit element can match",
                condition,
                t,
                width
            );
            return Ok(true);
        }
    }

    let offset = source.layout().offset();
    let null_marker = source.null_marker();

    for logical in start..end {
        let raw = source.read_physical(logical + offset);
        let element = if Some(raw) == null_marker {
            None
        } else {
            Some(raw)
        };
        if !condition.matches(element, target) {
            continue;
        }

        let index = base_index + logical;
        let is_null = element.is_none();
        if !callback(index, raw, is_null) {
            return Ok(false);
        }
        if !state.match_found(action, index, raw, is_null) {
            return Ok(false);
        }
    }
    Ok(true)
}
