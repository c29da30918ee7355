//! The accumulator side of a search: where matches end up.

use super::action::Action;

/// Receives the matches produced by the engine.
///
/// The engine reports every match as `(index, raw_value, is_null)`, where
/// `index` already includes the caller's base offset and `raw_value` is the
/// stored bit pattern (the sentinel for null matches).
pub trait QueryAccumulator {
    /// Feeds one match. Returns `false` once no further matches are wanted.
    fn match_found(&mut self, action: Action, index: usize, raw_value: i64, is_null: bool) -> bool;

    fn match_count(&self) -> usize;
}

/// The stock accumulator for every built-in `Action`.
///
/// Aggregating actions (`Sum`, `Min`, `Max`) skip null matches: they are not
/// folded and not counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    action: Action,
    limit: usize,
    match_count: usize,
    first: Option<usize>,
    sum: i64,
    min: Option<i64>,
    max: Option<i64>,
    matches: Vec<usize>,
}

impl QueryState {
    pub fn new(action: Action) -> Self {
        Self::with_limit(action, usize::MAX)
    }

    /// Creates a state that stops the scan after `limit` counted matches.
    pub fn with_limit(action: Action, limit: usize) -> Self {
        Self {
            action,
            limit,
            match_count: 0,
            first: None,
            sum: 0,
            min: None,
            max: None,
            matches: Vec::new(),
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Index of the first match, for `ReturnFirst`.
    pub fn first(&self) -> Option<usize> {
        self.first
    }

    /// Wrapping sum of the non-null matches, for `Sum`.
    pub fn sum(&self) -> i64 {
        self.sum
    }

    pub fn min(&self) -> Option<i64> {
        self.min
    }

    pub fn max(&self) -> Option<i64> {
        self.max
    }

    /// Indices of every match, for `FindAll`.
    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    pub fn into_matches(self) -> Vec<usize> {
        self.matches
    }
}

impl QueryAccumulator for QueryState {
    fn match_found(&mut self, action: Action, index: usize, raw_value: i64, is_null: bool) -> bool {
        if action.is_aggregate() && is_null {
            return true;
        }
        self.match_count += 1;
        match action {
            Action::ReturnFirst => {
                self.first = Some(index);
                return false;
            }
            Action::Sum => self.sum = self.sum.wrapping_add(raw_value),
            Action::Min => self.min = Some(self.min.map_or(raw_value, |m| m.min(raw_value))),
            Action::Max => self.max = Some(self.max.map_or(raw_value, |m| m.max(raw_value))),
            Action::FindAll => self.matches.push(index),
            Action::Count | Action::CallbackIdx => {}
        }
        self.match_count < self.limit
    }

    fn match_count(&self) -> usize {
        self.match_count
    }
}
