//! Comparison conditions evaluated by the match engine.

use serde::{Deserialize, Serialize};

/// A comparison between a stored element and the query target.
///
/// Elements and targets are `Option<i64>`: `None` is a null element or a null
/// target. A null target is matched by identity only, so just `Equal`,
/// `NotEqual` and `None` accept one.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
    /// Matches every element, null or not.
    None,
}

impl Condition {
    /// Returns `true` if the condition has a defined meaning against a null target.
    pub fn accepts_null_target(self) -> bool {
        matches!(self, Condition::Equal | Condition::NotEqual | Condition::None)
    }

    /// Evaluates the condition for one element.
    ///
    /// Ordered comparisons never match a null element. A null element is not
    /// equal to any value, so `NotEqual` matches it for every value target.
    pub fn matches(self, element: Option<i64>, target: Option<i64>) -> bool {
        match self {
            Condition::None => true,
            Condition::Equal => element == target,
            Condition::NotEqual => element != target,
            Condition::Greater => Self::ordered(element, target, |e, t| e > t),
            Condition::Less => Self::ordered(element, target, |e, t| e < t),
            Condition::GreaterEqual => Self::ordered(element, target, |e, t| e >= t),
            Condition::LessEqual => Self::ordered(element, target, |e, t| e <= t),
        }
    }

    /// Returns `false` if no non-null value in `[lo, hi]` can satisfy the
    /// condition against `target`, which lets a scan over an array whose element
    /// width bounds its values to that range finish without reading anything.
    ///
    /// `NotEqual` and `None` can match null elements and are never pruned.
    pub fn can_match_within(self, target: i64, lo: i64, hi: i64) -> bool {
        match self {
            Condition::Equal => lo <= target && target <= hi,
            Condition::Greater => hi > target,
            Condition::Less => lo < target,
            Condition::GreaterEqual => hi >= target,
            Condition::LessEqual => lo <= target,
            Condition::NotEqual | Condition::None => true,
        }
    }

    fn ordered(element: Option<i64>, target: Option<i64>, cmp: impl Fn(i64, i64) -> bool) -> bool {
        match (element, target) {
            (Some(e), Some(t)) => cmp(e, t),
            _ => false,
        }
    }
}
