//! Result actions the match engine applies to every match.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Record the index of the first match and stop.
    ReturnFirst,
    Count,
    Sum,
    Min,
    Max,
    /// Collect the index of every match.
    FindAll,
    /// Only the per-match callback observes matches.
    CallbackIdx,
}

impl Action {
    /// Aggregating actions fold values, so null matches carry nothing to fold.
    pub fn is_aggregate(self) -> bool {
        matches!(self, Action::Sum | Action::Min | Action::Max)
    }
}
