//! Zero-copy scans over serialized leaves.
//!
//! A `RawLeaf` pairs a borrowed `RawArrayView` with the layout it was written
//! in, so the match engine can search a leaf straight from its bytes without
//! building an owned column first.

use crate::packed_array::RawArrayView;
use crate::search::{Layout, ScanSource};

#[derive(Debug, Clone, Copy)]
pub struct RawLeaf<'a> {
    view: RawArrayView<'a>,
    layout: Layout,
}

impl<'a> RawLeaf<'a> {
    /// Treats the view as a plain leaf.
    pub fn plain(view: RawArrayView<'a>) -> Self {
        Self {
            view,
            layout: Layout::Plain,
        }
    }

    /// Treats the view as a nullable leaf whose slot 0 is the sentinel.
    pub fn nullable(view: RawArrayView<'a>) -> Self {
        Self {
            view,
            layout: Layout::Nullable,
        }
    }
}

impl ScanSource for RawLeaf<'_> {
    fn layout(&self) -> Layout {
        self.layout
    }

    fn physical_size(&self) -> usize {
        self.view.size()
    }

    fn width(&self) -> u8 {
        self.view.width()
    }

    fn read_physical(&self, index: usize) -> i64 {
        self.view.at(index)
    }

    fn null_marker(&self) -> Option<i64> {
        // An empty buffer has no sentinel cell to read.
        match self.layout {
            Layout::Nullable if self.view.size() > 0 => Some(self.view.at(0)),
            _ => None,
        }
    }
}
