//! The plain integer leaf: a typed facade over `PackedArray` with no null support.

use crate::error::IntColumnError;
use crate::packed_array::{PackedArray, RawArrayView};
use crate::search::{Layout, ScanSource};
use crate::traits::IntegerLeaf;

/// A leaf of non-null `i64` values. Every operation maps 1:1 onto the packed array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegerColumn {
    array: PackedArray,
}

impl IntegerColumn {
    pub fn new() -> Self {
        Self {
            array: PackedArray::new(),
        }
    }

    /// Creates an empty column whose elements start out `width` bits wide.
    pub fn with_width(width: u8) -> Result<Self, IntColumnError> {
        Ok(Self {
            array: PackedArray::with_width(width)?,
        })
    }

    /// Creates a column of `size` copies of `value`.
    pub fn filled(size: usize, value: i64) -> Self {
        Self {
            array: PackedArray::filled(size, value),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IntColumnError> {
        Ok(Self {
            array: PackedArray::from_bytes(bytes)?,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.array.to_bytes()
    }

    pub fn default_value() -> i64 {
        0
    }

    pub fn size(&self) -> usize {
        self.array.size()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    pub fn width(&self) -> u8 {
        self.array.width()
    }

    pub fn get(&self, index: usize) -> Result<i64, IntColumnError> {
        self.array.get(index)
    }

    /// Reads element `index` straight from a serialized leaf.
    pub fn get_raw(view: &RawArrayView<'_>, index: usize) -> Result<i64, IntColumnError> {
        view.get(index)
    }

    pub fn set(&mut self, index: usize, value: i64) -> Result<(), IntColumnError> {
        self.array.set(index, value)
    }

    pub fn insert(&mut self, index: usize, value: i64) -> Result<(), IntColumnError> {
        self.array.insert(index, value)
    }

    pub fn add(&mut self, value: i64) -> Result<(), IntColumnError> {
        self.array.add(value)
    }

    pub fn erase(&mut self, index: usize) -> Result<(), IntColumnError> {
        self.array.erase(index)
    }

    pub fn erase_range(&mut self, begin: usize, end: usize) -> Result<(), IntColumnError> {
        self.array.erase_range(begin, end)
    }

    pub fn move_range(&mut self, begin: usize, end: usize, dest: usize) -> Result<(), IntColumnError> {
        self.array.move_range(begin, end, dest)
    }

    pub fn truncate(&mut self, new_size: usize) -> Result<(), IntColumnError> {
        self.array.truncate(new_size)
    }

    pub fn clear(&mut self) {
        self.array.clear();
    }

    /// Always `false`: a plain leaf cannot hold nulls.
    pub fn is_null(&self, _index: usize) -> bool {
        false
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = i64> + '_ {
        self.array.iter()
    }
}

impl IntegerLeaf for IntegerColumn {
    type Value = i64;

    fn default_value(_nullable: bool) -> i64 {
        IntegerColumn::default_value()
    }

    fn size(&self) -> usize {
        IntegerColumn::size(self)
    }

    fn get(&self, index: usize) -> Result<i64, IntColumnError> {
        IntegerColumn::get(self, index)
    }

    fn set(&mut self, index: usize, value: i64) -> Result<(), IntColumnError> {
        IntegerColumn::set(self, index, value)
    }

    fn insert(&mut self, index: usize, value: i64) -> Result<(), IntColumnError> {
        IntegerColumn::insert(self, index, value)
    }

    fn add(&mut self, value: i64) -> Result<(), IntColumnError> {
        IntegerColumn::add(self, value)
    }

    fn erase(&mut self, index: usize) -> Result<(), IntColumnError> {
        IntegerColumn::erase(self, index)
    }

    fn clear(&mut self) {
        IntegerColumn::clear(self)
    }

    fn is_null(&self, index: usize) -> Result<bool, IntColumnError> {
        Ok(IntegerColumn::is_null(self, index))
    }
}

impl ScanSource for IntegerColumn {
    fn layout(&self) -> Layout {
        Layout::Plain
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
