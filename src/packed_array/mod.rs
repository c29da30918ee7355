//! The packed-array primitive every integer leaf is built on.
//!
//! A `PackedArray` is a growable sequence of signed 64-bit integers stored at the
//! narrowest element width that fits every value written so far. It knows nothing
//! about nulls: the column facades in `crate::columns` layer that on top.
//!
//! All index-based operations are bounds-checked and report violations as
//! `IntColumnError::IndexOutOfBounds` / `IntColumnError::InvalidRange`.

use bitvec::prelude::*;

use crate::error::IntColumnError;
use crate::kernels::{bitpack, bitwidth};

pub mod raw;

pub use raw::{get_raw, RawArrayView, RawHeader, HEADER_LEN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedArray {
    bits: BitVec<u64, Lsb0>,
    width: u8,
    /// Width the array returns to when it is emptied.
    base_width: u8,
    size: usize,
}

impl Default for PackedArray {
    fn default() -> Self {
        Self::new()
    }
}

impl PackedArray {
    /// Creates an empty array with element width 0.
    pub fn new() -> Self {
        Self {
            bits: BitVec::new(),
            width: 0,
            base_width: 0,
            size: 0,
        }
    }

    /// Creates an empty array that starts out (and resets to) `width` bits per element.
    pub fn with_width(width: u8) -> Result<Self, IntColumnError> {
        let width = bitwidth::check_width(width)?;
        Ok(Self {
            bits: BitVec::new(),
            width,
            base_width: width,
            size: 0,
        })
    }

    /// Creates an array of `size` copies of `value`.
    pub fn filled(size: usize, value: i64) -> Self {
        let width = bitwidth::bit_width(value);
        Self {
            bits: bitpack::encode(std::iter::repeat(value).take(size), width),
            width,
            base_width: 0,
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Current element width in bits.
    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn get(&self, index: usize) -> Result<i64, IntColumnError> {
        self.check_index(index)?;
        Ok(bitpack::read(self.bits.as_bitslice(), self.width, index))
    }

    /// Unchecked-by-contract read for scans that already validated their range.
    ///
    /// Panics if `index` is out of bounds.
    pub(crate) fn at(&self, index: usize) -> i64 {
        assert!(index < self.size, "packed array index {} out of bounds", index);
        bitpack::read(self.bits.as_bitslice(), self.width, index)
    }

    pub fn set(&mut self, index: usize, value: i64) -> Result<(), IntColumnError> {
        self.check_index(index)?;
        self.ensure_width(value);
        bitpack::write(self.bits.as_mut_bitslice(), self.width, index, value);
        Ok(())
    }

    /// Inserts `value` before `index`; `index == size()` appends.
    pub fn insert(&mut self, index: usize, value: i64) -> Result<(), IntColumnError> {
        if index > self.size {
            return Err(IntColumnError::IndexOutOfBounds {
                index,
                size: self.size,
            });
        }
        self.ensure_width(value);

        let w = self.width as usize;
        let old_bits = self.size * w;
        self.bits.resize(old_bits + w, false);
        if index < self.size {
            self.bits.copy_within(index * w..old_bits, (index + 1) * w);
        }
        self.size += 1;
        bitpack::write(self.bits.as_mut_bitslice(), self.width, index, value);
        Ok(())
    }

    pub fn add(&mut self, value: i64) -> Result<(), IntColumnError> {
        self.insert(self.size, value)
    }

    pub fn erase(&mut self, index: usize) -> Result<(), IntColumnError> {
        self.check_index(index)?;
        self.erase_range(index, index + 1)
    }

    /// Removes the elements in `[begin, end)`, shifting the tail down.
    pub fn erase_range(&mut self, begin: usize, end: usize) -> Result<(), IntColumnError> {
        self.check_range(begin, end)?;
        if begin == end {
            return Ok(());
        }
        let w = self.width as usize;
        self.bits.copy_within(end * w..self.size * w, begin * w);
        self.size -= end - begin;
        self.bits.truncate(self.size * w);
        Ok(())
    }

    /// Copies the elements in `[begin, end)` so they start at `dest`, with memmove
    /// semantics for overlapping ranges. The size does not change; cells of the
    /// source range not covered by the destination keep their old values.
    pub fn move_range(&mut self, begin: usize, end: usize, dest: usize) -> Result<(), IntColumnError> {
        self.check_range(begin, end)?;
        let count = end - begin;
        match dest.checked_add(count) {
            Some(dest_end) if dest_end <= self.size => {}
            _ => {
                return Err(IntColumnError::InvalidRange {
                    start: dest,
                    end: dest.saturating_add(count),
                    size: self.size,
                })
            }
        }
        if count == 0 || dest == begin {
            return Ok(());
        }
        let w = self.width as usize;
        self.bits.copy_within(begin * w..end * w, dest * w);
        Ok(())
    }

    /// Shrinks the array to its first `new_size` elements.
    pub fn truncate(&mut self, new_size: usize) -> Result<(), IntColumnError> {
        if new_size > self.size {
            return Err(IntColumnError::IndexOutOfBounds {
                index: new_size,
                size: self.size,
            });
        }
        self.size = new_size;
        if new_size == 0 {
            self.bits.clear();
            self.width = self.base_width;
        } else {
            self.bits.truncate(new_size * self.width as usize);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.size = 0;
        self.bits.clear();
        self.width = self.base_width;
    }

    /// Empties the array and leaves `value` as its only element.
    pub fn clear_to(&mut self, value: i64) {
        let width = bitwidth::bit_width(value).max(self.base_width);
        self.bits = bitpack::encode(std::iter::once(value), width);
        self.width = width;
        self.size = 1;
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = i64> + '_ {
        (0..self.size).map(move |i| bitpack::read(self.bits.as_bitslice(), self.width, i))
    }

    /// Serializes the array as a `RawHeader` followed by its packed payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let header = RawHeader::new(self.size, self.width);
        let mut payload: BitVec<u8, Lsb0> = BitVec::with_capacity(self.bits.len());
        payload.extend_from_bitslice(&self.bits[..self.size * self.width as usize]);
        payload.set_uninitialized(false);

        let mut out = Vec::with_capacity(HEADER_LEN + payload.as_raw_slice().len());
        out.extend_from_slice(bytemuck::bytes_of(&header));
        out.extend_from_slice(payload.as_raw_slice());
        out
    }

    /// Rebuilds an owned array from bytes produced by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IntColumnError> {
        let view = RawArrayView::new(bytes)?;
        Ok(Self {
            bits: bitpack::encode(view.iter(), view.width()),
            width: view.width(),
            base_width: 0,
            size: view.size(),
        })
    }

    //==============================================================================
    // Private helpers
    //==============================================================================

    fn check_index(&self, index: usize) -> Result<(), IntColumnError> {
        if index >= self.size {
            return Err(IntColumnError::IndexOutOfBounds {
                index,
                size: self.size,
            });
        }
        Ok(())
    }

    fn check_range(&self, begin: usize, end: usize) -> Result<(), IntColumnError> {
        if begin > end || end > self.size {
            return Err(IntColumnError::InvalidRange {
                start: begin,
                end,
                size: self.size,
            });
        }
        Ok(())
    }

    /// Re-packs every element at a wider width if `value` does not fit the current one.
    fn ensure_width(&mut self, value: i64) {
        if bitwidth::fits(value, self.width) {
            return;
        }
        let new_width = bitwidth::bit_width(value).max(self.width);
        log::trace!(
            "packed array widening {} -> {} bits for value {} ({} elements)",
            self.width,
            new_width,
            value,
            self.size
        );
        let values = bitpack::decode(self.bits.as_bitslice(), self.width, self.size);
        self.bits = bitpack::encode(values.into_iter(), new_width);
        self.width = new_width;
    }
}
