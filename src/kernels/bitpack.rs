//! This module contains the pure, stateless kernels for reading and writing
//! fixed-width integers inside a bit-packed buffer.
//!
//! Element `i` of a buffer packed at `width` bits occupies bits
//! `[i * width, (i + 1) * width)`, least significant bit first. Widths of 8 bits
//! and more are sign-extended on read. Width 0 stores nothing and always reads 0.
//! The kernels are generic over the `bitvec` storage word so the same code serves
//! owned `u64`-backed arrays and borrowed `u8` byte buffers.

use bitvec::prelude::*;

/// Mask selecting the low `width` bits of a `u64`.
fn low_mask(width: u8) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Reinterprets the low `width` bits of `raw` as an element value.
fn widen(raw: u64, width: u8) -> i64 {
    if width < 8 {
        return raw as i64;
    }
    let shift = 64 - u32::from(width);
    ((raw << shift) as i64) >> shift
}

/// Reads element `index` from a buffer packed at `width` bits.
///
/// The caller guarantees `(index + 1) * width <= bits.len()`.
pub fn read<T>(bits: &BitSlice<T, Lsb0>, width: u8, index: usize) -> i64
where
    T: BitStore,
{
    if width == 0 {
        return 0;
    }
    let w = width as usize;
    let raw: u64 = bits[index * w..(index + 1) * w].load_le();
    widen(raw, width)
}

/// Writes `value` into element `index` of a buffer packed at `width` bits.
///
/// The caller guarantees the value fits the width and the slot is in bounds.
pub fn write<T>(bits: &mut BitSlice<T, Lsb0>, width: u8, index: usize, value: i64)
where
    T: BitStore,
{
    if width == 0 {
        return;
    }
    let w = width as usize;
    bits[index * w..(index + 1) * w].store_le((value as u64) & low_mask(width));
}

/// Packs `values` into a fresh `u64`-backed buffer at `width` bits per element.
pub fn encode<I>(values: I, width: u8) -> BitVec<u64, Lsb0>
where
    I: ExactSizeIterator<Item = i64>,
{
    let len = values.len();
    let mut bits = bitvec![u64, Lsb0; 0; len * width as usize];
    for (i, value) in values.enumerate() {
        write(bits.as_mut_bitslice(), width, i, value);
    }
    bits
}

/// Unpacks the first `count` elements of a buffer packed at `width` bits.
pub fn decode<T>(bits: &BitSlice<T, Lsb0>, width: u8, count: usize) -> Vec<i64>
where
    T: BitStore,
{
    (0..count).map(|i| read(bits, width, i)).collect()
}
