//! This module contains the pure, stateless helpers that decide how many bits a
//! packed array element needs.
//!
//! Widths below a byte (0, 1, 2, 4) hold small non-negative values only. From 8
//! bits upwards elements are stored as two's complement signed integers.

use num_traits::{Bounded, PrimInt, Signed, ToPrimitive};

use crate::error::IntColumnError;

/// Every element width a packed array may use, in ascending order.
pub const WIDTHS: [u8; 8] = [0, 1, 2, 4, 8, 16, 32, 64];

/// Returns `true` if `width` is one of the supported element widths.
pub fn is_valid_width(width: u8) -> bool {
    WIDTHS.contains(&width)
}

pub fn check_width(width: u8) -> Result<u8, IntColumnError> {
    if is_valid_width(width) {
        Ok(width)
    } else {
        Err(IntColumnError::InvalidWidth(width))
    }
}

/// Lower and upper bound of a signed primitive, widened to `i64`.
fn signed_bounds<T>() -> (i64, i64)
where
    T: PrimInt + Signed + Bounded + ToPrimitive,
{
    // Both conversions are lossless for every signed type up to i64.
    let lo = T::min_value().to_i64().unwrap_or(i64::MIN);
    let hi = T::max_value().to_i64().unwrap_or(i64::MAX);
    (lo, hi)
}

/// Smallest value an element of `width` bits can hold.
pub fn lbound(width: u8) -> i64 {
    match width {
        0..=4 => 0,
        8 => signed_bounds::<i8>().0,
        16 => signed_bounds::<i16>().0,
        32 => signed_bounds::<i32>().0,
        _ => i64::MIN,
    }
}

/// Largest value an element of `width` bits can hold.
pub fn ubound(width: u8) -> i64 {
    match width {
        0 => 0,
        1 => 1,
        2 => 3,
        4 => 15,
        8 => signed_bounds::<i8>().1,
        16 => signed_bounds::<i16>().1,
        32 => signed_bounds::<i32>().1,
        _ => i64::MAX,
    }
}

/// Returns `true` if `value` can be stored at `width` without widening.
pub fn fits(value: i64, width: u8) -> bool {
    lbound(width) <= value && value <= ubound(width)
}

/// Returns the smallest supported width able to hold `value`.
pub fn bit_width(value: i64) -> u8 {
    WIDTHS
        .iter()
        .copied()
        .find(|&w| fits(value, w))
        .unwrap_or(64)
}
