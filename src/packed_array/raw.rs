//! The raw byte layout of a packed array and the borrowed, zero-copy view over it.
//!
//! Layout: a 16-byte `RawHeader` followed by the bit-packed payload, rounded up to
//! whole bytes. All multi-byte header fields are little-endian.

use bitvec::prelude::*;
use bytemuck::{Pod, Zeroable};

use crate::error::IntColumnError;
use crate::kernels::{bitpack, bitwidth};

pub const HEADER_LEN: usize = std::mem::size_of::<RawHeader>();

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct RawHeader {
    size_le: u64,
    pub width: u8,
    reserved: [u8; 7],
}

impl RawHeader {
    pub fn new(size: usize, width: u8) -> Self {
        Self {
            size_le: (size as u64).to_le(),
            width,
            reserved: [0; 7],
        }
    }

    /// Element count, or `None` if it does not fit a `usize`.
    pub fn size(&self) -> Option<usize> {
        usize::try_from(u64::from_le(self.size_le)).ok()
    }

    /// Number of payload bytes needed for `size` elements of `width` bits, or
    /// `None` if that overflows.
    pub fn payload_len(&self) -> Option<usize> {
        let bits = self.size()?.checked_mul(self.width as usize)?;
        Some(bits.div_ceil(8))
    }
}

/// A borrowed view over a serialized packed array.
///
/// Reads go straight to the underlying bytes; nothing is copied or decoded up
/// front. The view cannot outlive the buffer it was created from.
#[derive(Debug, Clone, Copy)]
pub struct RawArrayView<'a> {
    size: usize,
    width: u8,
    payload: &'a BitSlice<u8, Lsb0>,
}

impl<'a> RawArrayView<'a> {
    /// Validates the header of `bytes` and wraps it without copying.
    pub fn new(bytes: &'a [u8]) -> Result<Self, IntColumnError> {
        if bytes.len() < HEADER_LEN {
            return Err(IntColumnError::RawFormatError(format!(
                "buffer of {} bytes is shorter than the {}-byte header",
                bytes.len(),
                HEADER_LEN
            )));
        }
        let header: RawHeader = bytemuck::try_pod_read_unaligned(&bytes[..HEADER_LEN])?;
        bitwidth::check_width(header.width)?;

        let (size, payload_len) = match (header.size(), header.payload_len()) {
            (Some(size), Some(len)) => (size, len),
            _ => {
                return Err(IntColumnError::RawFormatError(format!(
                    "header size {} at width {} is not addressable",
                    u64::from_le(header.size_le),
                    header.width
                )))
            }
        };
        let payload = &bytes[HEADER_LEN..];
        if payload.len() < payload_len {
            return Err(IntColumnError::RawFormatError(format!(
                "payload holds {} bytes, header requires {}",
                payload.len(),
                payload_len
            )));
        }

        Ok(Self {
            size,
            width: header.width,
            payload: BitSlice::from_slice(payload),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    /// Reads element `index` directly from the serialized payload.
    pub fn get(&self, index: usize) -> Result<i64, IntColumnError> {
        if index >= self.size {
            return Err(IntColumnError::IndexOutOfBounds {
                index,
                size: self.size,
            });
        }
        Ok(bitpack::read(self.payload, self.width, index))
    }

    /// Panics if `index` is out of bounds.
    pub(crate) fn at(&self, index: usize) -> i64 {
        assert!(index < self.size, "raw array index {} out of bounds", index);
        bitpack::read(self.payload, self.width, index)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = i64> + 'a {
        let (payload, width) = (self.payload, self.width);
        (0..self.size).map(move |i| bitpack::read(payload, width, i))
    }
}

/// Reads element `index` of the serialized array in `bytes` without building an
/// owned array.
pub fn get_raw(bytes: &[u8], index: usize) -> Result<i64, IntColumnError> {
    RawArrayView::new(bytes)?.get(index)
}
