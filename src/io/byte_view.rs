//! Bounds-checked view over the input buffer.

use bytes::Bytes;

use crate::error::MpoError;

/// Borrowed, read-only view over an in-memory MPO file.
///
/// Every accessor is bounds-checked: a read that would run past the end of
/// the buffer (or whose offset arithmetic overflows) returns
/// [`MpoError::OutOfRangeRead`] instead of panicking. The decoder threads one
/// view through every step so nothing holds the buffer longer than the call.
#[derive(Debug, Clone, Copy)]
pub struct ByteView<'a> {
    data: &'a [u8],
}

impl<'a> ByteView<'a> {
    /// Wrap a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Total size of the underlying buffer in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The whole underlying buffer.
    #[inline]
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Borrow exactly `len` bytes starting at `offset`.
    pub fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8], MpoError> {
        let end = offset
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(MpoError::OutOfRangeRead {
                offset: offset as u64,
                requested: len as u64,
                size: self.data.len() as u64,
            })?;
        Ok(&self.data[offset..end])
    }

    /// Copy exactly `len` bytes starting at `offset` into an owned buffer.
    pub fn read_exact_at(&self, offset: usize, len: usize) -> Result<Bytes, MpoError> {
        self.slice(offset, len).map(Bytes::copy_from_slice)
    }

    /// Read a fixed-size array starting at `offset`.
    pub fn array_at<const N: usize>(&self, offset: usize) -> Result<[u8; N], MpoError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.slice(offset, N)?);
        Ok(out)
    }

    /// Whether `pattern` occurs at `offset`. Out-of-range positions never match.
    #[inline]
    pub fn matches_at(&self, offset: usize, pattern: &[u8]) -> bool {
        self.slice(offset, pattern.len())
            .map(|window| window == pattern)
            .unwrap_or(false)
    }

    /// Find the first occurrence of `pattern` in `[start, end)`.
    pub fn find(&self, pattern: &[u8], start: usize, end: usize) -> Option<usize> {
        let end = end.min(self.data.len());
        if pattern.is_empty() || start >= end || end - start < pattern.len() {
            return None;
        }
        self.data[start..end]
            .windows(pattern.len())
            .position(|window| window == pattern)
            .map(|pos| start + pos)
    }
}

// =============================================================================
// Endian Helper Functions
// =============================================================================
//
// MPF segments can be either little-endian or big-endian, declared by the
// magic at the start of each segment. These helpers back `ByteOrder`.

/// Read a little-endian u16.
#[inline]
pub fn read_u16_le(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes)
}

/// Read a big-endian u16.
#[inline]
pub fn read_u16_be(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}

/// Read a little-endian u32.
#[inline]
pub fn read_u32_le(bytes: [u8; 4]) -> u32 {
    u32::from_le_bytes(bytes)
}

/// Read a big-endian u32.
#[inline]
pub fn read_u32_be(bytes: [u8; 4]) -> u32 {
    u32::from_be_bytes(bytes)
}

/// Read a little-endian u64.
#[inline]
pub fn read_u64_le(bytes: [u8; 8]) -> u64 {
    u64::from_le_bytes(bytes)
}

/// Read a big-endian u64.
#[inline]
pub fn read_u64_be(bytes: [u8; 8]) -> u64 {
    u64::from_be_bytes(bytes)
}
