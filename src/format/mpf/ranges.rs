//! Conversion of MP entries into byte ranges.

use serde::Serialize;

use crate::error::MpoError;

use super::index::MpEntry;

/// A contiguous span of the input buffer holding one embedded JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ImageRange {
    /// File offset of the first byte (the SOI marker)
    pub start: usize,

    /// Length in bytes
    pub length: usize,
}

impl ImageRange {
    pub const fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// One past the last byte.
    #[inline]
    pub const fn end(&self) -> usize {
        self.start + self.length
    }

    /// Borrow the range from the buffer it was computed for.
    ///
    /// Returns `None` if the range does not fit in `data`.
    pub fn slice<'a>(&self, data: &'a [u8]) -> Option<&'a [u8]> {
        data.get(self.start..self.start.checked_add(self.length)?)
    }
}

/// Turn the MP entry table into one byte range per image.
///
/// Image 0 always starts at file offset 0. Every other image starts at
/// `base + data_offset`, where `base` is the origin of the primary MPF segment.
///
/// # Errors
/// `OutOfRangeRead` if any range would extend past `buffer_len`.
pub fn extract_ranges(
    entries: &[MpEntry],
    base: usize,
    buffer_len: usize,
) -> Result<Vec<ImageRange>, MpoError> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let start = if i == 0 {
                0u64
            } else {
                base as u64 + entry.data_offset as u64
            };
            let length = entry.size as u64;
            if start + length > buffer_len as u64 {
                return Err(MpoError::OutOfRangeRead {
                    offset: start,
                    requested: length,
                    size: buffer_len as u64,
                });
            }
            Ok(ImageRange::new(start as usize, length as usize))
        })
        .collect()
}

/// Start-of-image offset of each entry, without the buffer-size check.
pub fn image_start_offsets(entries: &[MpEntry], base: usize) -> Vec<usize> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            if i == 0 {
                0
            } else {
                base.saturating_add(entry.data_offset as usize)
            }
        })
        .collect()
}
