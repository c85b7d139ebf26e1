//! Directory entry decoding.
//!
//! Each entry in an MPF directory is 12 bytes:
//!
//! ```text
//! Bytes 0-1:  Tag
//! Bytes 2-3:  Field type
//! Bytes 4-7:  Count (number of values, not bytes)
//! Bytes 8-11: Value (if size * count <= 4) or offset relative to the segment origin
//! ```
//!
//! Out-of-line values are copied out of the buffer while decoding so that a
//! decoded entry never borrows the input.

use bytes::Bytes;
use serde::Serialize;

use crate::error::MpoError;
use crate::io::ByteView;

use super::header::ByteOrder;
use super::tags::FieldType;

/// Size of one directory entry in bytes.
pub const ENTRY_SIZE: usize = 12;

/// Size of the entry count field at the start of a directory.
pub const ENTRY_COUNT_SIZE: usize = 2;

/// A single decoded directory entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryEntry {
    /// Tag identifying the field
    pub tag: u16,

    /// Field type
    pub field_type: FieldType,

    /// Number of values
    pub count: u32,

    /// The raw 4-byte value/offset field exactly as stored in the file
    pub value_offset_bytes: [u8; 4],

    /// Out-of-line value bytes, present only when the value does not fit inline
    pub resolved: Option<Bytes>,

    /// Byte order of the segment the entry was read from
    pub byte_order: ByteOrder,
}

impl DirectoryEntry {
    /// Decode the entry at `offset`.
    ///
    /// `origin` is the segment origin that out-of-line offsets are relative to.
    ///
    /// # Errors
    /// - `OutOfRangeRead` if the entry or its out-of-line value runs past the buffer
    /// - `UnknownFieldType` if the type code has no known size
    pub fn parse(
        view: &ByteView<'_>,
        offset: usize,
        origin: usize,
        byte_order: ByteOrder,
    ) -> Result<Self, MpoError> {
        let raw = view.slice(offset, ENTRY_SIZE)?;

        let tag = byte_order.read_u16([raw[0], raw[1]]);
        let field_type_raw = byte_order.read_u16([raw[2], raw[3]]);
        let count = byte_order.read_u32([raw[4], raw[5], raw[6], raw[7]]);
        let value_offset_bytes = [raw[8], raw[9], raw[10], raw[11]];

        let field_type =
            FieldType::from_u16(field_type_raw).ok_or(MpoError::UnknownFieldType(field_type_raw))?;

        let resolved = if field_type.fits_inline(count) {
            None
        } else {
            let size = field_type.size_in_bytes() as u64 * count as u64;
            let relative = byte_order.read_u32(value_offset_bytes) as u64;
            let start = origin as u64 + relative;
            if start.saturating_add(size) > view.len() as u64 {
                return Err(MpoError::OutOfRangeRead {
                    offset: start,
                    requested: size,
                    size: view.len() as u64,
                });
            }
            Some(view.read_exact_at(start as usize, size as usize)?)
        };

        Ok(DirectoryEntry {
            tag,
            field_type,
            count,
            value_offset_bytes,
            resolved,
            byte_order,
        })
    }

    /// Whether the value is stored inline in the entry.
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.resolved.is_none()
    }

    /// Total size of the value in bytes.
    #[inline]
    pub fn value_byte_size(&self) -> u64 {
        self.field_type.size_in_bytes() as u64 * self.count as u64
    }

    /// The 4-byte value field interpreted as a u32 in the segment's byte order.
    ///
    /// For out-of-line values this is the offset relative to the segment origin;
    /// for inline Long values it is the value itself.
    #[inline]
    pub fn offset_value(&self) -> u32 {
        self.byte_order.read_u32(self.value_offset_bytes)
    }

    /// The value bytes: the inline prefix or the resolved out-of-line buffer.
    pub fn value_bytes(&self) -> &[u8] {
        match &self.resolved {
            Some(bytes) => bytes,
            None => &self.value_offset_bytes[..self.value_byte_size() as usize],
        }
    }

    /// First value as an unsigned integer (Byte, Short or Long).
    pub fn as_u32(&self) -> Option<u32> {
        if self.count == 0 {
            return None;
        }
        let bytes = self.value_bytes();
        match self.field_type {
            FieldType::Byte | FieldType::Undefined => Some(bytes[0] as u32),
            FieldType::Short => Some(self.byte_order.read_u16([bytes[0], bytes[1]]) as u32),
            FieldType::Long => Some(
                self.byte_order
                    .read_u32([bytes[0], bytes[1], bytes[2], bytes[3]]),
            ),
            _ => None,
        }
    }

    /// First value as an unsigned rational `(numerator, denominator)`.
    pub fn as_rational(&self) -> Option<(u32, u32)> {
        if self.field_type != FieldType::Rational || self.count == 0 {
            return None;
        }
        let bytes = self.value_bytes();
        let num = self.byte_order.read_u32([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let den = self.byte_order.read_u32([bytes[4], bytes[5], bytes[6], bytes[7]]);
        Some((num, den))
    }

    /// First value as a signed rational `(numerator, denominator)`.
    pub fn as_srational(&self) -> Option<(i32, i32)> {
        if self.field_type != FieldType::SRational || self.count == 0 {
            return None;
        }
        let bytes = self.value_bytes();
        let num = self.byte_order.read_i32([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let den = self.byte_order.read_i32([bytes[4], bytes[5], bytes[6], bytes[7]]);
        Some((num, den))
    }

    /// First value as a float, for rational and floating point types.
    ///
    /// Rationals with a zero denominator yield `None`. MPF uses
    /// `0xFFFFFFFF/0xFFFFFFFF` for "unknown", which is passed through as 1.0.
    pub fn as_f64(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        let bytes = self.value_bytes();
        match self.field_type {
            FieldType::Rational => {
                let (num, den) = self.as_rational()?;
                (den != 0).then(|| num as f64 / den as f64)
            }
            FieldType::SRational => {
                let (num, den) = self.as_srational()?;
                (den != 0).then(|| num as f64 / den as f64)
            }
            FieldType::Float => {
                let raw = [bytes[0], bytes[1], bytes[2], bytes[3]];
                Some(self.byte_order.read_f32(raw) as f64)
            }
            FieldType::DFloat => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&bytes[..8]);
                Some(self.byte_order.read_f64(raw))
            }
            _ => self.as_u32().map(f64::from),
        }
    }

    /// Value bytes as text, trimmed at the first NUL.
    ///
    /// Used for Ascii fields and for the 4-byte Undefined version field ("0100").
    pub fn as_text(&self) -> Option<String> {
        match self.field_type {
            FieldType::Ascii | FieldType::Undefined => {
                let bytes = self.value_bytes();
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                Some(String::from_utf8_lossy(&bytes[..end]).into_owned())
            }
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
