//! MPF header parsing.
//!
//! Every MPF segment starts with a TIFF-style header right after the
//! `MPF\0` signature. All offsets inside the segment are relative to the
//! first byte of this header (the segment *origin*).
//!
//! ```text
//! Bytes 0-3: Endian magic ("II*\0" = little-endian, "MM\0*" = big-endian)
//! Bytes 4-7: Offset to first IFD, relative to the origin
//! ```

use serde::Serialize;

use crate::error::MpoError;
use crate::io::{
    read_u16_be, read_u16_le, read_u32_be, read_u32_le, read_u64_be, read_u64_le, ByteView,
};

// =============================================================================
// Constants
// =============================================================================

/// Endian magic for little-endian segments ("II" + 42)
const MAGIC_LITTLE_ENDIAN: [u8; 4] = [0x49, 0x49, 0x2A, 0x00];

/// Endian magic for big-endian segments ("MM" + 42)
const MAGIC_BIG_ENDIAN: [u8; 4] = [0x4D, 0x4D, 0x00, 0x2A];

/// Size of the MPF header in bytes
pub const MPF_HEADER_SIZE: usize = 8;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of an MPF segment.
///
/// Decoding yields the same numeric value on any host: the order only says
/// how the bytes in the file must be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    /// Read a u16 using this byte order.
    #[inline]
    pub fn read_u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::LittleEndian => read_u16_le(bytes),
            ByteOrder::BigEndian => read_u16_be(bytes),
        }
    }

    /// Read a u32 using this byte order.
    #[inline]
    pub fn read_u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::LittleEndian => read_u32_le(bytes),
            ByteOrder::BigEndian => read_u32_be(bytes),
        }
    }

    /// Read a u64 using this byte order.
    #[inline]
    pub fn read_u64(self, bytes: [u8; 8]) -> u64 {
        match self {
            ByteOrder::LittleEndian => read_u64_le(bytes),
            ByteOrder::BigEndian => read_u64_be(bytes),
        }
    }

    /// Read an i16 using this byte order.
    #[inline]
    pub fn read_i16(self, bytes: [u8; 2]) -> i16 {
        self.read_u16(bytes) as i16
    }

    /// Read an i32 using this byte order.
    #[inline]
    pub fn read_i32(self, bytes: [u8; 4]) -> i32 {
        self.read_u32(bytes) as i32
    }

    /// Read an IEEE single precision float using this byte order.
    #[inline]
    pub fn read_f32(self, bytes: [u8; 4]) -> f32 {
        f32::from_bits(self.read_u32(bytes))
    }

    /// Read an IEEE double precision float using this byte order.
    #[inline]
    pub fn read_f64(self, bytes: [u8; 8]) -> f64 {
        f64::from_bits(self.read_u64(bytes))
    }

    /// Encode a u16 in this byte order.
    #[inline]
    pub fn u16_bytes(self, value: u16) -> [u8; 2] {
        match self {
            ByteOrder::LittleEndian => value.to_le_bytes(),
            ByteOrder::BigEndian => value.to_be_bytes(),
        }
    }

    /// Encode a u32 in this byte order.
    #[inline]
    pub fn u32_bytes(self, value: u32) -> [u8; 4] {
        match self {
            ByteOrder::LittleEndian => value.to_le_bytes(),
            ByteOrder::BigEndian => value.to_be_bytes(),
        }
    }

    /// The 4-byte magic that declares this byte order.
    #[inline]
    pub const fn magic(self) -> [u8; 4] {
        match self {
            ByteOrder::LittleEndian => MAGIC_LITTLE_ENDIAN,
            ByteOrder::BigEndian => MAGIC_BIG_ENDIAN,
        }
    }

    /// Bounds-checked u16 read at `offset` in `view`.
    #[inline]
    pub fn u16_at(self, view: &ByteView<'_>, offset: usize) -> Result<u16, MpoError> {
        Ok(self.read_u16(view.array_at(offset)?))
    }

    /// Bounds-checked u32 read at `offset` in `view`.
    #[inline]
    pub fn u32_at(self, view: &ByteView<'_>, offset: usize) -> Result<u32, MpoError> {
        Ok(self.read_u32(view.array_at(offset)?))
    }
}

// =============================================================================
// MpfHeader
// =============================================================================

/// Parsed MPF segment header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MpfHeader {
    /// Byte order for every multi-byte value in this segment
    pub byte_order: ByteOrder,

    /// Offset to the first IFD, relative to the segment origin
    pub first_ifd_offset: u32,
}

impl MpfHeader {
    /// Parse the header located at `origin`.
    ///
    /// # Errors
    /// - `TruncatedBuffer` if fewer than 8 bytes remain after `origin`
    /// - `BadEndianMagic` if the magic is neither `II*\0` nor `MM\0*`
    pub fn parse(view: &ByteView<'_>, origin: usize) -> Result<Self, MpoError> {
        let available = view.len().saturating_sub(origin);
        if available < MPF_HEADER_SIZE {
            return Err(MpoError::TruncatedBuffer {
                required: MPF_HEADER_SIZE,
                actual: available,
            });
        }

        let magic: [u8; 4] = view.array_at(origin)?;
        let byte_order = match magic {
            MAGIC_LITTLE_ENDIAN => ByteOrder::LittleEndian,
            MAGIC_BIG_ENDIAN => ByteOrder::BigEndian,
            _ => return Err(MpoError::BadEndianMagic(magic)),
        };

        let first_ifd_offset = byte_order.u32_at(view, origin + 4)?;

        Ok(MpfHeader {
            byte_order,
            first_ifd_offset,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
