//! MP Index directory.
//!
//! The index directory is present only in the first image's MPF segment. It
//! lists how many images the file holds and points at two tables:
//!
//! - the MP entry table: one 16-byte record per image (attributes, size, offset)
//! - the optional unique-ID table: one 33-byte identifier per image
//!
//! Unlike a general TIFF IFD, the index fields sit at fixed positions:
//!
//! ```text
//! +0   entry count (u16)
//! +2   MPFVersion      (tag 45056)
//! +14  NumberOfImages  (tag 45057)
//! +26  MPEntry         (tag 45058)
//! +38  ImageUIDList    (tag 45059)   | next IFD offset (count == 3)
//! +50  TotalFrames     (tag 45060)
//! +62  next IFD offset               (count > 3)
//! ```

use bytes::Bytes;
use serde::Serialize;

use crate::error::MpoError;
use crate::io::ByteView;

use super::entry::{DirectoryEntry, ENTRY_COUNT_SIZE, ENTRY_SIZE};
use super::header::ByteOrder;
use super::tags::IndexTag;

/// Size of one MP entry record in bytes.
pub const MP_ENTRY_SIZE: usize = 16;

/// Size of one unique image ID in bytes.
pub const UNIQUE_ID_SIZE: usize = 33;

// =============================================================================
// MpEntry
// =============================================================================

/// Image data format stored in bits 24..=26 of the MP entry attribute word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageDataFormat {
    Jpeg,
    Other(u8),
}

/// MP type code stored in bits 0..=23 of the MP entry attribute word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MpType {
    BaselinePrimary,
    LargeThumbnailVga,
    LargeThumbnailFullHd,
    Panorama,
    Disparity,
    MultiAngle,
    Undefined(u32),
}

impl MpType {
    /// Decode the 24-bit type code.
    pub fn from_code(code: u32) -> Self {
        match code {
            0x030000 => MpType::BaselinePrimary,
            0x010001 => MpType::LargeThumbnailVga,
            0x010002 => MpType::LargeThumbnailFullHd,
            0x020001 => MpType::Panorama,
            0x020002 => MpType::Disparity,
            0x020003 => MpType::MultiAngle,
            other => MpType::Undefined(other),
        }
    }
}

/// One row of the MP entry table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MpEntry {
    /// Individual image attribute word (flags, data format, type code)
    pub attributes: u32,

    /// Size of the image in bytes
    pub size: u32,

    /// Start of the image relative to the primary segment origin.
    /// Always zero for the first image, which starts at file offset 0.
    pub data_offset: u32,

    /// Entry number of the first dependent image (0 if none)
    pub dependent_image_1: u16,

    /// Entry number of the second dependent image (0 if none)
    pub dependent_image_2: u16,
}

impl MpEntry {
    /// Decode a 16-byte record at `offset`.
    pub fn parse(
        view: &ByteView<'_>,
        offset: usize,
        byte_order: ByteOrder,
    ) -> Result<Self, MpoError> {
        let raw: [u8; MP_ENTRY_SIZE] = view.array_at(offset)?;
        Ok(MpEntry {
            attributes: byte_order.read_u32([raw[0], raw[1], raw[2], raw[3]]),
            size: byte_order.read_u32([raw[4], raw[5], raw[6], raw[7]]),
            data_offset: byte_order.read_u32([raw[8], raw[9], raw[10], raw[11]]),
            dependent_image_1: byte_order.read_u16([raw[12], raw[13]]),
            dependent_image_2: byte_order.read_u16([raw[14], raw[15]]),
        })
    }

    /// Whether this image has dependent child images.
    #[inline]
    pub fn is_dependent_parent(&self) -> bool {
        self.attributes & (1 << 31) != 0
    }

    /// Whether this image is a dependent child of another image.
    #[inline]
    pub fn is_dependent_child(&self) -> bool {
        self.attributes & (1 << 30) != 0
    }

    /// Whether this image is the representative image of the file.
    #[inline]
    pub fn is_representative(&self) -> bool {
        self.attributes & (1 << 29) != 0
    }

    pub fn data_format(&self) -> ImageDataFormat {
        match ((self.attributes >> 24) & 0x7) as u8 {
            0 => ImageDataFormat::Jpeg,
            other => ImageDataFormat::Other(other),
        }
    }

    pub fn mp_type(&self) -> MpType {
        MpType::from_code(self.attributes & 0x00FF_FFFF)
    }
}

// =============================================================================
// UniqueId
// =============================================================================

/// A 33-byte individual image unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniqueId {
    /// The raw identifier bytes
    pub bytes: Bytes,

    /// File offset the identifier was read from
    pub offset: usize,
}

impl UniqueId {
    /// The identifier as text, trimmed at the first NUL.
    ///
    /// Cameras typically store 32 hex digits followed by a NUL.
    pub fn as_text(&self) -> String {
        let end = self
            .bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.bytes.len());
        String::from_utf8_lossy(&self.bytes[..end]).into_owned()
    }

    /// Whether the identifier is all zeros (camera did not assign one).
    pub fn is_blank(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }
}

// =============================================================================
// IndexDirectory
// =============================================================================

/// Decoded MP Index directory with its resolved tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexDirectory {
    /// Number of fields declared by the directory
    pub entry_count: u16,

    pub version: DirectoryEntry,
    pub number_of_images: DirectoryEntry,
    pub mp_entry: DirectoryEntry,

    /// Present only when `entry_count > 3`
    pub image_uid_list: Option<DirectoryEntry>,

    /// Present only when `entry_count > 3`
    pub total_frames: Option<DirectoryEntry>,

    /// Offset of the next directory (the first image's attributes), relative
    /// to the segment origin
    pub next_ifd_offset: u32,

    /// One record per image, in file order
    pub entries: Vec<MpEntry>,

    /// One identifier per image when the file carries a unique-ID list
    pub unique_ids: Option<Vec<UniqueId>>,
}

impl IndexDirectory {
    /// Decode the index directory located at `offset`.
    ///
    /// `origin` is the segment origin; `max_images` bounds the table sizes.
    ///
    /// # Errors
    /// - `UnexpectedDirectoryShape` if the entry count is below 3
    /// - `TagMismatch` if a fixed-position field carries the wrong tag
    /// - `InvalidImageCount` / `LimitExceeded` for a zero or oversized image count
    /// - `OutOfRangeRead` if any table runs past the buffer
    pub fn parse(
        view: &ByteView<'_>,
        offset: usize,
        origin: usize,
        byte_order: ByteOrder,
        max_images: u32,
    ) -> Result<Self, MpoError> {
        let entry_count = byte_order.u16_at(view, offset)?;
        if entry_count < 3 {
            return Err(MpoError::UnexpectedDirectoryShape(entry_count));
        }

        let field_at = |slot: usize| offset + ENTRY_COUNT_SIZE + ENTRY_SIZE * slot;
        let read_field = |slot: usize, tag: IndexTag| -> Result<DirectoryEntry, MpoError> {
            let entry = DirectoryEntry::parse(view, field_at(slot), origin, byte_order)?;
            if entry.tag != tag.as_u16() {
                return Err(MpoError::TagMismatch {
                    field: tag.name(),
                    expected: tag.as_u16(),
                    actual: entry.tag,
                });
            }
            Ok(entry)
        };

        let version = read_field(0, IndexTag::MpfVersion)?;
        let number_of_images = read_field(1, IndexTag::NumberOfImages)?;
        let mp_entry = read_field(2, IndexTag::MpEntry)?;

        let (image_uid_list, total_frames, next_ifd_offset) = if entry_count > 3 {
            let uids = DirectoryEntry::parse(view, field_at(3), origin, byte_order)?;
            let frames = DirectoryEntry::parse(view, field_at(4), origin, byte_order)?;
            let next = byte_order.u32_at(view, field_at(5))?;
            (Some(uids), Some(frames), next)
        } else {
            (None, None, byte_order.u32_at(view, field_at(3))?)
        };

        let image_count = number_of_images.offset_value();
        if image_count == 0 {
            return Err(MpoError::InvalidImageCount(image_count));
        }
        if image_count > max_images {
            return Err(MpoError::LimitExceeded {
                what: "number of images",
                limit: max_images as u64,
                actual: image_count as u64,
            });
        }
        let image_count = image_count as usize;

        let table_start = origin + mp_entry.offset_value() as usize;
        let entries = (0..image_count)
            .map(|i| MpEntry::parse(view, table_start + MP_ENTRY_SIZE * i, byte_order))
            .collect::<Result<Vec<_>, _>>()?;

        let unique_ids = match &image_uid_list {
            Some(list) if list.count > 0 => Some(read_unique_ids(
                view,
                origin + list.offset_value() as usize,
                image_count,
            )?),
            _ => None,
        };

        Ok(IndexDirectory {
            entry_count,
            version,
            number_of_images,
            mp_entry,
            image_uid_list,
            total_frames,
            next_ifd_offset,
            entries,
            unique_ids,
        })
    }

    /// Number of images declared by the directory.
    #[inline]
    pub fn image_count(&self) -> usize {
        self.entries.len()
    }

    /// MP Format version string, typically "0100".
    pub fn version_text(&self) -> Option<String> {
        self.version.as_text()
    }

    /// Total number of captured frames, when declared.
    pub fn total_frames(&self) -> Option<u32> {
        self.total_frames.as_ref().and_then(DirectoryEntry::as_u32)
    }
}

/// Read `count` consecutive 33-byte identifiers starting at `start`.
fn read_unique_ids(
    view: &ByteView<'_>,
    start: usize,
    count: usize,
) -> Result<Vec<UniqueId>, MpoError> {
    (0..count)
        .map(|i| {
            let offset = start + UNIQUE_ID_SIZE * i;
            Ok(UniqueId {
                bytes: view.read_exact_at(offset, UNIQUE_ID_SIZE)?,
                offset,
            })
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
