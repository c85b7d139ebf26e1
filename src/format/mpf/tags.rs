//! MPF tag and field type definitions.
//!
//! MP Format directories reuse the TIFF entry layout, so field types follow
//! the TIFF 6.0 numbering. Tags live in the 0xB000 block reserved by
//! CIPA DC-007 for MP Index and MP Individual Attribute directories.

use serde::Serialize;

// =============================================================================
// Field Types
// =============================================================================

/// Field types that determine how directory entry values are encoded.
///
/// The size of a type decides whether `size * count` fits in the 4-byte
/// value field of an entry or lives out-of-line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer
    Byte = 1,

    /// 8-bit ASCII character
    Ascii = 2,

    /// Unsigned 16-bit integer
    Short = 3,

    /// Unsigned 32-bit integer
    Long = 4,

    /// Two Longs: numerator, denominator
    Rational = 5,

    /// Signed 8-bit integer
    SByte = 6,

    /// Opaque byte
    Undefined = 7,

    /// Signed 16-bit integer
    SShort = 8,

    /// Signed 32-bit integer
    SLong = 9,

    /// Two SLongs: numerator, denominator
    SRational = 10,

    /// IEEE single precision float
    Float = 11,

    /// IEEE double precision float
    DFloat = 12,
}

impl FieldType {
    /// Size of a single value of this type in bytes.
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            FieldType::Byte | FieldType::SByte | FieldType::Ascii | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float => 4,
            FieldType::Rational | FieldType::SRational | FieldType::DFloat => 8,
        }
    }

    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for unknown type codes.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            5 => Some(FieldType::Rational),
            6 => Some(FieldType::SByte),
            7 => Some(FieldType::Undefined),
            8 => Some(FieldType::SShort),
            9 => Some(FieldType::SLong),
            10 => Some(FieldType::SRational),
            11 => Some(FieldType::Float),
            12 => Some(FieldType::DFloat),
            _ => None,
        }
    }

    /// Size of the value field in a directory entry. Values up to this many
    /// bytes are stored inline.
    pub const INLINE_THRESHOLD: usize = 4;

    /// Check if `count` values of this type fit inline.
    #[inline]
    pub fn fits_inline(self, count: u32) -> bool {
        self.size_in_bytes() as u64 * count as u64 <= Self::INLINE_THRESHOLD as u64
    }
}

// =============================================================================
// MP Index Tags
// =============================================================================

/// Tags of the MP Index directory, in the fixed order they must appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum IndexTag {
    /// MP Format version, 4 ASCII-ish bytes ("0100")
    MpfVersion = 45056,

    /// Number of images in the file
    NumberOfImages = 45057,

    /// Table of 16-byte MP entries
    MpEntry = 45058,

    /// Table of 33-byte unique image IDs
    ImageUidList = 45059,

    /// Total number of captured frames
    TotalFrames = 45060,
}

impl IndexTag {
    /// Get the numeric tag ID.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Field name used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            IndexTag::MpfVersion => "MPFVersion",
            IndexTag::NumberOfImages => "NumberOfImages",
            IndexTag::MpEntry => "MPEntry",
            IndexTag::ImageUidList => "ImageUIDList",
            IndexTag::TotalFrames => "TotalFrames",
        }
    }
}

// =============================================================================
// MP Individual Attribute Tags
// =============================================================================

/// Closed table of tags allowed in an MP Individual Attributes directory.
///
/// Any tag outside this table makes the directory invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u16)]
pub enum AttributeTag {
    MpfVersion = 45056,
    IndividualNumber = 45313,
    PanOrientation = 45569,
    PanOverlapHorizontal = 45570,
    PanOverlapVertical = 45571,
    BaseViewpointNumber = 45572,
    ConvergenceAngle = 45573,
    BaselineLength = 45574,
    VerticalDivergence = 45575,
    AxisDistanceX = 45576,
    AxisDistanceY = 45577,
    AxisDistanceZ = 45578,
    YawAngle = 45579,
    PitchAngle = 45580,
    RollAngle = 45581,
}

impl AttributeTag {
    /// Create an AttributeTag from its numeric value.
    ///
    /// Returns `None` for tags outside the closed table.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            45056 => Some(AttributeTag::MpfVersion),
            45313 => Some(AttributeTag::IndividualNumber),
            45569 => Some(AttributeTag::PanOrientation),
            45570 => Some(AttributeTag::PanOverlapHorizontal),
            45571 => Some(AttributeTag::PanOverlapVertical),
            45572 => Some(AttributeTag::BaseViewpointNumber),
            45573 => Some(AttributeTag::ConvergenceAngle),
            45574 => Some(AttributeTag::BaselineLength),
            45575 => Some(AttributeTag::VerticalDivergence),
            45576 => Some(AttributeTag::AxisDistanceX),
            45577 => Some(AttributeTag::AxisDistanceY),
            45578 => Some(AttributeTag::AxisDistanceZ),
            45579 => Some(AttributeTag::YawAngle),
            45580 => Some(AttributeTag::PitchAngle),
            45581 => Some(AttributeTag::RollAngle),
            _ => None,
        }
    }

    /// Get the numeric tag ID.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

// =============================================================================
// Tests
// =============================================================================
