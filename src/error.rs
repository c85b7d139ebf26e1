use thiserror::Error;

/// Errors that can occur while decoding an MPO container.
///
/// Every variant is terminal for the structured decode path. Callers that
/// want a best-effort result fall back to the brute-force scanner instead of
/// retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MpoError {
    /// No APP2 segment carrying the `MPF\0` signature was found
    #[error("Not an MPF container: no APP2 segment with MPF signature found")]
    NotAContainer,

    /// An embedded image does not carry its own MPF segment
    #[error("Image {image} has no MPF segment after its start-of-image at offset {offset}")]
    MissingSegment { image: usize, offset: usize },

    /// MPF header magic is neither `II*\0` nor `MM\0*`
    #[error("Invalid MPF endian magic: {0:02X?}")]
    BadEndianMagic([u8; 4]),

    /// Index directory declares an entry count other than 3 or more
    #[error("Unexpected MP Index directory shape: {0} entries (expected 3 or more)")]
    UnexpectedDirectoryShape(u16),

    /// A fixed-position index field carries the wrong tag
    #[error("Tag mismatch for {field}: expected {expected}, got {actual}")]
    TagMismatch {
        field: &'static str,
        expected: u16,
        actual: u16,
    },

    /// An individual attributes directory contains a tag outside the known table
    #[error("Unknown MP attribute tag: {0}")]
    UnknownAttributeTag(u16),

    /// Directory entry uses a field type code with no known size
    #[error("Unknown field type: {0}")]
    UnknownFieldType(u16),

    /// A computed offset/length points outside the buffer
    #[error("Read out of range: requested {requested} bytes at offset {offset}, size is {size}")]
    OutOfRangeRead {
        offset: u64,
        requested: u64,
        size: u64,
    },

    /// Buffer is too small to hold even the fixed-size structure being read
    #[error("Buffer truncated: need at least {required} bytes, got {actual}")]
    TruncatedBuffer { required: usize, actual: usize },

    /// NumberOfImages is zero
    #[error("Invalid number of images: {0}")]
    InvalidImageCount(u32),

    /// A decode limit was exceeded
    #[error("Limit exceeded for {what}: limit is {limit}, got {actual}")]
    LimitExceeded {
        what: &'static str,
        limit: u64,
        actual: u64,
    },

    /// The brute-force scanner was given an empty buffer
    #[error("Empty input buffer")]
    EmptyBuffer,
}

/// Errors raised while turning decoded ranges into standalone JPEG files.
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    /// Container decoding failed
    #[error("Decode error: {0}")]
    Decode(#[from] MpoError),

    /// Reading the input or writing an output failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Embedded image could not be decoded by the image codec
    #[error("Failed to decode embedded image: {message}")]
    ImageDecode { message: String },

    /// Re-encoding to JPEG failed
    #[error("Failed to encode JPEG: {message}")]
    ImageEncode { message: String },
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}
