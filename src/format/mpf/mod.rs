//! MP Format (CIPA DC-007) container decoder.
//!
//! An MPO file is a JPEG whose APP2 segment carries a TIFF-like structure
//! describing further JPEG images appended to the file.
//!
//! # Key Concepts
//!
//! - **Segment origin**: the MPF header begins 8 bytes after the APP2 marker.
//!   Every offset stored inside the segment is relative to it.
//!
//! - **Byte order**: each segment declares its own endianness (II or MM) in
//!   its header, exactly like a TIFF file.
//!
//! - **Index directory**: only in the first image's segment. Its fields sit at
//!   fixed positions and lead to the MP entry table (size and offset of every
//!   image) and the optional unique-ID table.
//!
//! - **Individual attributes directory**: one per image, tag-dispatched, with
//!   stereo/panorama metadata such as convergence angle and baseline length.

mod attributes;
mod container;
mod entry;
mod header;
mod index;
mod ranges;
mod scanner;
mod tags;

pub use attributes::IndividualAttributes;
pub use container::{
    decode_container, decode_container_with_limits, extract_image_ranges, ContainerView,
    DecodeLimits, ImageRecord,
};
pub use entry::{DirectoryEntry, ENTRY_COUNT_SIZE, ENTRY_SIZE};
pub use header::{ByteOrder, MpfHeader, MPF_HEADER_SIZE};
pub use index::{
    ImageDataFormat, IndexDirectory, MpEntry, MpType, UniqueId, MP_ENTRY_SIZE, UNIQUE_ID_SIZE,
};
pub use ranges::{extract_ranges, image_start_offsets, ImageRange};
pub use scanner::{find_mpf_segment, find_primary_segment, MpfSegment, MPF_SIGNATURE};
pub use tags::{AttributeTag, FieldType, IndexTag};
