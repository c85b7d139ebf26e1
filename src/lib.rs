//! # mpo-extract
//!
//! Decoder for Multi Picture Object (MPO) files, the JPEG-based container
//! written by stereo and multi-view cameras.
//!
//! An MPO file is a JPEG image with further JPEG images appended to it. The
//! first image's APP2 segment carries MP Format (MPF) metadata: a small
//! TIFF-like structure listing the size and position of every image, plus
//! per-image attributes such as convergence angle and baseline length.
//!
//! ## Features
//!
//! - **Structured decoding**: Full MPF parsing, both byte orders, with typed errors
//! - **Brute-force fallback**: Signature scan for files with broken metadata
//! - **Bounded work**: Configurable limits on image counts and segment searches
//! - **Export**: Byte-exact copies or re-encoded JPEGs via the `image` crate
//!
//! ## Architecture
//!
//! - [`io`] - Bounds-checked byte view and endian helpers
//! - [`mod@format`] - MPF container decoder and JPEG signature scanner
//! - [`export`] - Turning ranges into standalone JPEG files
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use mpo_extract::{decode_container, JpegExporter};
//!
//! let data = std::fs::read("DSCF0001.MPO").unwrap();
//! let container = decode_container(&data).unwrap();
//!
//! let exporter = JpegExporter::default();
//! for range in container.ranges() {
//!     let jpeg = exporter.export(&data, *range).unwrap();
//!     println!("{} bytes at offset {}", jpeg.len(), range.start);
//! }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod io;

// Re-export commonly used types
pub use config::{Cli, Command, ExtractConfig, InspectConfig, InspectFormat, ScanConfig};
pub use error::{ExportError, MpoError};
pub use export::{
    clamp_quality, is_valid_quality, output_path, ExportMode, JpegExporter, DEFAULT_JPEG_QUALITY,
    MAX_JPEG_QUALITY, MIN_JPEG_QUALITY,
};
pub use format::jpeg::scan_jpeg_candidates;
pub use format::mpf::{
    decode_container, decode_container_with_limits, extract_image_ranges, extract_ranges,
    AttributeTag, ByteOrder, ContainerView, DecodeLimits, DirectoryEntry, FieldType, ImageRange,
    ImageRecord, IndexDirectory, IndexTag, IndividualAttributes, MpEntry, MpType, MpfHeader,
    UniqueId,
};
pub use format::{extract_ranges_with_strategy, ExtractStrategy};
pub use io::ByteView;
