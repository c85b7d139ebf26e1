//! Whole-container decoding.
//!
//! Ties the scanner, header, index and attributes decoders together:
//!
//! 1. find the primary MPF segment and decode its header
//! 2. decode the index directory (image count, MP entry table, unique IDs)
//! 3. compute every image's byte range from the entry table
//! 4. decode the first image's attributes from the index `next_ifd_offset`
//! 5. for every later image, find its own MPF segment inside its range and
//!    decode that segment's attributes directory
//!
//! Any inconsistency aborts the decode with a typed error.

use serde::Serialize;
use tracing::debug;

use crate::error::MpoError;
use crate::io::ByteView;

use super::attributes::IndividualAttributes;
use super::header::MpfHeader;
use super::index::{IndexDirectory, MpEntry};
use super::ranges::{extract_ranges, image_start_offsets, ImageRange};
use super::scanner::{find_mpf_segment, find_primary_segment};

// =============================================================================
// Limits
// =============================================================================

/// Upper bounds on the work a single decode may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecodeLimits {
    /// Maximum accepted NumberOfImages
    pub max_images: u32,

    /// Maximum entry count of an attributes directory
    pub max_directory_entries: u16,

    /// Maximum APP2 markers examined per segment search
    pub max_scan_candidates: usize,
}

impl DecodeLimits {
    pub const DEFAULT_MAX_IMAGES: u32 = 64;
    pub const DEFAULT_MAX_DIRECTORY_ENTRIES: u16 = 64;
    pub const DEFAULT_MAX_SCAN_CANDIDATES: usize = 4096;
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_images: Self::DEFAULT_MAX_IMAGES,
            max_directory_entries: Self::DEFAULT_MAX_DIRECTORY_ENTRIES,
            max_scan_candidates: Self::DEFAULT_MAX_SCAN_CANDIDATES,
        }
    }
}

// =============================================================================
// ContainerView
// =============================================================================

/// Decoded metadata of one embedded image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRecord {
    /// Header of the image's own MPF segment
    pub header: MpfHeader,

    /// Index directory; present for the first image only
    pub index: Option<IndexDirectory>,

    /// Individual attributes directory.
    ///
    /// `None` only for the first image when the index directory's next
    /// offset is 0.
    pub attributes: Option<IndividualAttributes>,
}

/// Fully decoded MPO container.
///
/// `images`, `segment_offsets`, `image_offsets` and `ranges` all have one
/// element per embedded image, in file order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerView {
    pub images: Vec<ImageRecord>,

    /// File offset of each image's APP2 marker
    pub segment_offsets: Vec<usize>,

    /// File offset of each image's SOI marker
    pub image_offsets: Vec<usize>,

    /// Byte range of each image
    pub ranges: Vec<ImageRange>,
}

impl ContainerView {
    /// Index directory of the primary segment.
    pub fn index(&self) -> Option<&IndexDirectory> {
        self.images.first().and_then(|image| image.index.as_ref())
    }

    /// The MP entry table.
    pub fn entries(&self) -> &[MpEntry] {
        self.index()
            .map(|index| index.entries.as_slice())
            .unwrap_or(&[])
    }

    #[inline]
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Byte ranges of the embedded images.
    pub fn ranges(&self) -> &[ImageRange] {
        &self.ranges
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode an MPO container with the default limits.
pub fn decode_container(data: &[u8]) -> Result<ContainerView, MpoError> {
    decode_container_with_limits(data, DecodeLimits::default())
}

/// Decode an MPO container.
///
/// # Errors
/// Returns the first inconsistency found; no partial view is produced.
pub fn decode_container_with_limits(
    data: &[u8],
    limits: DecodeLimits,
) -> Result<ContainerView, MpoError> {
    let view = ByteView::new(data);

    let primary = find_primary_segment(&view, limits.max_scan_candidates)?;
    let origin = primary.origin();
    let header = MpfHeader::parse(&view, origin)?;
    debug!(
        marker = primary.marker_offset,
        origin,
        byte_order = ?header.byte_order,
        "primary MPF segment"
    );

    let index = IndexDirectory::parse(
        &view,
        origin + header.first_ifd_offset as usize,
        origin,
        header.byte_order,
        limits.max_images,
    )?;
    debug!(
        images = index.image_count(),
        entry_count = index.entry_count,
        unique_ids = index.unique_ids.is_some(),
        "MP index directory"
    );

    let ranges = extract_ranges(&index.entries, origin, data.len())?;
    let image_offsets = image_start_offsets(&index.entries, origin);

    let primary_attributes = match index.next_ifd_offset {
        0 => None,
        next => Some(IndividualAttributes::parse(
            &view,
            origin + next as usize,
            origin,
            header.byte_order,
            limits.max_directory_entries,
        )?),
    };

    let mut images = Vec::with_capacity(ranges.len());
    let mut segment_offsets = Vec::with_capacity(ranges.len());

    segment_offsets.push(primary.marker_offset);
    images.push(ImageRecord {
        header,
        index: None,
        attributes: primary_attributes,
    });

    for (i, range) in ranges.iter().enumerate().skip(1) {
        let segment =
            find_mpf_segment(&view, range.start, range.end(), limits.max_scan_candidates)?
                .ok_or(MpoError::MissingSegment {
                    image: i,
                    offset: range.start,
                })?;
        let image_origin = segment.origin();
        let image_header = MpfHeader::parse(&view, image_origin)?;
        let attributes = IndividualAttributes::parse(
            &view,
            image_origin + image_header.first_ifd_offset as usize,
            image_origin,
            image_header.byte_order,
            limits.max_directory_entries,
        )?;
        debug!(
            image = i,
            marker = segment.marker_offset,
            attributes = attributes.entry_count,
            "individual image segment"
        );

        segment_offsets.push(segment.marker_offset);
        images.push(ImageRecord {
            header: image_header,
            index: None,
            attributes: Some(attributes),
        });
    }

    if let Some(first) = images.first_mut() {
        first.index = Some(index);
    }

    Ok(ContainerView {
        images,
        segment_offsets,
        image_offsets,
        ranges,
    })
}

/// Decode a container and return only the image byte ranges.
pub fn extract_image_ranges(
    data: &[u8],
    limits: DecodeLimits,
) -> Result<Vec<ImageRange>, MpoError> {
    decode_container_with_limits(data, limits).map(|container| container.ranges)
}

// =============================================================================
// Tests
// =============================================================================
