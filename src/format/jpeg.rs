//! JPEG marker constants and the brute-force image scanner.
//!
//! The brute-force scanner ignores MPF metadata entirely. It looks for the
//! start of a JPEG stream followed by an APP0 (JFIF) or APP1 (Exif) marker,
//! which is how camera-written MPO images begin, and cuts the buffer at
//! every such position.
//!
//! Exif thumbnails (`FF D8 FF DB`) do not match, so they are not split out.

use tracing::trace;

use crate::error::MpoError;
use crate::io::ByteView;

use super::mpf::ImageRange;

// =============================================================================
// JPEG Markers
// =============================================================================

/// Start Of Image marker
pub const SOI: [u8; 2] = [0xFF, 0xD8];

/// End Of Image marker
pub const EOI: [u8; 2] = [0xFF, 0xD9];

/// Application segment 0 (JFIF) marker
pub const APP0: [u8; 2] = [0xFF, 0xE0];

/// Application segment 1 (Exif) marker
pub const APP1: [u8; 2] = [0xFF, 0xE1];

/// Application segment 2 (ICC profile, MPF) marker
pub const APP2: [u8; 2] = [0xFF, 0xE2];

/// Byte sequences that start a candidate image: SOI + APP1, SOI + APP0.
pub const IMAGE_START_SIGNATURES: [[u8; 4]; 2] = [
    [SOI[0], SOI[1], APP1[0], APP1[1]],
    [SOI[0], SOI[1], APP0[0], APP0[1]],
];

/// Check whether data starts with the SOI marker.
#[inline]
pub fn starts_with_soi(data: &[u8]) -> bool {
    data.len() >= 2 && data[0..2] == SOI
}

// =============================================================================
// Brute-Force Scanner
// =============================================================================

/// Locate plausible JPEG images by signature alone.
///
/// Every position where one of [`IMAGE_START_SIGNATURES`] occurs starts a
/// candidate that runs to the next candidate or the end of the buffer.
///
/// # Errors
/// `EmptyBuffer` if `data` is empty. Any non-empty input succeeds, possibly
/// with zero candidates.
pub fn scan_jpeg_candidates(data: &[u8]) -> Result<Vec<ImageRange>, MpoError> {
    if data.is_empty() {
        return Err(MpoError::EmptyBuffer);
    }

    let view = ByteView::new(data);
    let mut starts = Vec::new();
    let mut pos = 0;

    while let Some(start) = view.find(&SOI, pos, data.len()) {
        if IMAGE_START_SIGNATURES
            .iter()
            .any(|signature| view.matches_at(start, signature))
        {
            trace!(offset = start, "JPEG start candidate");
            starts.push(start);
            pos = start + IMAGE_START_SIGNATURES[0].len();
        } else {
            pos = start + 1;
        }
    }

    let ranges = starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(data.len());
            ImageRange::new(start, end - start)
        })
        .collect();

    Ok(ranges)
}

// =============================================================================
// Tests
// =============================================================================
