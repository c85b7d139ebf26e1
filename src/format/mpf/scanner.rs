//! MPF segment search.
//!
//! An MPF segment is an APP2 marker whose payload starts with `MPF\0`:
//!
//! ```text
//! +0  FF E2       APP2 marker
//! +2  length      (u16, big-endian, not used for the search)
//! +4  "MPF\0"     signature
//! +8  MPF header  (segment origin)
//! ```

use serde::Serialize;
use tracing::trace;

use crate::error::MpoError;
use crate::format::jpeg::APP2;
use crate::io::ByteView;

/// MPF signature following the APP2 length field.
pub const MPF_SIGNATURE: &[u8; 4] = b"MPF\0";

/// Bytes between the APP2 marker and the segment origin
/// (2 marker + 2 length + 4 signature).
pub const SEGMENT_PREFIX_SIZE: usize = 8;

/// Location of an MPF segment in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MpfSegment {
    /// File offset of the `FF E2` marker
    pub marker_offset: usize,
}

impl MpfSegment {
    /// File offset of the MPF header; every offset in the segment is relative to it.
    #[inline]
    pub const fn origin(&self) -> usize {
        self.marker_offset + SEGMENT_PREFIX_SIZE
    }
}

/// Find the first MPF segment whose marker lies in `[start, end)`.
///
/// Candidates with the wrong signature are skipped one byte at a time so an
/// adjacent real marker is never jumped over. At most `max_candidates` APP2
/// markers are examined.
///
/// Returns `Ok(None)` if no segment is found.
pub fn find_mpf_segment(
    view: &ByteView<'_>,
    start: usize,
    end: usize,
    max_candidates: usize,
) -> Result<Option<MpfSegment>, MpoError> {
    let mut pos = start;
    let mut examined = 0usize;

    while let Some(candidate) = view.find(&APP2, pos, end) {
        examined += 1;
        if examined > max_candidates {
            return Err(MpoError::LimitExceeded {
                what: "APP2 candidates",
                limit: max_candidates as u64,
                actual: examined as u64,
            });
        }

        if view.matches_at(candidate + 4, MPF_SIGNATURE) {
            trace!(offset = candidate, "MPF segment found");
            return Ok(Some(MpfSegment {
                marker_offset: candidate,
            }));
        }

        trace!(offset = candidate, "APP2 without MPF signature");
        pos = candidate + 1;
    }

    Ok(None)
}

/// Find the primary MPF segment, searching the whole buffer.
///
/// # Errors
/// `NotAContainer` if the buffer has no MPF segment.
pub fn find_primary_segment(
    view: &ByteView<'_>,
    max_candidates: usize,
) -> Result<MpfSegment, MpoError> {
    find_mpf_segment(view, 0, view.len(), max_candidates)?.ok_or(MpoError::NotAContainer)
}

// =============================================================================
// Tests
// =============================================================================
