//! Format parsers for MPO files.
//!
//! Two ways of finding the embedded images are provided:
//!
//! - **Structured**: decode the MPF metadata ([`mpf::decode_container`]) and
//!   take the byte ranges from the MP entry table.
//! - **Brute force**: ignore the metadata and cut the file at every JPEG start
//!   signature ([`jpeg::scan_jpeg_candidates`]).
//!
//! [`extract_ranges_with_strategy`] selects between them; `Auto` tries the
//! structured path first and falls back when it fails.

pub mod jpeg;
pub mod mpf;

use serde::Serialize;
use tracing::warn;

use crate::error::MpoError;

pub use jpeg::scan_jpeg_candidates;
pub use mpf::{decode_container, ContainerView, DecodeLimits, ImageRange};

/// How embedded images are located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ExtractStrategy {
    /// MPF metadata only; any decode error is returned
    Structured,

    /// JPEG start signatures only
    BruteForce,

    /// MPF metadata, falling back to signatures on error
    #[default]
    Auto,
}

/// Locate the embedded images of `data` using `strategy`.
///
/// With `Auto`, a structured decode failure is logged and the brute-force
/// result is returned instead. The structured error is lost in that case.
pub fn extract_ranges_with_strategy(
    data: &[u8],
    strategy: ExtractStrategy,
    limits: DecodeLimits,
) -> Result<Vec<ImageRange>, MpoError> {
    match strategy {
        ExtractStrategy::Structured => mpf::extract_image_ranges(data, limits),
        ExtractStrategy::BruteForce => scan_jpeg_candidates(data),
        ExtractStrategy::Auto => match mpf::extract_image_ranges(data, limits) {
            Ok(ranges) => Ok(ranges),
            Err(e) => {
                warn!(error = %e, "MPF decode failed, falling back to signature scan");
                scan_jpeg_candidates(data)
            }
        },
    }
}
