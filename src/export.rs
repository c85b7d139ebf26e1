//! Turning decoded image ranges into standalone JPEG files.
//!
//! The decoder only yields byte ranges. This module cuts them out of the
//! source buffer and optionally round-trips each image through the `image`
//! codec to re-encode it at a chosen quality.

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::ImageReader;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::error::{ExportError, MpoError};
use crate::format::ImageRange;

/// Default JPEG quality (1-100) for re-encoding.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Minimum allowed JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum allowed JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

/// Clamp quality to the valid range.
#[inline]
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
}

#[inline]
pub fn is_valid_quality(quality: u8) -> bool {
    (MIN_JPEG_QUALITY..=MAX_JPEG_QUALITY).contains(&quality)
}

// =============================================================================
// JpegExporter
// =============================================================================

/// What happens to each embedded image on export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// Copy the bytes unchanged
    #[default]
    Passthrough,

    /// Decode and re-encode as baseline JPEG
    Reencode { quality: u8 },
}

/// Exports embedded images from an MPO buffer.
#[derive(Debug, Clone, Default)]
pub struct JpegExporter {
    mode: ExportMode,
}

impl JpegExporter {
    pub fn new(mode: ExportMode) -> Self {
        let mode = match mode {
            ExportMode::Reencode { quality } => ExportMode::Reencode {
                quality: clamp_quality(quality),
            },
            passthrough => passthrough,
        };
        Self { mode }
    }

    pub fn mode(&self) -> ExportMode {
        self.mode
    }

    /// Export the image covering `range` of `data`.
    ///
    /// # Errors
    /// `Decode(OutOfRangeRead)` if the range does not fit in `data`, or a
    /// codec error in re-encode mode.
    pub fn export(&self, data: &[u8], range: ImageRange) -> Result<Bytes, ExportError> {
        let source = range.slice(data).ok_or(MpoError::OutOfRangeRead {
            offset: range.start as u64,
            requested: range.length as u64,
            size: data.len() as u64,
        })?;

        match self.mode {
            ExportMode::Passthrough => Ok(Bytes::copy_from_slice(source)),
            ExportMode::Reencode { quality } => reencode(source, quality),
        }
    }

    /// Export every range, stopping at the first failure.
    pub fn export_all(
        &self,
        data: &[u8],
        ranges: &[ImageRange],
    ) -> Result<Vec<Bytes>, ExportError> {
        ranges.iter().map(|&range| self.export(data, range)).collect()
    }

    /// Pixel dimensions of an embedded image, read from its frame header.
    ///
    /// # Returns
    ///
    /// `(width, height)` in pixels.
    pub fn dimensions(&self, source: &[u8]) -> Result<(u32, u32), ExportError> {
        let reader = ImageReader::with_format(Cursor::new(source), image::ImageFormat::Jpeg);
        reader
            .into_dimensions()
            .map_err(|e| ExportError::ImageDecode {
                message: e.to_string(),
            })
    }
}

fn reencode(source: &[u8], quality: u8) -> Result<Bytes, ExportError> {
    let reader = ImageReader::with_format(Cursor::new(source), image::ImageFormat::Jpeg);
    let img = reader.decode().map_err(|e| ExportError::ImageDecode {
        message: e.to_string(),
    })?;

    let mut output = Vec::new();
    JpegEncoder::new_with_quality(&mut output, quality)
        .encode_image(&img)
        .map_err(|e| ExportError::ImageEncode {
            message: e.to_string(),
        })?;

    Ok(Bytes::from(output))
}

/// Output file for image `index` of `input`: `<dir>/<stem>_<index>.jpg`.
///
/// `dir` defaults to the input's own directory.
pub fn output_path(input: &Path, out_dir: Option<&Path>, index: usize) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    dir.join(format!("{stem}_{index}.jpg"))
}

// =============================================================================
// Tests
// =============================================================================
