//! Brute-force scanner and strategy selection tests.
//!
//! Tests verify:
//! - The signature scan agrees with the MPF metadata on well-formed files
//! - Degenerate inputs (empty, no markers)
//! - `Auto` falls back to the scan when the metadata is broken

use mpo_extract::{
    extract_ranges_with_strategy, scan_jpeg_candidates, DecodeLimits, ExtractStrategy,
    ImageRange, MpoError,
};

use super::test_utils::{create_stereo_mpo, fake_jpeg, ByteOrderType, MpoBuilder, MpoFile};

fn three_fake_images() -> MpoFile {
    MpoBuilder::new(ByteOrderType::BigEndian)
        .add_image(fake_jpeg(50))
        .add_image(fake_jpeg(75))
        .add_image(fake_jpeg(25))
        .build()
}

fn expected_ranges(mpo: &MpoFile) -> Vec<ImageRange> {
    mpo.starts
        .iter()
        .zip(&mpo.sizes)
        .map(|(&start, &size)| ImageRange::new(start, size))
        .collect()
}

// =============================================================================
// Brute-Force Scanner
// =============================================================================

#[test]
fn test_scan_matches_metadata() {
    let mpo = three_fake_images();
    assert_eq!(scan_jpeg_candidates(&mpo.data).unwrap(), expected_ranges(&mpo));
}

#[test]
fn test_scan_real_stereo_pair() {
    let mpo = create_stereo_mpo(ByteOrderType::LittleEndian);
    let ranges = scan_jpeg_candidates(&mpo.data).unwrap();

    let starts: Vec<_> = ranges.iter().map(|r| r.start).collect();
    assert_eq!(starts, mpo.starts);
    assert_eq!(ranges.last().unwrap().end(), mpo.data.len());
}

#[test]
fn test_scan_no_markers() {
    let data = vec![0x11u8; 1024];
    assert!(scan_jpeg_candidates(&data).unwrap().is_empty());
}

#[test]
fn test_scan_empty() {
    assert_eq!(scan_jpeg_candidates(&[]), Err(MpoError::EmptyBuffer));
}

#[test]
fn test_scan_absorbs_trailing_bytes() {
    let mut mpo = three_fake_images();
    mpo.data.extend_from_slice(&[0u8; 16]);

    let ranges = scan_jpeg_candidates(&mpo.data).unwrap();
    assert_eq!(ranges.len(), 3);
    assert_eq!(ranges[2].length, mpo.sizes[2] + 16);
}

// =============================================================================
// Strategy Selection
// =============================================================================

#[test]
fn test_auto_prefers_metadata() {
    let mut mpo = three_fake_images();
    // Trailing image signature the metadata does not know about
    mpo.data.extend(fake_jpeg(4));

    let ranges =
        extract_ranges_with_strategy(&mpo.data, ExtractStrategy::Auto, DecodeLimits::default())
            .unwrap();
    assert_eq!(ranges, expected_ranges(&mpo));
}

#[test]
fn test_auto_falls_back_on_broken_metadata() {
    let mut mpo = three_fake_images();
    let origin = mpo.origin;
    mpo.data[origin] = b'X';

    assert!(matches!(
        extract_ranges_with_strategy(&mpo.data, ExtractStrategy::Structured, DecodeLimits::default()),
        Err(MpoError::BadEndianMagic(_))
    ));

    let ranges =
        extract_ranges_with_strategy(&mpo.data, ExtractStrategy::Auto, DecodeLimits::default())
            .unwrap();
    assert_eq!(ranges, expected_ranges(&mpo));
}

#[test]
fn test_brute_force_ignores_metadata() {
    let mut mpo = three_fake_images();
    mpo.data.extend(fake_jpeg(4));

    let ranges = extract_ranges_with_strategy(
        &mpo.data,
        ExtractStrategy::BruteForce,
        DecodeLimits::default(),
    )
    .unwrap();
    assert_eq!(ranges.len(), 4);
}

#[test]
fn test_auto_on_plain_bytes() {
    let data = vec![0x42u8; 64];
    let ranges =
        extract_ranges_with_strategy(&data, ExtractStrategy::Auto, DecodeLimits::default())
            .unwrap();
    assert!(ranges.is_empty());
}
