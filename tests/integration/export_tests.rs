//! Export integration tests.
//!
//! Tests verify:
//! - Passthrough export reproduces each embedded JPEG byte for byte
//! - Re-encoded images decode with the original dimensions
//! - Output files land where `output_path` says

use std::path::PathBuf;

use mpo_extract::{decode_container, output_path, ExportMode, JpegExporter};

use super::test_utils::{create_stereo_mpo, is_valid_jpeg, ByteOrderType};

#[test]
fn test_passthrough_export() {
    let mpo = create_stereo_mpo(ByteOrderType::LittleEndian);
    let container = decode_container(&mpo.data).unwrap();

    let images = JpegExporter::default()
        .export_all(&mpo.data, container.ranges())
        .unwrap();

    assert_eq!(images.len(), 2);
    for (i, image) in images.iter().enumerate() {
        assert_eq!(image.as_ref(), mpo.image(i));
        assert!(is_valid_jpeg(image));
    }
}

#[test]
fn test_reencode_export() {
    let mpo = create_stereo_mpo(ByteOrderType::BigEndian);
    let container = decode_container(&mpo.data).unwrap();
    let exporter = JpegExporter::new(ExportMode::Reencode { quality: 60 });

    let images = exporter.export_all(&mpo.data, container.ranges()).unwrap();

    assert_eq!(exporter.dimensions(&images[0]).unwrap(), (32, 24));
    assert_eq!(exporter.dimensions(&images[1]).unwrap(), (16, 16));
    assert!(images.iter().all(|image| is_valid_jpeg(image)));
}

#[test]
fn test_dimensions_of_embedded_images() {
    let mpo = create_stereo_mpo(ByteOrderType::LittleEndian);
    let exporter = JpegExporter::default();

    assert_eq!(exporter.dimensions(mpo.image(0)).unwrap(), (32, 24));
    assert_eq!(exporter.dimensions(mpo.image(1)).unwrap(), (16, 16));
}

#[tokio::test]
async fn test_write_outputs() {
    let mpo = create_stereo_mpo(ByteOrderType::LittleEndian);
    let container = decode_container(&mpo.data).unwrap();
    let images = JpegExporter::default()
        .export_all(&mpo.data, container.ranges())
        .unwrap();

    let dir = std::env::temp_dir().join(format!("mpo-extract-test-{}", std::process::id()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let input = PathBuf::from("/photos/DSCF0042.MPO");

    for (i, image) in images.iter().enumerate() {
        let out = output_path(&input, Some(dir.as_path()), i);
        tokio::fs::write(&out, image).await.unwrap();
    }

    let first = tokio::fs::read(dir.join("DSCF0042_0.jpg")).await.unwrap();
    let second = tokio::fs::read(dir.join("DSCF0042_1.jpg")).await.unwrap();
    assert_eq!(first, mpo.image(0));
    assert_eq!(second, mpo.image(1));

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}
