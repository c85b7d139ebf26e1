//! Test utilities for integration tests.
//!
//! This module provides a builder for synthetic MPO files: real or fake JPEG
//! images stitched together with MPF segments written in either byte order.

use image::codecs::jpeg::JpegEncoder;
use image::{GrayImage, Luma, Rgb, RgbImage};

// =============================================================================
// JPEG Helpers
// =============================================================================

/// Create a test grayscale JPEG image.
pub fn create_test_jpeg(width: u32, height: u32, quality: u8) -> Vec<u8> {
    let img = GrayImage::from_fn(width, height, |x, y| {
        let val = ((x + y) % 256) as u8;
        Luma([val])
    });

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode_image(&img).unwrap();
    buf
}

/// Create a test RGB JPEG image.
pub fn create_test_rgb_jpeg(width: u32, height: u32, quality: u8) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let r = (x % 256) as u8;
        let g = (y % 256) as u8;
        let b = ((x + y) % 256) as u8;
        Rgb([r, g, b])
    });

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode_image(&img).unwrap();
    buf
}

/// A byte stream that only looks like a JPEG: SOI, an empty APP0, `filler`
/// bytes that never contain 0xFF, and EOI. Not decodable.
pub fn fake_jpeg(filler: usize) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x02];
    data.extend((0..filler).map(|i| (i % 200) as u8));
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

/// Check if data is a decodable JPEG.
pub fn is_valid_jpeg(data: &[u8]) -> bool {
    if data.len() < 4 {
        return false;
    }

    if data[0] != 0xFF || data[1] != 0xD8 {
        return false;
    }

    if data[data.len() - 2] != 0xFF || data[data.len() - 1] != 0xD9 {
        return false;
    }

    image::load_from_memory_with_format(data, image::ImageFormat::Jpeg).is_ok()
}

// =============================================================================
// MPO Builder
// =============================================================================

#[derive(Clone, Copy, Debug)]
pub enum ByteOrderType {
    LittleEndian,
    BigEndian,
}

impl ByteOrderType {
    fn magic(self) -> [u8; 4] {
        match self {
            ByteOrderType::LittleEndian => [b'I', b'I', 42, 0],
            ByteOrderType::BigEndian => [b'M', b'M', 0, 42],
        }
    }

    fn u16(self, value: u16) -> [u8; 2] {
        match self {
            ByteOrderType::LittleEndian => value.to_le_bytes(),
            ByteOrderType::BigEndian => value.to_be_bytes(),
        }
    }

    fn u32(self, value: u32) -> [u8; 4] {
        match self {
            ByteOrderType::LittleEndian => value.to_le_bytes(),
            ByteOrderType::BigEndian => value.to_be_bytes(),
        }
    }
}

/// One directory field. Values longer than 4 bytes are written out of line.
#[derive(Clone, Debug)]
pub struct Field {
    pub tag: u16,
    pub field_type: u16,
    pub count: u32,
    pub value: Vec<u8>,
}

impl Field {
    pub fn version() -> Self {
        Self {
            tag: 45056,
            field_type: 7,
            count: 4,
            value: b"0100".to_vec(),
        }
    }

    pub fn long(order: ByteOrderType, tag: u16, value: u32) -> Self {
        Self {
            tag,
            field_type: 4,
            count: 1,
            value: order.u32(value).to_vec(),
        }
    }

    pub fn rational(order: ByteOrderType, tag: u16, num: u32, den: u32) -> Self {
        let mut value = order.u32(num).to_vec();
        value.extend_from_slice(&order.u32(den));
        Self {
            tag,
            field_type: 5,
            count: 1,
            value,
        }
    }

    pub fn srational(order: ByteOrderType, tag: u16, num: i32, den: i32) -> Self {
        let mut value = order.u32(num as u32).to_vec();
        value.extend_from_slice(&order.u32(den as u32));
        Self {
            tag,
            field_type: 10,
            count: 1,
            value,
        }
    }
}

/// A built MPO file with the layout the decoder is expected to find.
pub struct MpoFile {
    pub data: Vec<u8>,

    /// File offset of each image's SOI
    pub starts: Vec<usize>,

    /// Size of each image in bytes
    pub sizes: Vec<usize>,

    /// File offset of the primary segment origin
    pub origin: usize,
}

impl MpoFile {
    pub fn image(&self, index: usize) -> &[u8] {
        &self.data[self.starts[index]..self.starts[index] + self.sizes[index]]
    }
}

/// Builder for synthetic MPO files.
///
/// Each image gets an APP2 MPF segment inserted after its leading APP0
/// segment (or directly after SOI if there is none). The first image's
/// segment also carries the index directory and its tables.
pub struct MpoBuilder {
    byte_order: ByteOrderType,
    images: Vec<Vec<u8>>,
    index_fields: u16,
    unique_ids: bool,
    attributes: bool,
    extra_primary_field: Option<Field>,
}

impl MpoBuilder {
    pub fn new(byte_order: ByteOrderType) -> Self {
        Self {
            byte_order,
            images: Vec::new(),
            index_fields: 3,
            unique_ids: false,
            attributes: true,
            extra_primary_field: None,
        }
    }

    pub fn add_image(mut self, jpeg: Vec<u8>) -> Self {
        self.images.push(jpeg);
        self
    }

    /// Write 5 index fields (with ImageUIDList and TotalFrames) instead of 3.
    pub fn with_unique_ids(mut self, enabled: bool) -> Self {
        self.unique_ids = enabled;
        self.index_fields = if enabled { 5 } else { 3 };
        self
    }

    /// Override the declared index entry count.
    pub fn with_index_fields(mut self, count: u16) -> Self {
        self.index_fields = count;
        self
    }

    /// When disabled, attribute directories are empty and the index's next
    /// offset is 0.
    pub fn with_attributes(mut self, enabled: bool) -> Self {
        self.attributes = enabled;
        self
    }

    /// Append an extra field to the first image's attributes directory.
    pub fn with_primary_field(mut self, field: Field) -> Self {
        self.extra_primary_field = Some(field);
        self
    }

    /// Expected unique ID text of image `index`.
    pub fn unique_id(index: usize) -> String {
        format!("{:032X}", 0xA000 + index)
    }

    pub fn build(self) -> MpoFile {
        assert!(!self.images.is_empty(), "MpoBuilder needs at least one image");
        let order = self.byte_order;
        let n = self.images.len();

        // Secondary images do not depend on anything else.
        let mut encoded: Vec<Vec<u8>> = Vec::with_capacity(n);
        encoded.push(Vec::new());
        for i in 1..n {
            let mut payload = order.magic().to_vec();
            payload.extend_from_slice(&order.u32(8));
            payload.extend(self.attribute_directory(i, 8));
            encoded.push(embed_segment(&self.images[i], &payload));
        }

        // The primary payload length is independent of the table values.
        let insert_at = segment_insert_position(&self.images[0]);
        let origin = insert_at + 8;
        let probe = self.primary_payload(&vec![0; n], &vec![0; n]);
        let size_0 = self.images[0].len() + 8 + probe.len();

        let mut sizes = vec![size_0];
        sizes.extend(encoded.iter().skip(1).map(Vec::len));
        let mut starts = Vec::with_capacity(n);
        let mut pos = 0usize;
        for size in &sizes {
            starts.push(pos);
            pos += size;
        }

        let offsets: Vec<u32> = starts
            .iter()
            .enumerate()
            .map(|(i, &start)| if i == 0 { 0 } else { (start - origin) as u32 })
            .collect();
        let sizes_u32: Vec<u32> = sizes.iter().map(|&s| s as u32).collect();
        encoded[0] = embed_segment(&self.images[0], &self.primary_payload(&sizes_u32, &offsets));

        MpoFile {
            data: encoded.concat(),
            starts,
            sizes,
            origin,
        }
    }

    fn primary_payload(&self, sizes: &[u32], offsets: &[u32]) -> Vec<u8> {
        let order = self.byte_order;
        let n = self.images.len() as u32;
        let full = self.index_fields > 3;
        let written_fields = if full { 5 } else { 3 };

        let index_len = 2 + 12 * written_fields + 4;
        let table_offset = 8 + index_len as u32;
        let uid_offset = table_offset + 16 * n;
        let attr_offset = uid_offset + if self.unique_ids { 33 * n } else { 0 };

        let mut out = order.magic().to_vec();
        out.extend_from_slice(&order.u32(8));

        out.extend_from_slice(&order.u16(self.index_fields));
        push_field(&mut out, order, 45056, 7, 4, *b"0100");
        push_field(&mut out, order, 45057, 4, 1, order.u32(n));
        push_field(&mut out, order, 45058, 7, 16 * n, order.u32(table_offset));
        if full {
            if self.unique_ids {
                push_field(&mut out, order, 45059, 7, 33 * n, order.u32(uid_offset));
            } else {
                push_field(&mut out, order, 45059, 7, 0, [0; 4]);
            }
            push_field(&mut out, order, 45060, 4, 1, order.u32(n));
        }
        let next = if self.attributes { attr_offset } else { 0 };
        out.extend_from_slice(&order.u32(next));

        for i in 0..n as usize {
            let flags: u32 = if i == 0 { 0x2003_0000 } else { 0x0002_0002 };
            out.extend_from_slice(&order.u32(flags));
            out.extend_from_slice(&order.u32(sizes[i]));
            out.extend_from_slice(&order.u32(offsets[i]));
            out.extend_from_slice(&order.u16(0));
            out.extend_from_slice(&order.u16(0));
        }

        if self.unique_ids {
            for i in 0..n as usize {
                let mut uid = [0u8; 33];
                uid[..32].copy_from_slice(Self::unique_id(i).as_bytes());
                out.extend_from_slice(&uid);
            }
        }

        if self.attributes {
            out.extend(self.attribute_directory(0, attr_offset));
        }
        out
    }

    /// Attributes directory of image `index`, placed at `dir_offset` from the origin.
    fn attribute_directory(&self, index: usize, dir_offset: u32) -> Vec<u8> {
        let order = self.byte_order;
        let mut fields = Vec::new();
        if self.attributes {
            fields.push(Field::version());
            fields.push(Field::long(order, 45313, index as u32 + 1));
            fields.push(Field::long(order, 45572, 1));
            fields.push(Field::srational(order, 45573, -(index as i32) * 25, 10));
            fields.push(Field::rational(order, 45574, 77, 1000));
            if index == 0 {
                fields.extend(self.extra_primary_field.clone());
            }
        }
        write_directory(order, &fields, dir_offset)
    }
}

fn push_field(out: &mut Vec<u8>, order: ByteOrderType, tag: u16, ty: u16, count: u32, v: [u8; 4]) {
    out.extend_from_slice(&order.u16(tag));
    out.extend_from_slice(&order.u16(ty));
    out.extend_from_slice(&order.u32(count));
    out.extend_from_slice(&v);
}

/// Directory + next offset (0) + out-of-line values.
fn write_directory(order: ByteOrderType, fields: &[Field], dir_offset: u32) -> Vec<u8> {
    let dir_len = 2 + 12 * fields.len() + 4;
    let mut dir = order.u16(fields.len() as u16).to_vec();
    let mut extra = Vec::new();

    for field in fields {
        if field.value.len() <= 4 {
            let mut inline = [0u8; 4];
            inline[..field.value.len()].copy_from_slice(&field.value);
            push_field(&mut dir, order, field.tag, field.field_type, field.count, inline);
        } else {
            let offset = dir_offset + (dir_len + extra.len()) as u32;
            push_field(&mut dir, order, field.tag, field.field_type, field.count, order.u32(offset));
            extra.extend_from_slice(&field.value);
        }
    }
    dir.extend_from_slice(&order.u32(0));
    dir.extend(extra);
    dir
}

/// Position right after SOI and a leading APP0 segment, if any.
fn segment_insert_position(jpeg: &[u8]) -> usize {
    if jpeg.len() >= 6 && jpeg[2] == 0xFF && jpeg[3] == 0xE0 {
        4 + u16::from_be_bytes([jpeg[4], jpeg[5]]) as usize
    } else {
        2
    }
}

fn embed_segment(jpeg: &[u8], payload: &[u8]) -> Vec<u8> {
    let at = segment_insert_position(jpeg);
    let length = (2 + 4 + payload.len()) as u16;

    let mut out = Vec::with_capacity(jpeg.len() + 8 + payload.len());
    out.extend_from_slice(&jpeg[..at]);
    out.extend_from_slice(&[0xFF, 0xE2]);
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(b"MPF\0");
    out.extend_from_slice(payload);
    out.extend_from_slice(&jpeg[at..]);
    out
}

/// Two-image stereo pair built from real JPEGs.
pub fn create_stereo_mpo(byte_order: ByteOrderType) -> MpoFile {
    MpoBuilder::new(byte_order)
        .with_unique_ids(true)
        .add_image(create_test_rgb_jpeg(32, 24, 90))
        .add_image(create_test_jpeg(16, 16, 90))
        .build()
}
