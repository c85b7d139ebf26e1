//! I/O layer for MPO decoding.
//!
//! Decoding works on a borrowed byte buffer. [`ByteView`] wraps it with
//! bounds-checked reads so that offsets taken from the file can never index
//! past its end; the free functions decode fixed-width integers.

mod byte_view;

pub use byte_view::{
    read_u16_be, read_u16_le, read_u32_be, read_u32_le, read_u64_be, read_u64_le, ByteView,
};
