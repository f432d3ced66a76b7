//! Shared fixtures for unit tests.

use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, Rgb, RgbImage};
use parlor_storage::imaging::ImageFormat;

/// A gradient image of the given size encoded as `format`.
pub(crate) fn fixture(format: ImageFormat, width: u32, height: u32) -> Bytes {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, format.into())
        .expect("encode fixture");
    Bytes::from(out.into_inner())
}
