//! # parlor-storage
//!
//! Raster image primitives and the on-disk layout of profile images.
//!
//! - [`imaging`]: supported formats, percentage crops and the
//!   [`ImageCodec`](imaging::ImageCodec) capability.
//! - [`profile`]: the `original`/`active`/`archive` tree keyed by image id.

pub mod imaging;
pub mod profile;

pub use imaging::{
    CompressOptions, Crop, CropCalculator, Image, ImageCodec, ImageFormat, PixelCrop, RasterCodec,
};
pub use profile::ProfileImageStore;
