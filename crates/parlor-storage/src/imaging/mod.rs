//! Raster image primitives.

pub mod codec;
pub mod crop;
pub mod format;

pub use codec::{CompressOptions, ImageCodec, RasterCodec, THUMBNAIL_SIZE};
pub use crop::{Crop, CropCalculator, PixelCrop};
pub use format::{Image, ImageFormat};
