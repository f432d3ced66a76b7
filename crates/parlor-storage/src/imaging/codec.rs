//! Decode/encode primitives over raster buffers.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{self, CompressionType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader};
use tracing::warn;

use parlor_core::error::{AppError, ErrorKind};
use parlor_core::result::AppResult;

use super::crop::PixelCrop;
use super::format::ImageFormat;

/// Edge length of the canonical square thumbnail.
pub const THUMBNAIL_SIZE: u32 = 400;

/// JPEG quality used for thumbnails and converted buffers.
const THUMBNAIL_JPEG_QUALITY: u8 = 80;

/// Encoder settings for [`ImageCodec::strip_and_compress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressOptions {
    /// JPEG quality, 1-100. Ignored when `lossless` is set.
    pub quality: u8,
    /// Prefer a lossless encoding. JPEG has none and is written at full
    /// quality instead.
    pub lossless: bool,
}

impl CompressOptions {
    /// Settings applied to every stored original.
    pub const ORIGINAL: CompressOptions = CompressOptions {
        quality: 5,
        lossless: true,
    };
}

/// Image primitives used by the profile pipeline. Implementations are
/// synchronous and CPU-bound; callers move them off the async runtime.
pub trait ImageCodec: Send + Sync + std::fmt::Debug + 'static {
    /// Width and height of an encoded buffer. Fails `SizeProbeFailed`.
    fn probe(&self, buffer: &[u8]) -> AppResult<(u32, u32)>;

    /// Crop to `crop` then resize to exactly `width`x`height`, encoded as
    /// `format`. Fails `ProcessingFailed`.
    fn crop_and_resize(
        &self,
        buffer: &[u8],
        format: ImageFormat,
        crop: PixelCrop,
        width: u32,
        height: u32,
    ) -> AppResult<Bytes>;

    /// Re-encode a `source` buffer as `target`. Fails `ConversionFailed`,
    /// including when both formats are the same.
    fn convert(&self, buffer: &[u8], source: ImageFormat, target: ImageFormat)
    -> AppResult<Bytes>;

    /// Decode and re-encode as `format`, dropping all metadata.
    /// Fails `ProcessingFailed`.
    fn strip_and_compress(
        &self,
        buffer: &[u8],
        format: ImageFormat,
        options: CompressOptions,
    ) -> AppResult<Bytes>;
}

/// [`ImageCodec`] on the pure-Rust `image` crate. Re-encoding from decoded
/// pixels never carries EXIF or other metadata over.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterCodec;

impl RasterCodec {
    /// Create a codec.
    pub fn new() -> Self {
        Self
    }

    fn decode(buffer: &[u8], kind: ErrorKind) -> AppResult<DynamicImage> {
        image::load_from_memory(buffer)
            .map_err(|e| AppError::with_source(kind, format!("Failed to decode image: {e}"), e))
    }

    fn encode(
        image: &DynamicImage,
        format: ImageFormat,
        options: CompressOptions,
        kind: ErrorKind,
    ) -> AppResult<Bytes> {
        let mut buffer = Vec::new();
        let result = match format {
            ImageFormat::Jpeg => {
                let quality = if options.lossless {
                    100
                } else {
                    options.quality.clamp(1, 100)
                };
                let rgb = image.to_rgb8();
                JpegEncoder::new_with_quality(Cursor::new(&mut buffer), quality).write_image(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ExtendedColorType::Rgb8,
                )
            }
            ImageFormat::Png => {
                let compression = if options.lossless {
                    CompressionType::Best
                } else {
                    CompressionType::Default
                };
                let rgba = image.to_rgba8();
                PngEncoder::new_with_quality(
                    Cursor::new(&mut buffer),
                    compression,
                    png::FilterType::Adaptive,
                )
                .write_image(
                    rgba.as_raw(),
                    rgba.width(),
                    rgba.height(),
                    ExtendedColorType::Rgba8,
                )
            }
            ImageFormat::Webp => {
                let rgba = image.to_rgba8();
                WebPEncoder::new_lossless(Cursor::new(&mut buffer)).write_image(
                    rgba.as_raw(),
                    rgba.width(),
                    rgba.height(),
                    ExtendedColorType::Rgba8,
                )
            }
        };

        result.map_err(|e| {
            AppError::with_source(kind, format!("Failed to encode {format}: {e}"), e)
        })?;
        Ok(Bytes::from(buffer))
    }
}

impl ImageCodec for RasterCodec {
    fn probe(&self, buffer: &[u8]) -> AppResult<(u32, u32)> {
        let probe_error = |e: image::ImageError| {
            AppError::with_source(
                ErrorKind::SizeProbeFailed,
                format!("Cannot read image size: {e}"),
                e,
            )
        };
        let reader = ImageReader::new(Cursor::new(buffer))
            .with_guessed_format()
            .map_err(|e| {
                AppError::with_source(ErrorKind::SizeProbeFailed, "Cannot read image header", e)
            })?;
        reader.into_dimensions().map_err(probe_error)
    }

    fn crop_and_resize(
        &self,
        buffer: &[u8],
        format: ImageFormat,
        crop: PixelCrop,
        width: u32,
        height: u32,
    ) -> AppResult<Bytes> {
        let image = Self::decode(buffer, ErrorKind::ProcessingFailed)?;
        if !crop.fits(image.width(), image.height()) {
            warn!(
                crop = ?crop,
                image_width = image.width(),
                image_height = image.height(),
                "Crop region outside image bounds"
            );
            return Err(AppError::new(
                ErrorKind::ProcessingFailed,
                format!(
                    "Crop {}x{}+{}+{} does not fit a {}x{} image",
                    crop.width,
                    crop.height,
                    crop.x,
                    crop.y,
                    image.width(),
                    image.height()
                ),
            ));
        }

        let thumbnail = image
            .crop_imm(crop.x, crop.y, crop.width, crop.height)
            .resize_exact(width, height, FilterType::Lanczos3);
        let options = CompressOptions {
            quality: THUMBNAIL_JPEG_QUALITY,
            lossless: false,
        };
        Self::encode(&thumbnail, format, options, ErrorKind::ProcessingFailed)
    }

    fn convert(
        &self,
        buffer: &[u8],
        source: ImageFormat,
        target: ImageFormat,
    ) -> AppResult<Bytes> {
        if source == target {
            return Err(AppError::new(
                ErrorKind::ConversionFailed,
                format!("Refusing to re-encode {source} into itself"),
            ));
        }
        let image = image::load_from_memory_with_format(buffer, source.into()).map_err(|e| {
            AppError::with_source(
                ErrorKind::ConversionFailed,
                format!("Failed to decode {source}: {e}"),
                e,
            )
        })?;
        let options = CompressOptions {
            quality: THUMBNAIL_JPEG_QUALITY,
            lossless: false,
        };
        Self::encode(&image, target, options, ErrorKind::ConversionFailed)
    }

    fn strip_and_compress(
        &self,
        buffer: &[u8],
        format: ImageFormat,
        options: CompressOptions,
    ) -> AppResult<Bytes> {
        let image = Self::decode(buffer, ErrorKind::ProcessingFailed)?;
        Self::encode(&image, format, options, ErrorKind::ProcessingFailed)
    }
}
