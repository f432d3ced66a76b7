//! Supported raster formats.

use std::fmt;

use bytes::Bytes;

use parlor_core::error::{AppError, ErrorKind};
use parlor_core::result::AppResult;

/// The three formats every profile image is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// `image/jpeg`
    Jpeg,
    /// `image/png`
    Png,
    /// `image/webp`
    Webp,
}

impl ImageFormat {
    /// All supported formats, in directory creation order.
    pub const ALL: [ImageFormat; 3] = [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::Webp];

    /// Resolve a declared MIME type.
    pub fn from_mime(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Resolve a directory/query name. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Directory and query name of the format.
    pub fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    /// MIME type served for the format.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    /// The two formats a buffer of this format is converted into.
    pub fn others(self) -> [ImageFormat; 2] {
        match self {
            Self::Jpeg => [Self::Webp, Self::Png],
            Self::Png => [Self::Jpeg, Self::Webp],
            Self::Webp => [Self::Jpeg, Self::Png],
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<ImageFormat> for image::ImageFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Webp => image::ImageFormat::WebP,
        }
    }
}

/// An uploaded image: raw bytes plus the content type the client declared.
#[derive(Debug, Clone)]
pub struct Image {
    /// Declared MIME type.
    pub content_type: String,
    /// Raw file bytes.
    pub buffer: Bytes,
}

impl Image {
    /// Wrap an upload.
    pub fn new(content_type: impl Into<String>, buffer: impl Into<Bytes>) -> Self {
        Self {
            content_type: content_type.into(),
            buffer: buffer.into(),
        }
    }

    /// The declared format, or `UnsupportedFormat`.
    pub fn format(&self) -> AppResult<ImageFormat> {
        ImageFormat::from_mime(&self.content_type).ok_or_else(|| {
            AppError::new(
                ErrorKind::UnsupportedFormat,
                format!("Image type '{}' is not supported", self.content_type),
            )
        })
    }
}
