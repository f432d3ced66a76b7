//! Upload pipeline and lifecycle of profile image sets.
//!
//! One upload goes through
//! `validate -> strip -> store original -> probe -> crop/resize -> convert -> store active`.
//! The first failure aborts the call. Conversions all finish before any
//! active file is written, so a conversion failure leaves no active file
//! behind; a failed active write does not remove siblings already written.

use std::sync::Arc;

use tokio::fs::File;
use tokio::sync::Semaphore;
use tracing::{Span, error, info, instrument, warn};

use parlor_core::error::{AppError, ErrorKind};
use parlor_core::result::AppResult;
use parlor_core::types::ImageId;
use parlor_storage::imaging::{
    CompressOptions, Crop, CropCalculator, Image, ImageCodec, ImageFormat, THUMBNAIL_SIZE,
};
use parlor_storage::profile::ProfileImageStore;

/// Creates, archives and serves profile image sets.
#[derive(Debug, Clone)]
pub struct ProfileImageManager {
    store: ProfileImageStore,
    codec: Arc<dyn ImageCodec>,
    /// Bounds how many uploads run their pipeline at once.
    limiter: Arc<Semaphore>,
}

impl ProfileImageManager {
    /// Creates a manager allowing `max_concurrent_jobs` uploads in flight.
    pub fn new(
        store: ProfileImageStore,
        codec: Arc<dyn ImageCodec>,
        max_concurrent_jobs: usize,
    ) -> Self {
        Self {
            store,
            codec,
            limiter: Arc::new(Semaphore::new(max_concurrent_jobs.max(1))),
        }
    }

    /// The underlying file store.
    pub fn store(&self) -> &ProfileImageStore {
        &self.store
    }

    /// Process an upload into a new active image set and return its id.
    #[instrument(skip(self, image), fields(content_type = %image.content_type, image_id))]
    pub async fn new_image(&self, image: Image, crop: Crop) -> AppResult<ImageId> {
        let format = image.format().inspect_err(|e| {
            warn!(error = %e, "Rejected upload");
        })?;

        let _permit = self.limiter.acquire().await.map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Image job limiter closed", e)
        })?;

        let buffer = image.buffer;
        let original = self
            .run_codec("strip_and_compress", format, move |codec| {
                codec.strip_and_compress(&buffer, format, CompressOptions::ORIGINAL)
            })
            .await?;

        let id = ImageId::new();
        Span::current().record("image_id", tracing::field::display(id));
        self.store.save_original(id, &original).await?;

        let probe_buffer = original.clone();
        let (width, height) = self
            .run_codec("probe", format, move |codec| codec.probe(&probe_buffer))
            .await?;

        let pixels = CropCalculator::to_pixels(crop, width, height).squared_within(width, height);
        let canonical = self
            .run_codec("crop_and_resize", format, move |codec| {
                codec.crop_and_resize(&original, format, pixels, THUMBNAIL_SIZE, THUMBNAIL_SIZE)
            })
            .await?;

        let source = canonical.clone();
        let converted = self
            .run_codec("convert", format, move |codec| {
                format
                    .others()
                    .into_iter()
                    .map(|target| {
                        codec
                            .convert(&source, format, target)
                            .map(|buffer| (target, buffer))
                    })
                    .collect::<AppResult<Vec<_>>>()
            })
            .await?;

        self.store.save_active(id, format, &canonical).await?;
        for (target, buffer) in &converted {
            self.store.save_active(id, *target, buffer).await?;
        }

        info!(
            image_id = %id,
            format = format.name(),
            source_width = width,
            source_height = height,
            "Profile image created"
        );
        Ok(id)
    }

    /// Move an image set from active to archive.
    pub async fn archive(&self, id: ImageId) -> AppResult<()> {
        self.store.archive(id).await
    }

    /// Open the active file of `id` in the format named `format_name`.
    ///
    /// An unknown name is a `Validation` error; a missing file `NotFound`.
    pub async fn serve(&self, id: ImageId, format_name: &str) -> AppResult<(ImageFormat, File)> {
        let format = ImageFormat::from_name(format_name).ok_or_else(|| {
            AppError::validation(format!("Unknown image type '{format_name}'"))
        })?;
        let file = self.store.open_active(id, format).await?;
        Ok((format, file))
    }

    /// Run a codec call on the blocking pool, logging failures where they
    /// happen.
    async fn run_codec<T, F>(
        &self,
        operation: &'static str,
        format: ImageFormat,
        f: F,
    ) -> AppResult<T>
    where
        F: FnOnce(&dyn ImageCodec) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let codec = Arc::clone(&self.codec);
        tokio::task::spawn_blocking(move || f(codec.as_ref()))
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Internal,
                    format!("Image task {operation} did not complete"),
                    e,
                )
            })?
            .inspect_err(|e| {
                error!(
                    operation,
                    format = format.name(),
                    kind = %e.kind,
                    error = %e,
                    "Image codec step failed"
                );
            })
    }
}
