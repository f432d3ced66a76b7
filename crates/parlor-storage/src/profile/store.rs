//! Profile image store on the local filesystem.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, error, info};

use parlor_core::error::{AppError, ErrorKind};
use parlor_core::result::AppResult;
use parlor_core::types::ImageId;

use crate::imaging::ImageFormat;

const ORIGINAL_DIR: &str = "original";

/// Lifecycle directory a per-format file lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Servable.
    Active,
    /// Retired; never served, never deleted.
    Archive,
}

impl Lifecycle {
    fn dir(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archive => "archive",
        }
    }
}

/// Maps `(id, format, lifecycle)` to paths under a root and moves files
/// between lifecycle states.
#[derive(Debug, Clone)]
pub struct ProfileImageStore {
    root: PathBuf,
}

impl ProfileImageStore {
    /// Create a store rooted at `root`. Nothing is touched on disk until
    /// [`ensure_layout`](Self::ensure_layout).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a per-format file.
    pub fn path(&self, id: ImageId, format: ImageFormat, lifecycle: Lifecycle) -> PathBuf {
        self.root
            .join(lifecycle.dir())
            .join(format.name())
            .join(id.to_string())
    }

    /// Path of the stored original.
    pub fn original_path(&self, id: ImageId) -> PathBuf {
        self.root.join(ORIGINAL_DIR).join(id.to_string())
    }

    /// Create every directory of the layout. Safe to call repeatedly.
    pub async fn ensure_layout(&self) -> AppResult<()> {
        let mut dirs = vec![self.root.join(ORIGINAL_DIR)];
        for lifecycle in [Lifecycle::Active, Lifecycle::Archive] {
            for format in ImageFormat::ALL {
                dirs.push(self.root.join(lifecycle.dir()).join(format.name()));
            }
        }

        for dir in dirs {
            fs::create_dir_all(&dir).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::WriteFailed,
                    format!("Failed to create image directory: {}", dir.display()),
                    e,
                )
            })?;
        }

        info!(root = %self.root.display(), "Profile image layout ready");
        Ok(())
    }

    /// Write the original buffer. An existing file is overwritten.
    pub async fn save_original(&self, id: ImageId, buffer: &[u8]) -> AppResult<()> {
        let path = self.original_path(id);
        write_file(&path, buffer).await.map_err(|e| {
            error!(image_id = %id, operation = "save_original", error = %e, "Image write failed");
            AppError::with_source(
                ErrorKind::WriteFailed,
                format!("Failed to write original image {id}"),
                e,
            )
        })
    }

    /// Write one active per-format file.
    pub async fn save_active(
        &self,
        id: ImageId,
        format: ImageFormat,
        buffer: &[u8],
    ) -> AppResult<()> {
        let path = self.path(id, format, Lifecycle::Active);
        write_file(&path, buffer).await.map_err(|e| {
            error!(
                image_id = %id,
                format = format.name(),
                operation = "save_active",
                error = %e,
                "Image write failed"
            );
            AppError::with_source(
                ErrorKind::WriteFailed,
                format!("Failed to write {format} image {id}"),
                e,
            )
        })
    }

    /// Move all three per-format files from active to archive.
    ///
    /// Every format is attempted. If any rename fails the call reports
    /// `ArchiveFailed` naming the failed formats; the ones that moved stay
    /// archived.
    pub async fn archive(&self, id: ImageId) -> AppResult<()> {
        let mut failed = Vec::new();
        for format in ImageFormat::ALL {
            let from = self.path(id, format, Lifecycle::Active);
            let to = self.path(id, format, Lifecycle::Archive);
            if let Err(e) = fs::rename(&from, &to).await {
                error!(
                    image_id = %id,
                    format = format.name(),
                    operation = "archive",
                    error = %e,
                    "Image archive failed"
                );
                failed.push(format.name());
            }
        }

        if failed.is_empty() {
            debug!(image_id = %id, "Image archived");
            Ok(())
        } else {
            Err(AppError::new(
                ErrorKind::ArchiveFailed,
                format!("Failed to archive image {id} for {}", failed.join(", ")),
            ))
        }
    }

    /// Open an active file for reading. Fails `NotFound` when absent.
    pub async fn open_active(&self, id: ImageId, format: ImageFormat) -> AppResult<fs::File> {
        let path = self.path(id, format, Lifecycle::Active);
        fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Image {id} ({format}) not found"))
            } else {
                AppError::with_source(
                    ErrorKind::Internal,
                    format!("Failed to open image {id} ({format})"),
                    e,
                )
            }
        })
    }
}

async fn write_file(path: &Path, buffer: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, buffer).await
}
