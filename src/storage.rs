// SPDX-License-Identifier: GPL-3.0-only

//! Storage for confirmed photos
//!
//! Confirmed captures are moved out of the temporary capture directory into
//! the photos directory. Removing a photo from the strip does not delete the
//! file.

use crate::errors::PersistError;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Moves transient photos to permanent storage
pub trait PhotoStore {
    /// Move `transient` to `name` inside the store, returning the new path
    fn move_to_permanent(
        &self,
        transient: &Path,
        name: &str,
    ) -> impl Future<Output = Result<PathBuf, PersistError>> + Send;
}

/// Photos directory on the local filesystem
#[derive(Debug, Clone)]
pub struct FsPhotoStore {
    photos_dir: PathBuf,
}

impl FsPhotoStore {
    pub fn new(photos_dir: PathBuf) -> Self {
        Self { photos_dir }
    }

    pub fn photos_dir(&self) -> &Path {
        &self.photos_dir
    }
}

impl PhotoStore for FsPhotoStore {
    async fn move_to_permanent(
        &self,
        transient: &Path,
        name: &str,
    ) -> Result<PathBuf, PersistError> {
        tokio::fs::create_dir_all(&self.photos_dir)
            .await
            .map_err(|e| {
                PersistError::Directory(format!("{}: {}", self.photos_dir.display(), e))
            })?;

        let destination = self.photos_dir.join(name);

        match tokio::fs::rename(transient, &destination).await {
            Ok(()) => {}
            Err(rename_err) => {
                // Temp dir is often tmpfs, so rename crosses filesystems
                debug!(error = %rename_err, "Rename failed, falling back to copy");
                tokio::fs::copy(transient, &destination)
                    .await
                    .map_err(|e| PersistError::Move(format!("{}: {}", transient.display(), e)))?;
                if let Err(e) = tokio::fs::remove_file(transient).await {
                    warn!(
                        path = %transient.display(),
                        error = %e,
                        "Copied photo but could not remove temp file"
                    );
                }
            }
        }

        info!(path = %destination.display(), "Photo moved to photos directory");
        Ok(destination)
    }
}

/// Decode an image and shrink it to fit `max_width` x `max_height`
///
/// Used for the preview overlay and the thumbnail strip; returns `None` when
/// the file is missing or cannot be decoded.
pub fn load_thumbnail(path: &Path, max_width: u32, max_height: u32) -> Option<image::RgbImage> {
    let img = match image::open(path) {
        Ok(img) => img,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Cannot decode photo");
            return None;
        }
    };
    Some(img.thumbnail(max_width, max_height).to_rgb8())
}
