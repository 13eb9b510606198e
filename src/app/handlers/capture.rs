// SPDX-License-Identifier: GPL-3.0-only

//! Capture, confirm and retake

use super::{IdleControls, PreviewControls};
use crate::app::state::{PersistedPhoto, Screen};
use crate::backends::camera::CaptureDevice;
use crate::constants::MAX_PHOTOS;
use crate::errors::{AppError, AppResult};
use crate::storage::PhotoStore;
use chrono::Local;
use tracing::{info, warn};

impl<P, C: CaptureDevice, S> IdleControls<'_, P, C, S> {
    /// Take a picture with the current flash mode.
    ///
    /// Rejected without touching the camera once the strip holds
    /// [`MAX_PHOTOS`]. A capture failure leaves the screen idle so the user can
    /// simply press the shutter again.
    pub async fn capture(self) -> AppResult<()> {
        let session = self.session;

        if session.saved.len() >= MAX_PHOTOS {
            info!(saved = session.saved.len(), "Capture rejected, strip is full");
            return Err(AppError::CapacityExceeded { limit: MAX_PHOTOS });
        }

        let flash = session.flash_mode;
        info!(?flash, "Capturing photo");

        let pending = session.camera.capture_frame(flash).await.map_err(|e| {
            warn!(error = %e, "Capture failed");
            AppError::Capture(e)
        })?;

        info!(path = %pending.path.display(), "Photo captured, awaiting confirmation");
        session.enter(Screen::PreviewingNewCapture { pending });
        Ok(())
    }
}

impl<P, C, S: PhotoStore> PreviewControls<'_, P, C, S> {
    /// Move the pending capture into the photos directory and append it to
    /// the strip. On failure the preview stays open with the same capture.
    pub async fn confirm(self) -> AppResult<()> {
        let Self { session, pending } = self;

        let created_at = Local::now();
        let name = session.next_photo_name(created_at);

        let path = session
            .store
            .move_to_permanent(&pending.path, &name)
            .await
            .map_err(|e| {
                warn!(error = %e, from = %pending.path.display(), "Failed to persist photo");
                AppError::Persist(e)
            })?;

        info!(path = %path.display(), index = session.saved.len(), "Photo saved");
        session.saved.push(PersistedPhoto { path, created_at });
        session.enter(Screen::Idle);
        Ok(())
    }
}

impl<P, C, S> PreviewControls<'_, P, C, S> {
    /// Drop the pending capture. Its temporary file is left where the
    /// capture backend put it.
    pub fn retake(self) {
        info!(path = %self.pending.path.display(), "Capture discarded");
        self.session.enter(Screen::Idle);
    }
}
