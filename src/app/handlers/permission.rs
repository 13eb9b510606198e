// SPDX-License-Identifier: GPL-3.0-only

//! Camera permission gate

use super::BlockedControls;
use crate::app::state::{CaptureSession, PermissionState};
use crate::backends::camera::PermissionService;
use crate::errors::{AppError, AppResult};
use tracing::{info, warn};

impl<P: PermissionService, C, S> CaptureSession<P, C, S> {
    /// Startup check: request access once if it is not already granted.
    ///
    /// Does nothing after the first call; later attempts go through the
    /// retry control of the blocked screen.
    pub async fn ensure_permission(&mut self) -> PermissionState {
        if self.permission != PermissionState::Unknown {
            return self.permission;
        }

        self.permission = if self.permissions.has_permission() {
            PermissionState::Granted
        } else {
            info!("Camera permission missing, requesting");
            if self.permissions.request_permission().await {
                PermissionState::Granted
            } else {
                PermissionState::Denied
            }
        };

        info!(permission = ?self.permission, "Camera permission resolved");
        self.permission
    }
}

impl<P: PermissionService, C, S> BlockedControls<'_, P, C, S> {
    /// Ask again after the user changed OS-level access
    pub async fn request_permission(self) -> AppResult<()> {
        let session = self.session;

        if session.permissions.request_permission().await {
            info!("Camera permission granted");
            session.permission = PermissionState::Granted;
            Ok(())
        } else {
            warn!("Camera permission still denied");
            session.permission = PermissionState::Denied;
            Err(AppError::PermissionDenied)
        }
    }
}
