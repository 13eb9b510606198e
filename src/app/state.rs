// SPDX-License-Identifier: GPL-3.0-only

//! Capture session state
//!
//! The whole screen is described by one [`CaptureSession`]. Which overlay is
//! showing is a single tagged [`Screen`] value, so a capture preview and a
//! saved-photo review can never be open at the same time.

use crate::constants::{MAX_PHOTOS, PHOTO_EXTENSION, text};
use crate::errors::{AppError, CaptureError};
use crate::flash::FlashMode;
use chrono::{DateTime, Local};
use std::path::PathBuf;
use tracing::{debug, info};

/// A captured frame waiting for the user to confirm or retake it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientPhoto {
    /// Temporary location assigned by the capture backend
    pub path: PathBuf,
    pub created_at: DateTime<Local>,
}

/// A confirmed photo living in the photos directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedPhoto {
    pub path: PathBuf,
    /// Confirmation time, also encoded in the file name
    pub created_at: DateTime<Local>,
}

/// Which overlay the screen is showing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Screen {
    /// Live feed with capture controls
    #[default]
    Idle,
    /// A fresh capture awaiting confirm or retake
    PreviewingNewCapture { pending: TransientPhoto },
    /// Modal for a photo picked from the thumbnail strip
    ReviewingSavedPhoto { selected: usize },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Idle => "idle",
            Screen::PreviewingNewCapture { .. } => "previewing",
            Screen::ReviewingSavedPhoto { .. } => "reviewing",
        }
    }
}

/// Camera permission as last observed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PermissionState {
    /// Not checked yet
    #[default]
    Unknown,
    Granted,
    Denied,
}

/// User-visible alert raised by a rejected or failed operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

impl From<&AppError> for Notice {
    fn from(err: &AppError) -> Self {
        let title = match err {
            AppError::CapacityExceeded { .. } => text::LIMIT_TITLE,
            AppError::PermissionDenied => text::PERMISSION_TITLE,
            AppError::Capture(_) => text::CAPTURE_FAILED_TITLE,
            AppError::Persist(_) => text::SAVE_FAILED_TITLE,
            AppError::InvalidSelection { .. } | AppError::Config(_) => "Error",
        };
        Notice::new(title, err.to_string())
    }
}

/// Owns all state of the capture screen.
///
/// `P`, `C` and `S` are the permission, capture and storage capabilities.
/// Fields are only mutated through the session's own operations; the
/// state-specific operations are reached via
/// [`controls`](CaptureSession::controls).
pub struct CaptureSession<P, C, S> {
    pub(crate) permissions: P,
    pub(crate) camera: C,
    pub(crate) store: S,
    pub(crate) permission: PermissionState,
    pub(crate) flash_mode: FlashMode,
    pub(crate) saved: Vec<PersistedPhoto>,
    pub(crate) screen: Screen,
    pub(crate) notice: Option<Notice>,
    /// Millisecond stamp of the last generated file name
    pub(crate) last_name_millis: Option<i64>,
}

impl<P, C, S> CaptureSession<P, C, S> {
    pub fn new(permissions: P, camera: C, store: S, flash_mode: FlashMode) -> Self {
        Self {
            permissions,
            camera,
            store,
            permission: PermissionState::Unknown,
            flash_mode,
            saved: Vec::with_capacity(MAX_PHOTOS),
            screen: Screen::Idle,
            notice: None,
            last_name_millis: None,
        }
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn permissions(&self) -> &P {
        &self.permissions
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    pub fn flash_mode(&self) -> FlashMode {
        self.flash_mode
    }

    /// Confirmed photos in confirmation order
    pub fn saved_photos(&self) -> &[PersistedPhoto] {
        &self.saved
    }

    pub fn pending_photo(&self) -> Option<&TransientPhoto> {
        match &self.screen {
            Screen::PreviewingNewCapture { pending } => Some(pending),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_full(&self) -> bool {
        self.saved.len() >= MAX_PHOTOS
    }

    /// Flip the flash mode. Valid in every state.
    pub fn toggle_flash(&mut self) {
        self.flash_mode = self.flash_mode.toggled();
        debug!(flash = ?self.flash_mode, "Flash toggled");
    }

    /// Surface an error to the user
    pub fn notify(&mut self, err: &AppError) {
        self.notice = Some(Notice::from(err));
    }

    /// Report a camera failure that happened outside a capture, e.g. the
    /// preview pipeline refusing to start.
    pub fn notify_camera_failure(&mut self, err: CaptureError) {
        self.notify(&AppError::Capture(err));
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// File name for the next persisted photo: unix milliseconds of
    /// `created_at`, bumped so names are strictly increasing in a session.
    pub(crate) fn next_photo_name(&mut self, created_at: DateTime<Local>) -> String {
        let mut millis = created_at.timestamp_millis();
        if let Some(last) = self.last_name_millis
            && millis <= last
        {
            millis = last + 1;
        }
        self.last_name_millis = Some(millis);
        format!("{}.{}", millis, PHOTO_EXTENSION)
    }

    pub(crate) fn enter(&mut self, screen: Screen) {
        info!(from = self.screen.name(), to = screen.name(), "Screen transition");
        self.screen = screen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session() -> CaptureSession<(), (), ()> {
        CaptureSession::new((), (), (), FlashMode::Off)
    }

    #[test]
    fn test_new_session_is_idle_and_empty() {
        let session = session();
        assert_eq!(session.screen(), &Screen::Idle);
        assert_eq!(session.permission(), PermissionState::Unknown);
        assert!(session.saved_photos().is_empty());
        assert!(session.pending_photo().is_none());
    }

    #[test]
    fn test_photo_names_strictly_increase() {
        let mut session = session();
        let now = Local.timestamp_millis_opt(1_700_000_000_123).unwrap();

        assert_eq!(session.next_photo_name(now), "1700000000123.jpg");
        assert_eq!(session.next_photo_name(now), "1700000000124.jpg");

        let earlier = Local.timestamp_millis_opt(1_600_000_000_000).unwrap();
        assert_eq!(session.next_photo_name(earlier), "1700000000125.jpg");
    }

    #[test]
    fn test_notice_from_capacity_error() {
        let notice = Notice::from(&AppError::CapacityExceeded { limit: MAX_PHOTOS });
        assert_eq!(notice.title, "Limit Reached");
        assert_eq!(notice.body, "You've reached the limit of 8 photos.");
    }

    #[test]
    fn test_toggle_flash_twice_restores_mode() {
        let mut session = session();
        session.toggle_flash();
        assert_eq!(session.flash_mode(), FlashMode::On);
        session.toggle_flash();
        assert_eq!(session.flash_mode(), FlashMode::Off);
    }
}
