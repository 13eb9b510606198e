// SPDX-License-Identifier: GPL-3.0-only

//! Presentation model
//!
//! [`ScreenView`] is derived from the session on every redraw. The renderer
//! draws it and the dispatcher in `update.rs` consults its [`ControlState`],
//! so a control that is not drawn as enabled cannot fire.

use crate::app::state::{
    CaptureSession, Notice, PermissionState, PersistedPhoto, Screen, TransientPhoto,
};
use crate::app::update::Message;
use crate::constants::counter_label;

/// What occupies the main area
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layer<'a> {
    /// Permission prompt with a retry button
    PermissionBlocked,
    LiveFeed,
    CapturePreview(&'a TransientPhoto),
    SavedPhotoReview {
        index: usize,
        photo: &'a PersistedPhoto,
    },
}

/// Which controls accept input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlState {
    pub request_permission: bool,
    pub capture: bool,
    pub toggle_flash: bool,
    pub confirm: bool,
    pub retake: bool,
    pub select_thumbnail: bool,
    pub delete: bool,
    pub close_review: bool,
    pub dismiss_notice: bool,
}

impl ControlState {
    fn for_layer(layer: &Layer<'_>, has_notice: bool) -> Self {
        // An open notice is modal, like a platform alert
        if has_notice {
            return Self {
                dismiss_notice: true,
                ..Self::default()
            };
        }

        let mut controls = Self {
            toggle_flash: true,
            ..Self::default()
        };
        match layer {
            Layer::PermissionBlocked => controls.request_permission = true,
            Layer::LiveFeed => {
                controls.capture = true;
                controls.select_thumbnail = true;
            }
            Layer::CapturePreview(_) => {
                controls.confirm = true;
                controls.retake = true;
            }
            Layer::SavedPhotoReview { .. } => {
                controls.delete = true;
                controls.close_review = true;
            }
        }
        controls
    }

    /// Whether `message` maps to an enabled control
    pub fn allows(&self, message: &Message) -> bool {
        match message {
            Message::RequestPermission => self.request_permission,
            Message::Capture => self.capture,
            Message::ToggleFlash => self.toggle_flash,
            Message::Confirm => self.confirm,
            Message::Retake => self.retake,
            Message::SelectSaved(_) => self.select_thumbnail,
            Message::DeleteSaved => self.delete,
            Message::CloseReview => self.close_review,
            Message::DismissNotice => self.dismiss_notice,
        }
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct ScreenView<'a> {
    pub layer: Layer<'a>,
    /// "Photos Taken: N / 8"
    pub counter: String,
    pub flash_label: &'static str,
    /// Thumbnail strip, left to right
    pub thumbnails: &'a [PersistedPhoto],
    pub notice: Option<&'a Notice>,
    pub controls: ControlState,
}

impl<P, C, S> CaptureSession<P, C, S> {
    pub fn view(&self) -> ScreenView<'_> {
        let layer = if self.permission != PermissionState::Granted {
            Layer::PermissionBlocked
        } else {
            match &self.screen {
                Screen::Idle => Layer::LiveFeed,
                Screen::PreviewingNewCapture { pending } => Layer::CapturePreview(pending),
                Screen::ReviewingSavedPhoto { selected } => match self.saved.get(*selected) {
                    Some(photo) => Layer::SavedPhotoReview {
                        index: *selected,
                        photo,
                    },
                    None => Layer::LiveFeed,
                },
            }
        };

        let notice = self.notice.as_ref();
        let controls = ControlState::for_layer(&layer, notice.is_some());

        ScreenView {
            layer,
            counter: counter_label(self.saved.len()),
            flash_label: self.flash_mode.label(),
            thumbnails: &self.saved,
            notice,
            controls,
        }
    }
}
