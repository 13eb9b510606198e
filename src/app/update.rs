// SPDX-License-Identifier: GPL-3.0-only

//! Message dispatch
//!
//! Routes user input to the operation handle of the current state. Input for
//! a control that the view shows as disabled is dropped. Errors become the
//! session's notice; nothing is propagated to the event loop.

use crate::app::handlers::Controls;
use crate::app::state::CaptureSession;
use crate::backends::camera::{CaptureDevice, PermissionService};
use crate::storage::PhotoStore;
use tracing::{debug, warn};

/// User input understood by the capture screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// "Grant Permission" on the blocked screen
    RequestPermission,
    /// Shutter button
    Capture,
    ToggleFlash,
    /// Keep the fresh capture
    Confirm,
    /// Throw the fresh capture away
    Retake,
    /// Thumbnail tapped
    SelectSaved(usize),
    /// "Delete Photo" in the review modal
    DeleteSaved,
    /// "Close" in the review modal
    CloseReview,
    DismissNotice,
}

impl<P, C, S> CaptureSession<P, C, S>
where
    P: PermissionService,
    C: CaptureDevice,
    S: PhotoStore,
{
    pub async fn update(&mut self, message: Message) {
        if !self.view().controls.allows(&message) {
            debug!(?message, screen = self.screen.name(), "Control disabled, ignoring input");
            return;
        }

        let result = match message {
            Message::ToggleFlash => {
                self.toggle_flash();
                Ok(())
            }
            Message::DismissNotice => {
                self.dismiss_notice();
                Ok(())
            }
            _ => match (self.controls(), message) {
                (Controls::Blocked(controls), Message::RequestPermission) => {
                    controls.request_permission().await
                }
                (Controls::Idle(controls), Message::Capture) => controls.capture().await,
                (Controls::Idle(controls), Message::SelectSaved(index)) => {
                    controls.select_saved(index)
                }
                (Controls::Previewing(controls), Message::Confirm) => controls.confirm().await,
                (Controls::Previewing(controls), Message::Retake) => {
                    controls.retake();
                    Ok(())
                }
                (Controls::Reviewing(controls), Message::DeleteSaved) => {
                    controls.delete_saved();
                    Ok(())
                }
                (Controls::Reviewing(controls), Message::CloseReview) => {
                    controls.close_review();
                    Ok(())
                }
                (controls, message) => {
                    debug!(?message, state = controls.name(), "No handler for input in this state");
                    Ok(())
                }
            },
        };

        if let Err(err) = result {
            warn!(error = %err, ?message, "Operation failed");
            self.notify(&err);
        }
    }
}
