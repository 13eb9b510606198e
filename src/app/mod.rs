// SPDX-License-Identifier: GPL-3.0-only

//! Capture session controller
//!
//! Owns the screen state and the transitions between the live feed, the
//! confirm/retake preview and the saved-photo review modal:
//!
//! - [`state`]: the session record and photo types
//! - [`handlers`]: operations, grouped by the state they are valid in
//! - [`update`]: input dispatch
//! - [`view`]: presentation model for the renderer

pub mod handlers;
pub mod state;
pub mod update;
pub mod view;

pub use handlers::{BlockedControls, Controls, IdleControls, PreviewControls, ReviewControls};
pub use state::{
    CaptureSession, Notice, PermissionState, PersistedPhoto, Screen, TransientPhoto,
};
pub use update::Message;
pub use view::{ControlState, Layer, ScreenView};
