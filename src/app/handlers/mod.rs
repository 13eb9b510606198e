// SPDX-License-Identifier: GPL-3.0-only

//! State-specific operation handles
//!
//! [`CaptureSession::controls`] hands out exactly one handle matching the
//! current screen. Each handle only exposes the operations that are valid in
//! that screen, so e.g. `confirm` cannot be called while the review modal is
//! open. Operations consume the handle because they may change the screen.

mod capture;
mod gallery;
mod permission;

use crate::app::state::{CaptureSession, PermissionState, Screen, TransientPhoto};

/// Operations available in the current state
pub enum Controls<'a, P, C, S> {
    /// Camera permission missing; only a retry is possible
    Blocked(BlockedControls<'a, P, C, S>),
    /// Live feed: capture or open a saved photo
    Idle(IdleControls<'a, P, C, S>),
    /// Fresh capture on screen: confirm or retake
    Previewing(PreviewControls<'a, P, C, S>),
    /// Saved photo on screen: delete or close
    Reviewing(ReviewControls<'a, P, C, S>),
}

impl<P, C, S> Controls<'_, P, C, S> {
    pub fn name(&self) -> &'static str {
        match self {
            Controls::Blocked(_) => "blocked",
            Controls::Idle(_) => "idle",
            Controls::Previewing(_) => "previewing",
            Controls::Reviewing(_) => "reviewing",
        }
    }
}

pub struct BlockedControls<'a, P, C, S> {
    session: &'a mut CaptureSession<P, C, S>,
}

pub struct IdleControls<'a, P, C, S> {
    session: &'a mut CaptureSession<P, C, S>,
}

pub struct PreviewControls<'a, P, C, S> {
    session: &'a mut CaptureSession<P, C, S>,
    pending: TransientPhoto,
}

impl<P, C, S> PreviewControls<'_, P, C, S> {
    pub fn pending(&self) -> &TransientPhoto {
        &self.pending
    }
}

pub struct ReviewControls<'a, P, C, S> {
    session: &'a mut CaptureSession<P, C, S>,
    selected: usize,
}

/// Owned copy of the screen payload so the session can be reborrowed
enum Active {
    Idle,
    Previewing(TransientPhoto),
    Reviewing(usize),
}

impl<P, C, S> CaptureSession<P, C, S> {
    /// Handle for the operations valid right now
    pub fn controls(&mut self) -> Controls<'_, P, C, S> {
        if self.permission != PermissionState::Granted {
            return Controls::Blocked(BlockedControls { session: self });
        }

        let active = match &self.screen {
            Screen::Idle => Active::Idle,
            Screen::PreviewingNewCapture { pending } => Active::Previewing(pending.clone()),
            Screen::ReviewingSavedPhoto { selected } => Active::Reviewing(*selected),
        };

        match active {
            Active::Idle => Controls::Idle(IdleControls { session: self }),
            Active::Previewing(pending) => Controls::Previewing(PreviewControls {
                session: self,
                pending,
            }),
            Active::Reviewing(selected) => Controls::Reviewing(ReviewControls {
                session: self,
                selected,
            }),
        }
    }
}
