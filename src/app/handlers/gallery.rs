// SPDX-License-Identifier: GPL-3.0-only

//! Thumbnail strip selection and the review modal

use super::{IdleControls, ReviewControls};
use crate::app::state::Screen;
use crate::errors::{AppError, AppResult};
use tracing::{info, warn};

impl<P, C, S> IdleControls<'_, P, C, S> {
    /// Open the review modal for the saved photo at `index`
    pub fn select_saved(self, index: usize) -> AppResult<()> {
        let len = self.session.saved.len();
        if index >= len {
            warn!(index, len, "Thumbnail selection out of range");
            return Err(AppError::InvalidSelection { index, len });
        }

        self.session.enter(Screen::ReviewingSavedPhoto { selected: index });
        Ok(())
    }
}

impl<P, C, S> ReviewControls<'_, P, C, S> {
    /// Remove the reviewed photo from the strip. Later photos shift down by
    /// one; the file itself stays in the photos directory.
    pub fn delete_saved(self) {
        let Self { session, selected } = self;

        if selected < session.saved.len() {
            let removed = session.saved.remove(selected);
            info!(index = selected, path = %removed.path.display(), "Photo removed from strip");
        }
        session.enter(Screen::Idle);
    }

    /// Close the modal, keeping the photo
    pub fn close_review(self) {
        self.session.enter(Screen::Idle);
    }
}
