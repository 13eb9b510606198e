// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Maximum number of confirmed photos a session may hold
pub const MAX_PHOTOS: usize = 8;

/// Extension used for captured and persisted photos
pub const PHOTO_EXTENSION: &str = "jpg";

/// Directory name used under the picture, config and temp directories
pub const APP_DIR_NAME: &str = "photo-strip";

/// User-facing strings shown by the capture screen
pub mod text {
    pub const LIMIT_TITLE: &str = "Limit Reached";
    pub const CAPTURE_FAILED_TITLE: &str = "Capture Failed";
    pub const SAVE_FAILED_TITLE: &str = "Save Failed";
    pub const PERMISSION_TITLE: &str = "Camera Permission";
    pub const PERMISSION_PROMPT: &str = "We need your permission to show the camera";
    pub const GRANT_PERMISSION: &str = "Grant Permission";
    pub const REVIEW_TITLE: &str = "Options";
    pub const FLASH_OFF: &str = "Flash Off";
    pub const FLASH_ON: &str = "Flash On";
}

/// Pipeline configuration constants
pub mod pipeline {
    /// Maximum frames queued in appsink; older ones are dropped
    pub const MAX_BUFFERS: u32 = 2;

    /// Raw format requested from videoconvert
    pub const OUTPUT_FORMAT: &str = "RGB";

    /// Default JPEG quality for captured frames
    pub const DEFAULT_JPEG_QUALITY: u8 = 90;
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Log frame statistics every N frames
    pub const FRAME_LOG_INTERVAL: u64 = 60;

    /// Pipeline start timeout in seconds
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// A preview frame older than this means the device has stalled
    pub const MAX_FRAME_AGE: Duration = Duration::from_secs(2);

    /// How long a capture waits for the first frame of a freshly started pipeline
    pub const FIRST_FRAME_TIMEOUT: Duration = Duration::from_secs(3);

    /// Poll interval while waiting for the first frame
    pub const FIRST_FRAME_POLL: Duration = Duration::from_millis(50);

    /// Default time the flash LED is lit before the frame is taken
    pub const DEFAULT_FLASH_SETTLE_MS: u64 = 300;

    /// Terminal input poll interval (roughly 60 redraws per second)
    pub const INPUT_POLL: Duration = Duration::from_millis(16);
}

/// Application information utilities
pub mod app_info {
    use std::path::Path;

    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }

    /// Check if the application is running inside a Flatpak sandbox
    pub fn is_flatpak() -> bool {
        Path::new("/.flatpak-info").exists()
    }
}

/// Counter label shown above the capture controls
pub fn counter_label(saved: usize) -> String {
    format!("Photos Taken: {} / {}", saved, MAX_PHOTOS)
}
