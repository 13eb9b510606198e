// SPDX-License-Identifier: GPL-3.0-only

//! Persistent user configuration
//!
//! Stored as JSON at `<config_dir>/photo-strip/config.json`. A missing file
//! yields defaults; a file that fails to parse is reported instead of being
//! silently replaced.

use crate::constants::{APP_DIR_NAME, pipeline, timing};
use crate::errors::{AppError, AppResult};
use crate::flash::FlashMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where confirmed photos are moved to
    pub photos_dir: PathBuf,
    /// Camera device path (e.g. `/dev/video0`); `None` lets GStreamer pick
    pub camera_path: Option<String>,
    /// Flash mode the session starts in
    pub default_flash: FlashMode,
    /// JPEG quality for captured frames (1-100)
    pub jpeg_quality: u8,
    /// How long the flash LED is lit before the frame is taken
    pub flash_settle_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            photos_dir: default_photos_dir(),
            camera_path: None,
            default_flash: FlashMode::Off,
            jpeg_quality: pipeline::DEFAULT_JPEG_QUALITY,
            flash_settle_ms: timing::DEFAULT_FLASH_SETTLE_MS,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE))
    }

    /// Load from the default location, falling back to defaults when absent
    pub fn load() -> AppResult<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No config directory on this system, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(AppError::Config(format!("{}: {}", path.display(), e)));
            }
        };

        let config: Config = serde_json::from_str(&contents)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config.sanitized())
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Config(format!("{}: {}", parent.display(), e)))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Clamp values that would otherwise make the encoder misbehave
    pub fn sanitized(mut self) -> Self {
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        self
    }
}

fn default_photos_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
