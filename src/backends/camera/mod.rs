// SPDX-License-Identifier: GPL-3.0-only

//! Camera capabilities consumed by the capture session
//!
//! The session is generic over [`PermissionService`] and [`CaptureDevice`];
//! [`GstCamera`] and [`DevicePermission`] are the implementations used by the
//! terminal screen.

pub mod enumeration;
pub mod permission;
pub mod pipeline;
pub mod types;

pub use enumeration::enumerate_cameras;
pub use permission::DevicePermission;
pub use pipeline::CameraPipeline;
pub use types::{CameraDevice, CameraFrame};

use crate::app::TransientPhoto;
use crate::config::Config;
use crate::constants::{APP_DIR_NAME, PHOTO_EXTENSION, timing};
use crate::errors::CaptureError;
use crate::flash::{self, FlashDevice, FlashMode};
use chrono::Local;
use std::future::Future;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Access to the camera
pub trait PermissionService {
    fn has_permission(&self) -> bool;

    /// Ask for access; resolves to whether it is now granted
    fn request_permission(&self) -> impl Future<Output = bool> + Send;
}

/// Produces transient photos
pub trait CaptureDevice {
    /// Capture one frame to a temporary location
    fn capture_frame(
        &self,
        flash: FlashMode,
    ) -> impl Future<Output = Result<TransientPhoto, CaptureError>> + Send;
}

/// Live camera backed by a GStreamer preview pipeline
pub struct GstCamera {
    device_path: Option<String>,
    pipeline: Mutex<Option<CameraPipeline>>,
    flash_devices: Vec<FlashDevice>,
    flash_settle: Duration,
    jpeg_quality: u8,
    capture_dir: PathBuf,
}

impl GstCamera {
    pub fn new(config: &Config) -> Self {
        Self {
            device_path: config.camera_path.clone(),
            pipeline: Mutex::new(None),
            flash_devices: FlashDevice::discover(),
            flash_settle: Duration::from_millis(config.flash_settle_ms),
            jpeg_quality: config.jpeg_quality,
            capture_dir: std::env::temp_dir().join(APP_DIR_NAME),
        }
    }

    /// Start the preview pipeline if it is not running.
    ///
    /// Returns `true` when a new pipeline was started.
    pub fn start(&self) -> Result<bool, CaptureError> {
        let mut guard = self
            .pipeline
            .lock()
            .map_err(|_| CaptureError::Backend("Pipeline lock poisoned".to_string()))?;
        if guard.is_some() {
            return Ok(false);
        }
        *guard = Some(CameraPipeline::start(self.device_path.as_deref())?);
        Ok(true)
    }

    pub fn is_running(&self) -> bool {
        self.pipeline
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Newest preview frame, for the live feed
    pub fn latest_frame(&self) -> Option<Arc<CameraFrame>> {
        self.pipeline
            .lock()
            .ok()?
            .as_ref()
            .and_then(CameraPipeline::latest_frame)
    }

    fn grab(&self) -> Result<Arc<CameraFrame>, CaptureError> {
        let guard = self
            .pipeline
            .lock()
            .map_err(|_| CaptureError::Backend("Pipeline lock poisoned".to_string()))?;
        let pipeline = guard.as_ref().ok_or(CaptureError::NotStarted)?;
        let frame = pipeline
            .latest_frame()
            .ok_or(CaptureError::NoFrameAvailable)?;

        if frame.is_stale(Instant::now(), timing::MAX_FRAME_AGE) {
            warn!("Newest preview frame is stale, camera may have stalled");
            return Err(CaptureError::NoFrameAvailable);
        }
        Ok(frame)
    }

    /// Wait until a just-started pipeline delivers its first frame
    async fn wait_for_first_frame(&self) {
        let deadline = Instant::now() + timing::FIRST_FRAME_TIMEOUT;
        while self.latest_frame().is_none() && Instant::now() < deadline {
            tokio::time::sleep(timing::FIRST_FRAME_POLL).await;
        }
    }
}

impl CaptureDevice for GstCamera {
    async fn capture_frame(
        &self,
        flash_mode: FlashMode,
    ) -> Result<TransientPhoto, CaptureError> {
        // A pipeline that failed to start earlier gets another attempt here
        if self.start()? {
            info!("Camera pipeline started on capture");
            self.wait_for_first_frame().await;
        }

        let use_flash = flash_mode.is_on() && !self.flash_devices.is_empty();
        if use_flash {
            flash::all_on(&self.flash_devices);
            tokio::time::sleep(self.flash_settle).await;
        } else if flash_mode.is_on() {
            debug!("Flash requested but no flash LED available");
        }

        let frame = self.grab();

        if use_flash {
            flash::all_off(&self.flash_devices);
        }

        let frame = frame?;
        let created_at = Local::now();
        let path = self
            .capture_dir
            .join(format!("{}.{}", uuid::Uuid::new_v4(), PHOTO_EXTENSION));
        let quality = self.jpeg_quality;

        let target = path.clone();
        tokio::task::spawn_blocking(move || encode_jpeg(&frame, &target, quality))
            .await
            .map_err(|e| CaptureError::Backend(format!("Encoder task failed: {}", e)))??;

        info!(path = %path.display(), "Frame written to temporary file");
        Ok(TransientPhoto { path, created_at })
    }
}

/// Write a frame as JPEG, creating the parent directory
pub fn encode_jpeg(frame: &CameraFrame, path: &Path, quality: u8) -> Result<(), CaptureError> {
    let img = frame
        .to_rgb_image()
        .ok_or_else(|| CaptureError::Encoding("Frame buffer shorter than its size".to_string()))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, quality);
    encoder.encode_image(&img)?;
    Ok(())
}
