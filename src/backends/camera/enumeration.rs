// SPDX-License-Identifier: GPL-3.0-only

//! Camera discovery through the GStreamer device monitor

use super::types::CameraDevice;
use crate::errors::CaptureError;
use gstreamer::prelude::*;
use tracing::{debug, info};

/// Device properties that may carry a V4L2 node, in preference order
const PATH_PROPERTIES: &[&str] = &["api.v4l2.path", "device.path"];

/// List video sources currently visible to GStreamer
pub fn enumerate_cameras() -> Result<Vec<CameraDevice>, CaptureError> {
    gstreamer::init().map_err(|e| CaptureError::Backend(e.to_string()))?;

    let monitor = gstreamer::DeviceMonitor::new();
    let _ = monitor.add_filter(Some("Video/Source"), None);
    monitor
        .start()
        .map_err(|e| CaptureError::Backend(format!("Device monitor failed: {}", e)))?;

    let cameras: Vec<CameraDevice> = monitor
        .devices()
        .into_iter()
        .map(|device| {
            let path = device.properties().and_then(|props| {
                PATH_PROPERTIES
                    .iter()
                    .find_map(|key| props.get::<String>(*key).ok())
            });
            let name = device.display_name().to_string();
            debug!(name = %name, ?path, "Found video source");
            CameraDevice { name, path }
        })
        .collect();

    monitor.stop();

    info!(count = cameras.len(), "Camera enumeration complete");
    Ok(dedup_by_path(cameras))
}

/// The same node can be announced by several providers (v4l2 and PipeWire)
fn dedup_by_path(cameras: Vec<CameraDevice>) -> Vec<CameraDevice> {
    let mut seen = std::collections::HashSet::new();
    cameras
        .into_iter()
        .filter(|cam| match &cam.path {
            Some(path) => seen.insert(path.clone()),
            None => true,
        })
        .collect()
}
