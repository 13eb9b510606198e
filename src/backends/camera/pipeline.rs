// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer preview pipeline
//!
//! `source ! videoconvert ! video/x-raw,format=RGB ! appsink`. The appsink
//! callback keeps only the newest frame; both the live feed and captures read
//! from that slot.

use super::types::CameraFrame;
use crate::constants::{pipeline, timing};
use crate::errors::CaptureError;
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, error, info, warn};

static FRAME_COUNTER: AtomicU64 = AtomicU64::new(0);

type FrameSlot = Arc<Mutex<Option<Arc<CameraFrame>>>>;

pub struct CameraPipeline {
    pipeline: gstreamer::Pipeline,
    latest: FrameSlot,
}

/// Launch description for a device path, or the platform default source
pub fn launch_description(device_path: Option<&str>) -> String {
    let source = match device_path {
        Some(path) => format!("v4l2src device=\"{}\"", path),
        None => "autovideosrc".to_string(),
    };
    format!(
        "{} ! videoconvert ! video/x-raw,format={} ! appsink name=sink",
        source,
        pipeline::OUTPUT_FORMAT
    )
}

impl CameraPipeline {
    /// Build and start the pipeline
    pub fn start(device_path: Option<&str>) -> Result<Self, CaptureError> {
        gstreamer::init().map_err(|e| CaptureError::Backend(e.to_string()))?;

        let description = launch_description(device_path);
        info!(pipeline = %description, "Creating camera pipeline");

        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| CaptureError::Backend(e.to_string()))?
            .downcast::<gstreamer::Pipeline>()
            .map_err(|_| CaptureError::Backend("Launch result is not a pipeline".to_string()))?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| CaptureError::Backend("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| CaptureError::Backend("Failed to cast appsink".to_string()))?;

        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", pipeline::MAX_BUFFERS);
        appsink.set_property("drop", true);

        let latest: FrameSlot = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&latest);

        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_num = FRAME_COUNTER.fetch_add(1, Ordering::Relaxed);

                    let sample = appsink.pull_sample().map_err(|_| gstreamer::FlowError::Eos)?;
                    let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;
                    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
                    let video_info =
                        VideoInfo::from_caps(caps).map_err(|_| gstreamer::FlowError::Error)?;
                    let map = buffer
                        .map_readable()
                        .map_err(|_| gstreamer::FlowError::Error)?;

                    let frame = CameraFrame {
                        width: video_info.width(),
                        height: video_info.height(),
                        stride: video_info.stride()[0] as u32,
                        data: Arc::from(map.as_slice()),
                        captured_at: Instant::now(),
                    };

                    if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                        debug!(
                            frame = frame_num,
                            width = frame.width,
                            height = frame.height,
                            stride = frame.stride,
                            "Preview frame"
                        );
                    }

                    match slot.lock() {
                        Ok(mut guard) => *guard = Some(Arc::new(frame)),
                        Err(_) => {
                            error!("Frame slot poisoned");
                            return Err(gstreamer::FlowError::Error);
                        }
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        pipeline
            .set_state(gstreamer::State::Playing)
            .map_err(|e| CaptureError::Backend(format!("Failed to start pipeline: {}", e)))?;

        let (_, state, _) = pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::START_TIMEOUT_SECS,
        ));
        if state != gstreamer::State::Playing {
            warn!(?state, "Pipeline did not reach PLAYING yet");
        }

        info!("Camera pipeline running");
        Ok(Self { pipeline, latest })
    }

    /// Newest frame delivered by the camera
    pub fn latest_frame(&self) -> Option<Arc<CameraFrame>> {
        self.latest.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Drop for CameraPipeline {
    fn drop(&mut self) {
        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            warn!(error = %e, "Failed to stop camera pipeline");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_description_for_device() {
        assert_eq!(
            launch_description(Some("/dev/video2")),
            "v4l2src device=\"/dev/video2\" ! videoconvert ! video/x-raw,format=RGB ! appsink name=sink"
        );
    }

    #[test]
    fn test_launch_description_default_source() {
        assert!(launch_description(None).starts_with("autovideosrc ! "));
    }
}
