// SPDX-License-Identifier: GPL-3.0-only

//! Camera device and frame types

use std::sync::Arc;
use std::time::{Duration, Instant};

/// A camera found by enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Human-readable name reported by the device monitor
    pub name: String,
    /// V4L2 node such as `/dev/video0`, when the provider exposes one
    pub path: Option<String>,
}

/// One packed RGB frame from the preview pipeline
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Bytes per row, may include padding
    pub stride: u32,
    pub data: Arc<[u8]>,
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Whether the frame was produced more than `max_age` before `now`
    pub fn is_stale(&self, now: Instant, max_age: Duration) -> bool {
        now.saturating_duration_since(self.captured_at) > max_age
    }

    /// RGB value at (x, y), clamped to the frame bounds
    pub fn rgb_at(&self, x: u32, y: u32) -> (u8, u8, u8) {
        if self.width == 0 || self.height == 0 {
            return (0, 0, 0);
        }
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let idx = (y * self.stride + x * 3) as usize;
        match self.data.get(idx..idx + 3) {
            Some(px) => (px[0], px[1], px[2]),
            None => (0, 0, 0),
        }
    }

    /// Copy into a tightly packed image, dropping row padding
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        let row_len = (self.width * 3) as usize;
        let mut packed = Vec::with_capacity(row_len * self.height as usize);
        for row in 0..self.height as usize {
            let start = row * self.stride as usize;
            packed.extend_from_slice(self.data.get(start..start + row_len)?);
        }
        image::RgbImage::from_raw(self.width, self.height, packed)
    }
}
