// SPDX-License-Identifier: GPL-3.0-only

//! Hardware-facing capabilities
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            CaptureSession (app)             │
//! └──────┬──────────────────┬───────────────────┘
//!        │                  │
//! ┌──────┴────────┐  ┌──────┴──────────────────┐
//! │  Permission   │  │  Camera (GStreamer)     │
//! │ (/dev/video*) │  │  preview + capture      │
//! └───────────────┘  └─────────────────────────┘
//! ```
//!
//! Storage lives in [`crate::storage`].

pub mod camera;
