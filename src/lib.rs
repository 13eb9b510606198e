// SPDX-License-Identifier: GPL-3.0-only

//! Photo Strip - a camera capture screen
//!
//! Previews a live camera feed, captures photos up to a fixed limit, asks for
//! confirmation of every shot and keeps the confirmed ones in an ordered strip
//! that can be reviewed and pruned.
//!
//! - [`app`]: the capture session controller and its presentation model
//! - [`backends`]: camera permission, preview and capture
//! - [`storage`]: moving confirmed photos into the photos directory
//! - [`terminal`]: the interactive screen
//! - [`config`]: user configuration

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod flash;
pub mod storage;
pub mod terminal;

pub use app::{CaptureSession, Message, Screen};
pub use config::Config;
pub use constants::MAX_PHOTOS;
pub use flash::FlashMode;
