// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the capture screen
//!
//! Every error leaves the session in a recoverable state. The controller turns
//! them into a [`Notice`](crate::app::Notice) instead of propagating them to
//! the event loop.

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Camera access has not been granted
    PermissionDenied,
    /// The capture capability failed to produce a frame
    Capture(CaptureError),
    /// Moving a confirmed photo to permanent storage failed
    Persist(PersistError),
    /// The photo strip is full
    CapacityExceeded { limit: usize },
    /// A thumbnail index outside the saved photo list
    InvalidSelection { index: usize, len: usize },
    /// Configuration could not be read or written
    Config(String),
}

/// Capture-specific errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The preview pipeline has not been started
    NotStarted,
    /// Pipeline is running but no frame has arrived yet
    NoFrameAvailable,
    /// GStreamer or device failure
    Backend(String),
    /// Encoding the frame to JPEG failed
    Encoding(String),
}

/// Errors raised while persisting a confirmed photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    /// Destination directory could not be created
    Directory(String),
    /// Rename and copy fallback both failed
    Move(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::PermissionDenied => write!(f, "Camera permission not granted"),
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Persist(e) => write!(f, "Save error: {}", e),
            AppError::CapacityExceeded { limit } => {
                write!(f, "You've reached the limit of {} photos.", limit)
            }
            AppError::InvalidSelection { index, len } => {
                write!(f, "Photo {} does not exist ({} saved)", index, len)
            }
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::NotStarted => write!(f, "Camera is not running"),
            CaptureError::NoFrameAvailable => write!(f, "No frame available for capture"),
            CaptureError::Backend(msg) => write!(f, "Camera failure: {}", msg),
            CaptureError::Encoding(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Directory(msg) => write!(f, "Cannot create photo directory: {}", msg),
            PersistError::Move(msg) => write!(f, "Cannot move photo: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for PersistError {}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<PersistError> for AppError {
    fn from(err: PersistError) -> Self {
        AppError::Persist(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<image::ImageError> for CaptureError {
    fn from(err: image::ImageError) -> Self {
        CaptureError::Encoding(err.to_string())
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::Encoding(err.to_string())
    }
}
