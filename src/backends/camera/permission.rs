// SPDX-License-Identifier: GPL-3.0-only

//! Camera access check based on V4L2 device-node permissions
//!
//! On a desktop Linux system "permission" means the user can open the video
//! node, usually through membership of the `video` group. Access cannot be
//! granted from inside the process, so a request re-checks after the user has
//! fixed it at OS level.

use super::PermissionService;
use crate::constants::app_info;
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// TODO: request access through the XDG camera portal when running as a Flatpak
pub struct DevicePermission {
    /// Configured node; `None` checks every `/dev/video*`
    device: Option<PathBuf>,
    dev_dir: PathBuf,
}

impl DevicePermission {
    pub fn new(device: Option<PathBuf>) -> Self {
        Self {
            device,
            dev_dir: PathBuf::from("/dev"),
        }
    }

    /// Check nodes under a different directory
    pub fn with_dev_dir(device: Option<PathBuf>, dev_dir: PathBuf) -> Self {
        Self { device, dev_dir }
    }

    fn candidate_nodes(&self) -> Vec<PathBuf> {
        if let Some(device) = &self.device {
            return vec![device.clone()];
        }

        let Ok(entries) = std::fs::read_dir(&self.dev_dir) else {
            return Vec::new();
        };

        let mut nodes: Vec<PathBuf> = entries
            .flatten()
            .filter(|entry| entry.file_name().to_string_lossy().starts_with("video"))
            .map(|entry| entry.path())
            .collect();
        nodes.sort();
        nodes
    }

    fn check(&self) -> bool {
        let nodes = self.candidate_nodes();
        if nodes.is_empty() {
            // Nothing to gate on, e.g. PipeWire-only setups
            debug!("No V4L2 nodes found, not gating on device permissions");
            return true;
        }

        let accessible = nodes.iter().any(|node| can_read_write(node));
        if !accessible {
            warn!(nodes = ?nodes, "Camera nodes not accessible; {}", access_hint());
        }
        accessible
    }
}

impl PermissionService for DevicePermission {
    fn has_permission(&self) -> bool {
        self.check()
    }

    async fn request_permission(&self) -> bool {
        info!("Re-checking camera device permissions");
        self.check()
    }
}

/// What the user can do to fix a denied check
fn access_hint() -> &'static str {
    if app_info::is_flatpak() {
        "allow device access with 'flatpak override --user --device=all'"
    } else {
        "add the user to the 'video' group"
    }
}

fn can_read_write(path: &Path) -> bool {
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string for the duration of the call
    unsafe { libc::access(c_path.as_ptr(), libc::R_OK | libc::W_OK) == 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dev_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("photo-strip-dev-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_no_nodes_is_not_gated() {
        let dir = scratch_dev_dir();
        let permission = DevicePermission::with_dev_dir(None, dir.clone());
        assert!(permission.has_permission());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_accessible_node_grants() {
        let dir = scratch_dev_dir();
        std::fs::write(dir.join("video0"), b"").unwrap();
        std::fs::write(dir.join("null"), b"").unwrap();

        let permission = DevicePermission::with_dev_dir(None, dir.clone());
        assert_eq!(permission.candidate_nodes(), vec![dir.join("video0")]);
        assert!(permission.has_permission());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_missing_configured_node_denies() {
        let dir = scratch_dev_dir();
        let permission = DevicePermission::new(Some(dir.join("video9")));
        assert!(!permission.request_permission().await);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_access_hint_matches_sandbox() {
        let hint = access_hint();
        if app_info::is_flatpak() {
            assert!(hint.contains("--device=all"));
        } else {
            assert!(hint.contains("'video' group"));
        }
    }
}
