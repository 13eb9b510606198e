// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the capture session controller

use chrono::Local;
use photo_strip::MAX_PHOTOS;
use photo_strip::app::{CaptureSession, Controls, Message, PermissionState, Screen, TransientPhoto};
use photo_strip::backends::camera::{CaptureDevice, PermissionService};
use photo_strip::errors::{CaptureError, PersistError};
use photo_strip::flash::FlashMode;
use photo_strip::storage::{FsPhotoStore, PhotoStore};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
struct FakePermission {
    granted: AtomicBool,
    grant_on_request: AtomicBool,
    requests: AtomicUsize,
}

impl PermissionService for FakePermission {
    fn has_permission(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    async fn request_permission(&self) -> bool {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let granted = self.grant_on_request.load(Ordering::SeqCst);
        self.granted.store(granted, Ordering::SeqCst);
        granted
    }
}

#[derive(Default)]
struct FakeCamera {
    fail: AtomicBool,
    captures: AtomicUsize,
    flash_modes: Mutex<Vec<FlashMode>>,
}

impl CaptureDevice for FakeCamera {
    async fn capture_frame(&self, flash: FlashMode) -> Result<TransientPhoto, CaptureError> {
        self.flash_modes.lock().unwrap().push(flash);
        if self.fail.load(Ordering::SeqCst) {
            return Err(CaptureError::Backend("sensor unplugged".into()));
        }
        let n = self.captures.fetch_add(1, Ordering::SeqCst);
        Ok(TransientPhoto {
            path: PathBuf::from(format!("/tmp/fake/{}.jpg", n)),
            created_at: Local::now(),
        })
    }
}

#[derive(Default)]
struct FakeStore {
    fail: AtomicBool,
    moved: Mutex<Vec<(PathBuf, String)>>,
}

impl PhotoStore for FakeStore {
    async fn move_to_permanent(
        &self,
        transient: &Path,
        name: &str,
    ) -> Result<PathBuf, PersistError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PersistError::Move("disk full".into()));
        }
        self.moved
            .lock()
            .unwrap()
            .push((transient.to_path_buf(), name.to_string()));
        Ok(PathBuf::from("/photos").join(name))
    }
}

type Session = CaptureSession<FakePermission, FakeCamera, FakeStore>;

fn new_session(granted: bool) -> Session {
    let permissions = FakePermission::default();
    permissions.granted.store(granted, Ordering::SeqCst);
    CaptureSession::new(
        permissions,
        FakeCamera::default(),
        FakeStore::default(),
        FlashMode::Off,
    )
}

async fn ready_session() -> Session {
    let mut session = new_session(true);
    assert_eq!(session.ensure_permission().await, PermissionState::Granted);
    session
}

async fn capture_and_confirm(session: &mut Session) {
    session.update(Message::Capture).await;
    assert!(matches!(session.screen(), Screen::PreviewingNewCapture { .. }));
    session.update(Message::Confirm).await;
    assert_eq!(session.screen(), &Screen::Idle);
}

#[tokio::test]
async fn test_capture_then_confirm_saves_one_photo() {
    let mut session = ready_session().await;

    session.update(Message::Capture).await;
    let pending = session.pending_photo().cloned().expect("capture should be pending");
    assert_eq!(pending.path, PathBuf::from("/tmp/fake/0.jpg"));

    session.update(Message::Confirm).await;

    assert_eq!(session.screen(), &Screen::Idle);
    assert!(session.pending_photo().is_none());
    assert_eq!(session.saved_photos().len(), 1);
    assert!(session.saved_photos()[0].path.starts_with("/photos"));
    assert!(session.notice().is_none());
}

#[tokio::test]
async fn test_ninth_capture_is_rejected() {
    let mut session = ready_session().await;
    for _ in 0..MAX_PHOTOS {
        capture_and_confirm(&mut session).await;
    }
    assert_eq!(session.saved_photos().len(), MAX_PHOTOS);
    assert!(session.is_full());

    session.update(Message::Capture).await;

    assert_eq!(session.screen(), &Screen::Idle);
    assert_eq!(session.saved_photos().len(), MAX_PHOTOS);
    assert_eq!(session.camera().captures.load(Ordering::SeqCst), MAX_PHOTOS);
    let notice = session.notice().expect("limit notice");
    assert_eq!(notice.title, "Limit Reached");
    assert_eq!(notice.body, "You've reached the limit of 8 photos.");
}

#[tokio::test]
async fn test_delete_frees_a_slot_in_a_full_strip() {
    let mut session = ready_session().await;
    for _ in 0..MAX_PHOTOS {
        capture_and_confirm(&mut session).await;
    }
    session.update(Message::Capture).await;
    assert!(session.notice().is_some());
    session.update(Message::DismissNotice).await;

    session.update(Message::SelectSaved(3)).await;
    session.update(Message::DeleteSaved).await;
    assert_eq!(session.saved_photos().len(), MAX_PHOTOS - 1);
    assert!(!session.is_full());

    session.update(Message::Capture).await;
    assert!(matches!(session.screen(), Screen::PreviewingNewCapture { .. }));
    assert_eq!(session.camera().captures.load(Ordering::SeqCst), MAX_PHOTOS + 1);

    session.update(Message::Confirm).await;
    assert_eq!(session.screen(), &Screen::Idle);
    assert_eq!(session.saved_photos().len(), MAX_PHOTOS);
    assert!(session.notice().is_none());
}

#[tokio::test]
async fn test_delete_removes_selected_and_keeps_order() {
    let mut session = ready_session().await;
    for _ in 0..3 {
        capture_and_confirm(&mut session).await;
    }
    let before: Vec<PathBuf> = session.saved_photos().iter().map(|p| p.path.clone()).collect();

    session.update(Message::SelectSaved(1)).await;
    assert_eq!(session.screen(), &Screen::ReviewingSavedPhoto { selected: 1 });

    session.update(Message::DeleteSaved).await;

    assert_eq!(session.screen(), &Screen::Idle);
    let after: Vec<PathBuf> = session.saved_photos().iter().map(|p| p.path.clone()).collect();
    assert_eq!(after, vec![before[0].clone(), before[2].clone()]);
}

#[tokio::test]
async fn test_retake_discards_pending_photo() {
    let mut session = ready_session().await;
    capture_and_confirm(&mut session).await;

    session.update(Message::Capture).await;
    assert!(session.pending_photo().is_some());

    session.update(Message::Retake).await;

    assert_eq!(session.screen(), &Screen::Idle);
    assert!(session.pending_photo().is_none());
    assert_eq!(session.saved_photos().len(), 1);
    assert_eq!(session.store_moves(), 1);
}

#[tokio::test]
async fn test_close_review_keeps_photos() {
    let mut session = ready_session().await;
    capture_and_confirm(&mut session).await;

    session.update(Message::SelectSaved(0)).await;
    session.update(Message::CloseReview).await;

    assert_eq!(session.screen(), &Screen::Idle);
    assert_eq!(session.saved_photos().len(), 1);
}

#[tokio::test]
async fn test_capture_failure_is_retryable() {
    let mut session = ready_session().await;
    session.camera().fail.store(true, Ordering::SeqCst);

    session.update(Message::Capture).await;
    assert_eq!(session.screen(), &Screen::Idle);
    assert_eq!(session.notice().map(|n| n.title.as_str()), Some("Capture Failed"));

    session.update(Message::DismissNotice).await;
    session.camera().fail.store(false, Ordering::SeqCst);
    session.update(Message::Capture).await;

    assert!(matches!(session.screen(), Screen::PreviewingNewCapture { .. }));
}

#[tokio::test]
async fn test_persist_failure_keeps_pending_photo() {
    let mut session = ready_session().await;
    session.update(Message::Capture).await;
    let pending = session.pending_photo().cloned().unwrap();

    session.store_fail(true);
    session.update(Message::Confirm).await;

    assert_eq!(session.pending_photo(), Some(&pending));
    assert!(session.saved_photos().is_empty());
    assert_eq!(session.notice().map(|n| n.title.as_str()), Some("Save Failed"));

    session.update(Message::DismissNotice).await;
    session.store_fail(false);
    session.update(Message::Confirm).await;

    assert_eq!(session.screen(), &Screen::Idle);
    assert_eq!(session.saved_photos().len(), 1);
}

#[tokio::test]
async fn test_retake_after_persist_failure() {
    let mut session = ready_session().await;
    session.update(Message::Capture).await;
    session.store_fail(true);
    session.update(Message::Confirm).await;
    session.update(Message::DismissNotice).await;

    session.update(Message::Retake).await;

    assert_eq!(session.screen(), &Screen::Idle);
    assert!(session.saved_photos().is_empty());
}

#[tokio::test]
async fn test_flash_mode_reaches_camera() {
    let mut session = ready_session().await;

    session.update(Message::ToggleFlash).await;
    assert_eq!(session.flash_mode(), FlashMode::On);
    session.update(Message::Capture).await;
    session.update(Message::Retake).await;

    session.update(Message::ToggleFlash).await;
    assert_eq!(session.flash_mode(), FlashMode::Off);
    session.update(Message::Capture).await;

    let modes = session.camera().flash_modes.lock().unwrap().clone();
    assert_eq!(modes, vec![FlashMode::On, FlashMode::Off]);
}

#[tokio::test]
async fn test_toggle_flash_works_in_every_screen() {
    let mut session = ready_session().await;
    capture_and_confirm(&mut session).await;

    session.update(Message::SelectSaved(0)).await;
    session.update(Message::ToggleFlash).await;
    assert_eq!(session.flash_mode(), FlashMode::On);
    assert_eq!(session.screen(), &Screen::ReviewingSavedPhoto { selected: 0 });
}

#[tokio::test]
async fn test_inputs_for_other_states_are_ignored() {
    let mut session = ready_session().await;

    session.update(Message::Confirm).await;
    session.update(Message::Retake).await;
    session.update(Message::DeleteSaved).await;
    assert_eq!(session.screen(), &Screen::Idle);
    assert!(session.notice().is_none());

    session.update(Message::Capture).await;
    session.update(Message::SelectSaved(0)).await;
    session.update(Message::Capture).await;
    assert!(matches!(session.screen(), Screen::PreviewingNewCapture { .. }));
    assert_eq!(session.camera().captures.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_notice_blocks_input_until_dismissed() {
    let mut session = ready_session().await;
    session.camera().fail.store(true, Ordering::SeqCst);
    session.update(Message::Capture).await;
    session.camera().fail.store(false, Ordering::SeqCst);

    session.update(Message::Capture).await;
    assert_eq!(session.screen(), &Screen::Idle);

    session.update(Message::DismissNotice).await;
    session.update(Message::Capture).await;
    assert!(matches!(session.screen(), Screen::PreviewingNewCapture { .. }));
}

#[tokio::test]
async fn test_out_of_range_selection_is_an_error() {
    let mut session = ready_session().await;

    match session.controls() {
        Controls::Idle(controls) => assert!(controls.select_saved(0).is_err()),
        other => panic!("expected idle controls, got {}", other.name()),
    }
    assert_eq!(session.screen(), &Screen::Idle);
}

#[tokio::test]
async fn test_controls_match_screen() {
    let mut session = ready_session().await;
    session.update(Message::Capture).await;

    match session.controls() {
        Controls::Previewing(controls) => {
            assert_eq!(controls.pending().path, PathBuf::from("/tmp/fake/0.jpg"));
            controls.retake();
        }
        other => panic!("expected preview controls, got {}", other.name()),
    }
    assert!(matches!(session.controls(), Controls::Idle(_)));
}

#[tokio::test]
async fn test_confirmed_names_are_unique() {
    let mut session = ready_session().await;
    capture_and_confirm(&mut session).await;
    capture_and_confirm(&mut session).await;

    let names: Vec<String> = session
        .saved_photos()
        .iter()
        .map(|p| p.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_ne!(names[0], names[1]);
    assert!(names.iter().all(|n| n.ends_with(".jpg")));
}

#[tokio::test]
async fn test_denied_permission_blocks_capture_until_granted() {
    let mut session = new_session(false);

    assert_eq!(session.ensure_permission().await, PermissionState::Denied);
    assert!(matches!(session.controls(), Controls::Blocked(_)));

    session.update(Message::Capture).await;
    assert_eq!(session.camera().captures.load(Ordering::SeqCst), 0);

    // Still denied: retry raises a notice
    session.update(Message::RequestPermission).await;
    assert_eq!(session.permission(), PermissionState::Denied);
    assert!(session.notice().is_some());
    session.update(Message::DismissNotice).await;

    session.grant_on_request();
    session.update(Message::RequestPermission).await;
    assert_eq!(session.permission(), PermissionState::Granted);

    session.update(Message::Capture).await;
    assert!(matches!(session.screen(), Screen::PreviewingNewCapture { .. }));
}

#[tokio::test]
async fn test_permission_requested_once_at_startup() {
    let mut session = new_session(false);
    session.grant_on_request();

    assert_eq!(session.ensure_permission().await, PermissionState::Granted);
    assert_eq!(session.ensure_permission().await, PermissionState::Granted);
    assert_eq!(session.permission_requests(), 1);
}

#[tokio::test]
async fn test_granted_permission_is_not_requested() {
    let mut session = ready_session().await;
    session.ensure_permission().await;
    assert_eq!(session.permission_requests(), 0);
}

/// Test-only access to the fakes behind the session
trait FakeAccess {
    fn store_moves(&self) -> usize;
    fn store_fail(&self, fail: bool);
    fn grant_on_request(&self);
    fn permission_requests(&self) -> usize;
}

impl FakeAccess for Session {
    fn store_moves(&self) -> usize {
        self.store().moved.lock().unwrap().len()
    }

    fn store_fail(&self, fail: bool) {
        self.store().fail.store(fail, Ordering::SeqCst);
    }

    fn grant_on_request(&self) {
        self.permissions().grant_on_request.store(true, Ordering::SeqCst);
    }

    fn permission_requests(&self) -> usize {
        self.permissions().requests.load(Ordering::SeqCst)
    }
}

/// Writes each capture as a real file under `dir`
struct FileCamera {
    dir: PathBuf,
    captures: AtomicUsize,
}

impl CaptureDevice for FileCamera {
    async fn capture_frame(&self, _flash: FlashMode) -> Result<TransientPhoto, CaptureError> {
        let n = self.captures.fetch_add(1, Ordering::SeqCst);
        let path = self.dir.join(format!("capture-{}.jpg", n));
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CaptureError::Backend(e.to_string()))?;
        tokio::fs::write(&path, b"jpeg")
            .await
            .map_err(|e| CaptureError::Backend(e.to_string()))?;
        Ok(TransientPhoto {
            path,
            created_at: Local::now(),
        })
    }
}

#[tokio::test]
async fn test_delete_leaves_photo_file_on_disk() {
    let root = std::env::temp_dir().join(format!("photo-strip-session-{}", uuid::Uuid::new_v4()));
    let permissions = FakePermission::default();
    permissions.granted.store(true, Ordering::SeqCst);
    let camera = FileCamera {
        dir: root.join("tmp"),
        captures: AtomicUsize::new(0),
    };
    let mut session = CaptureSession::new(
        permissions,
        camera,
        FsPhotoStore::new(root.join("photos")),
        FlashMode::Off,
    );
    assert_eq!(session.ensure_permission().await, PermissionState::Granted);

    session.update(Message::Capture).await;
    session.update(Message::Confirm).await;
    assert_eq!(session.saved_photos().len(), 1);
    let saved = session.saved_photos()[0].path.clone();
    assert!(saved.starts_with(root.join("photos")));
    assert!(saved.exists());

    session.update(Message::SelectSaved(0)).await;
    session.update(Message::DeleteSaved).await;

    assert!(session.saved_photos().is_empty());
    assert_eq!(session.screen(), &Screen::Idle);
    assert_eq!(std::fs::read(&saved).unwrap(), b"jpeg");

    std::fs::remove_dir_all(&root).unwrap();
}
