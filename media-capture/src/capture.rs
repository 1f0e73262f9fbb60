//! "Take photo" / "Choose from gallery" entry points.
//!
//! Both paths end in a batch of [`LocalPayload`]s handed to the
//! [`UploadCoordinator`]. Picking either path closes the action menu.

use std::path::PathBuf;

use crate::camera::{CameraDevice, CameraSession, CameraState};
use crate::coordinator::UploadCoordinator;
use crate::error::MediaError;
use crate::models::LocalPayload;
use crate::notice::Notice;
use crate::registry::AppendOutcome;
use crate::upload::MediaUploader;

pub struct MediaCapture<U, D: CameraDevice> {
    coordinator: UploadCoordinator<U>,
    camera: CameraSession<D>,
    menu_open: bool,
}

impl<U: MediaUploader + 'static, D: CameraDevice> MediaCapture<U, D> {
    pub fn new(coordinator: UploadCoordinator<U>, camera: CameraSession<D>) -> Self {
        Self {
            coordinator,
            camera,
            menu_open: false,
        }
    }

    pub fn coordinator(&self) -> &UploadCoordinator<U> {
        &self.coordinator
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn camera_state(&self) -> CameraState {
        self.camera.state()
    }

    /// Adding is offered only while nothing uploads and there is room left
    pub fn can_add(&self) -> bool {
        !self.coordinator.is_uploading() && !self.coordinator.is_full()
    }

    /// Shows the action sheet; refused with a capacity notice when full
    pub fn open_menu(&mut self) -> bool {
        if self.coordinator.is_full() {
            self.coordinator.notify(Notice::CapacityExceeded {
                accepted: 0,
                dropped: 0,
            });
            self.menu_open = false;
            return false;
        }
        self.menu_open = self.can_add() && self.camera.state() == CameraState::Idle;
        self.menu_open
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    /// Forwards every selected file as one batch
    pub async fn choose_from_gallery(
        &mut self,
        files: Vec<LocalPayload>,
    ) -> Result<AppendOutcome, MediaError> {
        self.menu_open = false;
        log::debug!("Gallery selection of {} file(s)", files.len());
        self.coordinator.add_items(files).await
    }

    /// Opens the camera; on failure the user is notified and nothing is added
    pub async fn take_photo(&mut self) -> Result<(), MediaError> {
        self.menu_open = false;
        if self.coordinator.is_full() {
            return Err(self.report(MediaError::CapacityExceeded {
                accepted: 0,
                dropped: 1,
            }));
        }
        self.camera.start().await.map_err(|e| self.report(e))
    }

    /// Takes the frame and uploads it as a single-item batch
    ///
    /// The camera is released before the upload starts, whatever its outcome.
    pub async fn capture(&mut self) -> Result<AppendOutcome, MediaError> {
        let payload = self.camera.capture().await.map_err(|e| self.report(e))?;
        self.coordinator.add_items(vec![payload]).await
    }

    pub fn cancel_camera(&mut self) -> bool {
        self.camera.cancel()
    }

    fn report(&self, err: MediaError) -> MediaError {
        self.coordinator.notify(err.notice());
        err
    }
}

/// Reads picked files off the async thread; unreadable files are skipped
pub async fn load_files(paths: Vec<PathBuf>) -> Vec<LocalPayload> {
    let loaded = tokio::task::spawn_blocking(move || {
        paths
            .iter()
            .filter_map(|path| match LocalPayload::from_path(path) {
                Ok(payload) => Some(payload),
                Err(e) => {
                    log::warn!("Skipping unreadable file {:?}: {}", path, e);
                    None
                }
            })
            .collect::<Vec<_>>()
    })
    .await;

    loaded.unwrap_or_else(|e| {
        log::error!("Loading picked files failed: {}", e);
        Vec::new()
    })
}
