// Platform backends for the gallery picker and the camera device.
//
// On Android (feature `picker`) both go through the host activity via JNI.
// Every other platform gets stubs that fail with a platform error, so the
// capture flow reports "camera unavailable" instead of hanging.

use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::camera::{CameraDevice, CameraStream};
use crate::error::CameraError;
use crate::models::CaptureConfig;

#[cfg(all(target_os = "android", feature = "picker"))]
mod android;

#[cfg(all(target_os = "android", feature = "picker"))]
pub use android::{AndroidCamera, AndroidPickerConfig};

#[derive(Debug, Clone)]
pub enum PickerError {
    PermissionDenied(String),
    Timeout(String),
    Cancelled(String),
    PlatformNotSupported(String),
    Other(String),
}

impl std::fmt::Display for PickerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PickerError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            PickerError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            PickerError::Cancelled(msg) => write!(f, "Cancelled: {}", msg),
            PickerError::PlatformNotSupported(msg) => write!(f, "Platform not supported: {}", msg),
            PickerError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for PickerError {}

impl From<PickerError> for CameraError {
    fn from(e: PickerError) -> Self {
        match e {
            PickerError::PermissionDenied(msg) => CameraError::PermissionDenied(msg),
            PickerError::PlatformNotSupported(msg) => CameraError::PlatformNotSupported(msg),
            PickerError::Timeout(msg) | PickerError::Cancelled(msg) | PickerError::Other(msg) => {
                CameraError::Unavailable(msg)
            }
        }
    }
}

/// Camera backend for platforms without capture support
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableCamera;

/// Uninhabited: [`UnavailableCamera`] never yields a stream
pub enum NoStream {}

impl CameraStream for NoStream {
    async fn grab_frame(&mut self) -> Result<DynamicImage, CameraError> {
        match *self {}
    }

    fn stop(&mut self) {
        match *self {}
    }
}

impl CameraDevice for UnavailableCamera {
    type Stream = NoStream;

    async fn acquire(&self, _config: &CaptureConfig) -> Result<NoStream, CameraError> {
        Err(CameraError::PlatformNotSupported(
            "Camera not available on this platform".to_string(),
        ))
    }
}

/// A file written by a platform activity, deleted once dropped
#[derive(Debug)]
pub struct TempFrameFile {
    path: Option<PathBuf>,
}

impl TempFrameFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Deletes the file now; later calls do nothing
    pub fn remove(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                log::warn!("Could not remove camera file {:?}: {}", path, e);
            }
        }
    }
}

impl Drop for TempFrameFile {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Tells a blocking poller that nobody waits for its result anymore
#[derive(Debug, Default, Clone)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Cancels the flag when the returned guard is dropped
    pub fn guard(&self) -> CancelOnDrop {
        CancelOnDrop(self.clone())
    }
}

/// Held by the waiting side; dropping it (timeout, abort) stops the poller
#[derive(Debug)]
pub struct CancelOnDrop(CancelFlag);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Number of poll rounds that fit in `window`, at least one
pub fn poll_attempts(window: Duration, interval: Duration) -> u32 {
    if interval.is_zero() {
        return 1;
    }
    let rounds = window.as_millis() / interval.as_millis().max(1);
    u32::try_from(rounds).unwrap_or(u32::MAX).max(1)
}

#[cfg(all(target_os = "android", feature = "picker"))]
pub type PlatformCamera = AndroidCamera;

#[cfg(not(all(target_os = "android", feature = "picker")))]
pub type PlatformCamera = UnavailableCamera;

/// The camera backend of the current platform
pub fn platform_camera() -> PlatformCamera {
    PlatformCamera::default()
}

/// Lets the user pick any number of images from the system gallery
///
/// Blocks until the picker returns; call it from a blocking worker.
pub fn pick_gallery_paths() -> Result<Vec<PathBuf>, PickerError> {
    #[cfg(all(target_os = "android", feature = "picker"))]
    {
        android::pick_images(&AndroidPickerConfig::default())
    }

    #[cfg(not(all(target_os = "android", feature = "picker")))]
    {
        Err(PickerError::PlatformNotSupported(
            "Multi image picker not available on this platform".to_string(),
        ))
    }
}
