// Wires the media-capture crate to this app: HTTP uploader, platform camera
// and the system gallery picker.

use media_capture::{
    pick_gallery_paths, platform_camera, CameraSession, HttpMediaUploader, LocalPayload,
    MediaCapture, Notice, PlatformCamera, UploadCoordinator,
};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::AppConfig;
use crate::error::AppError;

pub type AppCapture = MediaCapture<HttpMediaUploader, PlatformCamera>;

/// Builds the capture front-end for one report form
pub fn new_capture(
    config: &AppConfig,
) -> Result<(AppCapture, UnboundedReceiver<Notice>), AppError> {
    let uploader = HttpMediaUploader::new(&config.upload_config())?;
    let (coordinator, notices) = UploadCoordinator::new(uploader);
    let camera = CameraSession::new(platform_camera(), config.camera.clone());
    Ok((MediaCapture::new(coordinator, camera), notices))
}

/// Opens the system picker and reads every selected image
///
/// An empty result means the user picked nothing.
pub async fn pick_gallery_files() -> Result<Vec<LocalPayload>, AppError> {
    let paths = tokio::task::spawn_blocking(pick_gallery_paths)
        .await
        .map_err(|e| AppError::Filesystem(std::io::Error::other(e)))??;
    log::debug!("Picker returned {} path(s)", paths.len());
    Ok(media_capture::load_files(paths).await)
}
