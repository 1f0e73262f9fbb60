use media_capture::{MediaError, PickerError, SubmitError, UploadError};
use std::fmt;

/// Central error types for the reporting app
#[derive(Debug)]
pub enum AppError {
    /// Configuration file could not be parsed
    Config(toml::de::Error),
    /// Filesystem error
    Filesystem(std::io::Error),
    /// HTTP client or transport error
    Http(reqwest::Error),
    /// Capture, upload or submission failure
    Media(MediaError),
    /// Upload client could not be set up
    Upload(UploadError),
    /// Validation error (e.g. invalid inputs)
    Validation(String),
    /// Permission denied (e.g. camera, gallery)
    PermissionDenied(String),
    /// Feature not available on this platform
    PlatformNotSupported(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "Config error: {}", e),
            AppError::Filesystem(e) => write!(f, "Filesystem error: {}", e),
            AppError::Http(e) => write!(f, "HTTP error: {}", e),
            AppError::Media(e) => write!(f, "{}", e),
            AppError::Upload(e) => write!(f, "Upload error: {}", e),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            AppError::PlatformNotSupported(msg) => write!(f, "Platform not supported: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

// Conversions from other error types
impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Filesystem(e)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Http(e)
    }
}

impl From<MediaError> for AppError {
    fn from(e: MediaError) -> Self {
        AppError::Media(e)
    }
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        AppError::Upload(e)
    }
}

impl From<SubmitError> for AppError {
    fn from(e: SubmitError) -> Self {
        AppError::Media(e.into())
    }
}

impl From<PickerError> for AppError {
    fn from(e: PickerError) -> Self {
        match e {
            PickerError::PlatformNotSupported(msg) => AppError::PlatformNotSupported(msg),
            PickerError::PermissionDenied(msg)
            | PickerError::Timeout(msg)
            | PickerError::Cancelled(msg)
            | PickerError::Other(msg) => AppError::PermissionDenied(msg),
        }
    }
}

/// User-friendly error messages for UI
impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(_) => "The configuration file is invalid.".to_string(),
            AppError::Filesystem(_) => {
                "Error accessing files. Please check app permissions.".to_string()
            }
            AppError::Http(_) => "Network error. Please check your connection.".to_string(),
            AppError::Media(e) => e.notice().message(),
            AppError::Upload(_) => "Photo uploads are unavailable right now.".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::PermissionDenied(msg) => format!("Permission required: {}", msg),
            AppError::PlatformNotSupported(_) => {
                "This feature is only available on Android.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picker_errors_map_to_permission_or_platform() {
        let e: AppError = PickerError::Cancelled("closed".into()).into();
        assert!(matches!(e, AppError::PermissionDenied(_)));
        let e: AppError = PickerError::PlatformNotSupported("desktop".into()).into();
        assert!(matches!(e, AppError::PlatformNotSupported(_)));
    }

    #[test]
    fn test_media_error_uses_notice_text() {
        let e = AppError::from(MediaError::SubmissionInProgress);
        assert_eq!(e.user_message(), MediaError::SubmissionInProgress.notice().message());
    }

    #[test]
    fn test_submit_error_becomes_submission_failure() {
        let e = AppError::from(SubmitError::Rejected(500));
        assert!(matches!(e, AppError::Media(MediaError::SubmissionFailed(_))));
    }
}
