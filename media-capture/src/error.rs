use crate::notice::Notice;

/// Failures of the capture and upload flow
///
/// Every variant is recoverable. Callers convert it into exactly one
/// [`Notice`] at the boundary where it occurs.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaError {
    /// Incoming batch was truncated (or fully rejected) at the capacity limit
    CapacityExceeded { accepted: usize, dropped: usize },
    /// Camera could not be acquired (permission denied, busy, timed out)
    DeviceAcquisitionFailed(String),
    /// A camera session is already running
    CameraBusy,
    /// No frame could be produced or encoded
    CaptureEncodingFailed(String),
    /// At least one upload of a batch failed; the whole batch was rolled back
    UploadBatchFailed { failed: usize, total: usize },
    /// Uploads are still outstanding
    SubmissionNotReady { pending: usize },
    /// Another submission is still running
    SubmissionInProgress,
    /// The form submission action reported failure
    SubmissionFailed(String),
}

impl std::fmt::Display for MediaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaError::CapacityExceeded { accepted, dropped } => write!(
                f,
                "Capacity exceeded: accepted {}, dropped {}",
                accepted, dropped
            ),
            MediaError::DeviceAcquisitionFailed(msg) => {
                write!(f, "Camera acquisition failed: {}", msg)
            }
            MediaError::CameraBusy => write!(f, "Camera session already active"),
            MediaError::CaptureEncodingFailed(msg) => write!(f, "Capture failed: {}", msg),
            MediaError::UploadBatchFailed { failed, total } => {
                write!(f, "Upload failed for {} of {} items", failed, total)
            }
            MediaError::SubmissionNotReady { pending } => {
                write!(f, "Submission not ready: {} uploads pending", pending)
            }
            MediaError::SubmissionInProgress => write!(f, "Submission already in progress"),
            MediaError::SubmissionFailed(msg) => write!(f, "Submission failed: {}", msg),
        }
    }
}

impl std::error::Error for MediaError {}

impl MediaError {
    /// The single user notification this failure turns into
    pub fn notice(&self) -> Notice {
        match self {
            MediaError::CapacityExceeded { accepted, dropped } => Notice::CapacityExceeded {
                accepted: *accepted,
                dropped: *dropped,
            },
            MediaError::DeviceAcquisitionFailed(msg) => Notice::CameraPermissionDenied(msg.clone()),
            MediaError::CameraBusy => {
                Notice::CameraPermissionDenied("camera is already in use".to_string())
            }
            MediaError::CaptureEncodingFailed(msg) => Notice::CaptureFailed(msg.clone()),
            MediaError::UploadBatchFailed { total, .. } => {
                Notice::UploadBatchFailed { count: *total }
            }
            MediaError::SubmissionNotReady { pending } => {
                Notice::SubmissionNotReady { pending: *pending }
            }
            MediaError::SubmissionInProgress => Notice::SubmissionInProgress,
            MediaError::SubmissionFailed(msg) => Notice::SubmissionFailed(msg.clone()),
        }
    }
}

/// Error returned by a remote media store
#[derive(Debug)]
pub enum UploadError {
    /// Transport level failure (connect, timeout, body)
    Network(String),
    /// Store answered with a non-success status
    Rejected(u16),
    /// Success status but no usable reference in the response
    InvalidResponse(String),
    Other(String),
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadError::Network(e) => write!(f, "Network error: {}", e),
            UploadError::Rejected(status) => write!(f, "Upload rejected with status {}", status),
            UploadError::InvalidResponse(e) => write!(f, "Invalid upload response: {}", e),
            UploadError::Other(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for UploadError {}

/// Error returned by the form submission action
#[derive(Debug)]
pub enum SubmitError {
    Network(String),
    Rejected(u16),
    Other(String),
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::Network(e) => write!(f, "Network error: {}", e),
            SubmitError::Rejected(status) => write!(f, "Server returned status: {}", status),
            SubmitError::Other(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SubmitError {}

/// Error reported by a camera backend
#[derive(Debug, Clone)]
pub enum CameraError {
    PermissionDenied(String),
    Unavailable(String),
    Frame(String),
    PlatformNotSupported(String),
}

impl std::fmt::Display for CameraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            CameraError::Unavailable(msg) => write!(f, "Camera unavailable: {}", msg),
            CameraError::Frame(msg) => write!(f, "Frame error: {}", msg),
            CameraError::PlatformNotSupported(msg) => write!(f, "Platform not supported: {}", msg),
        }
    }
}

impl std::error::Error for CameraError {}

impl From<SubmitError> for MediaError {
    fn from(e: SubmitError) -> Self {
        MediaError::SubmissionFailed(e.to_string())
    }
}
