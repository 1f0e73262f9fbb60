//! User-visible notifications emitted by the coordinator.
//!
//! Wording here is the default English text; the UI is free to show its own.

use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    CapacityExceeded { accepted: usize, dropped: usize },
    CameraPermissionDenied(String),
    CaptureFailed(String),
    UploadBatchSucceeded { count: usize },
    UploadBatchFailed { count: usize },
    ItemRemoved,
    SubmissionNotReady { pending: usize },
    SubmissionInProgress,
    SubmissionSucceeded,
    SubmissionFailed(String),
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::CapacityExceeded { accepted: 0, .. } => {
                format!("Maximum {} photos allowed", crate::models::MAX_ITEMS)
            }
            Notice::CapacityExceeded { accepted, dropped } => format!(
                "Only {} photo(s) added, {} skipped (maximum {})",
                accepted,
                dropped,
                crate::models::MAX_ITEMS
            ),
            Notice::CameraPermissionDenied(_) => {
                "Could not access camera. Please check permissions.".to_string()
            }
            Notice::CaptureFailed(_) => "Failed to capture photo".to_string(),
            Notice::UploadBatchSucceeded { .. } => "Images uploaded successfully".to_string(),
            Notice::UploadBatchFailed { .. } => {
                "Failed to upload some images. Please try again.".to_string()
            }
            Notice::ItemRemoved => "Image removed".to_string(),
            Notice::SubmissionNotReady { .. } => {
                "Please wait until images finish uploading".to_string()
            }
            Notice::SubmissionInProgress => "Creating report...".to_string(),
            Notice::SubmissionSucceeded => "Report created successfully".to_string(),
            Notice::SubmissionFailed(_) => "Failed to create report. Please try again.".to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(
            self,
            Notice::UploadBatchSucceeded { .. }
                | Notice::ItemRemoved
                | Notice::SubmissionInProgress
                | Notice::SubmissionSucceeded
        )
    }
}

/// Sends a notice, ignoring a closed receiver (UI already gone)
pub(crate) fn emit(tx: &UnboundedSender<Notice>, notice: Notice) {
    log::debug!("Notice: {:?}", notice);
    let _ = tx.send(notice);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message() {
        let full = Notice::CapacityExceeded {
            accepted: 0,
            dropped: 3,
        };
        assert_eq!(full.message(), "Maximum 10 photos allowed");

        let partial = Notice::CapacityExceeded {
            accepted: 2,
            dropped: 1,
        };
        assert!(partial.message().contains("2 photo(s) added"));
        assert!(partial.is_error());
    }

    #[test]
    fn test_success_notices_are_not_errors() {
        assert!(!Notice::SubmissionSucceeded.is_error());
        assert!(!Notice::UploadBatchSucceeded { count: 1 }.is_error());
        assert!(Notice::UploadBatchFailed { count: 1 }.is_error());
    }
}
