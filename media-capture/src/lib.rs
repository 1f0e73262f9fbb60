//! # Media Capture
//!
//! Photo capture, preview and upload coordination for form-based clients.
//!
//! This crate provides the media side of a report form:
//! - A bounded registry of attached photos (at most [`MAX_ITEMS`])
//! - Previews that are released together with their item
//! - Concurrent batch uploads with all-or-nothing rollback
//! - Submission gating until every photo has a remote reference
//! - A camera session that always releases the device
//!
//! ## Platform Separation
//!
//! The remote store, the form endpoint and the camera are traits
//! ([`MediaUploader`], [`FormSubmitter`], [`CameraDevice`]). The `http`
//! feature adds a reqwest uploader, the `picker` feature adds the Android
//! gallery picker and system camera.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use media_capture::{HttpMediaUploader, HttpUploadConfig, UploadCoordinator};
//!
//! let uploader = HttpMediaUploader::new(&HttpUploadConfig::default())?;
//! let (coordinator, mut notices) = UploadCoordinator::new(uploader);
//!
//! coordinator.add_items(files).await?;
//! let refs = coordinator.snapshot_for_submission()?;
//! ```

pub mod camera;
pub mod capture;
pub mod coordinator;
pub mod error;
pub mod models;
pub mod notice;
pub mod platform;
pub mod preview;
pub mod registry;
pub mod submission;
pub mod upload;

pub use camera::{CameraDevice, CameraSession, CameraState, CameraStream, SessionOutcome};
pub use capture::{load_files, MediaCapture};
pub use coordinator::UploadCoordinator;
pub use error::{CameraError, MediaError, SubmitError, UploadError};
pub use models::{CaptureConfig, Facing, ItemId, ItemView, LocalPayload, RemoteRef, MAX_ITEMS};
pub use notice::Notice;
pub use platform::{pick_gallery_paths, platform_camera, PickerError, PlatformCamera};
pub use registry::{AppendOutcome, MediaRegistry};
pub use submission::{build_payload, FormSubmitter, GALLERY_FIELD};
pub use upload::MediaUploader;

#[cfg(feature = "http")]
pub use upload::{HttpMediaUploader, HttpUploadConfig};
