//! Camera device session.
//!
//! A [`CameraSession`] owns at most one live stream from a [`CameraDevice`].
//! The stream is wrapped in an [`ActiveStream`] guard whose `Drop` stops the
//! hardware, so every exit path (capture, cancel, error, timeout or a dropped
//! future) releases the device.
//!
//! ```text
//! Idle -> Acquiring -> Active -> Capturing -> Idle
//!             |          |
//!             +-> Idle   +-> Idle (cancel / error)
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::future::Future;

use crate::error::{CameraError, MediaError};
use crate::models::{CaptureConfig, LocalPayload};

pub trait CameraStream: Send {
    /// Grabs the current frame of the live stream
    fn grab_frame(&mut self) -> impl Future<Output = Result<DynamicImage, CameraError>> + Send;

    /// Releases the hardware; must be safe to call more than once
    fn stop(&mut self);
}

pub trait CameraDevice: Send + Sync {
    type Stream: CameraStream + 'static;

    fn acquire(
        &self,
        config: &CaptureConfig,
    ) -> impl Future<Output = Result<Self::Stream, CameraError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    Idle,
    Acquiring,
    Active,
    Capturing,
}

/// How the last capture attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Captured,
    Cancelled,
    Failed,
}

/// Live stream that is stopped when dropped
pub struct ActiveStream<S: CameraStream> {
    stream: Option<S>,
}

impl<S: CameraStream> ActiveStream<S> {
    fn new(stream: S) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    fn get_mut(&mut self) -> Option<&mut S> {
        self.stream.as_mut()
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            log::debug!("Camera released");
        }
    }
}

impl<S: CameraStream> Drop for ActiveStream<S> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Puts the session back to `Idle` unless the transition was committed
struct StateReset<'a> {
    state: &'a mut CameraState,
    armed: bool,
}

impl<'a> StateReset<'a> {
    fn enter(state: &'a mut CameraState, next: CameraState) -> Self {
        log::debug!("Camera: {:?} -> {:?}", state, next);
        *state = next;
        Self { state, armed: true }
    }

    fn commit(mut self, next: CameraState) {
        log::debug!("Camera: {:?} -> {:?}", self.state, next);
        *self.state = next;
        self.armed = false;
    }
}

impl Drop for StateReset<'_> {
    fn drop(&mut self) {
        if self.armed {
            log::debug!("Camera: {:?} -> Idle", self.state);
            *self.state = CameraState::Idle;
        }
    }
}

pub struct CameraSession<D: CameraDevice> {
    device: D,
    config: CaptureConfig,
    state: CameraState,
    stream: Option<ActiveStream<D::Stream>>,
    last_outcome: Option<SessionOutcome>,
}

impl<D: CameraDevice> CameraSession<D> {
    pub fn new(device: D, config: CaptureConfig) -> Self {
        Self {
            device,
            config,
            state: CameraState::Idle,
            stream: None,
            last_outcome: None,
        }
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == CameraState::Active
    }

    pub fn last_outcome(&self) -> Option<SessionOutcome> {
        self.last_outcome
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Acquires the camera; fails with `CameraBusy` unless the session is idle
    pub async fn start(&mut self) -> Result<(), MediaError> {
        if self.state != CameraState::Idle {
            return Err(MediaError::CameraBusy);
        }

        let reset = StateReset::enter(&mut self.state, CameraState::Acquiring);
        let acquired =
            tokio::time::timeout(self.config.acquire_timeout(), self.device.acquire(&self.config))
                .await;

        let error = match acquired {
            Ok(Ok(stream)) => {
                self.stream = Some(ActiveStream::new(stream));
                reset.commit(CameraState::Active);
                self.last_outcome = None;
                return Ok(());
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!(
                "no camera access after {}s",
                self.config.acquire_timeout_secs
            ),
        };
        drop(reset);

        log::warn!("Camera acquisition failed: {}", error);
        self.last_outcome = Some(SessionOutcome::Failed);
        Err(MediaError::DeviceAcquisitionFailed(error))
    }

    /// Grabs a frame for the live view without leaving `Active`
    pub async fn preview_frame(&mut self) -> Result<DynamicImage, MediaError> {
        let frame = match self.stream.as_mut().and_then(|s| s.get_mut()) {
            Some(stream) if self.state == CameraState::Active => stream.grab_frame().await,
            _ => return Err(not_active()),
        };
        frame.map_err(|e| {
            self.abort();
            MediaError::CaptureEncodingFailed(e.to_string())
        })
    }

    /// Takes exactly one frame, releases the camera and encodes the frame as JPEG
    pub async fn capture(&mut self) -> Result<LocalPayload, MediaError> {
        if self.state != CameraState::Active {
            return Err(not_active());
        }
        let Some(mut active) = self.stream.take() else {
            self.state = CameraState::Idle;
            return Err(not_active());
        };

        let frame = {
            let _reset = StateReset::enter(&mut self.state, CameraState::Capturing);
            let frame = match active.get_mut() {
                Some(stream) => stream.grab_frame().await,
                None => Err(CameraError::Unavailable("stream already released".to_string())),
            };
            active.release();
            frame
        };

        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                self.last_outcome = Some(SessionOutcome::Failed);
                return Err(MediaError::CaptureEncodingFailed(e.to_string()));
            }
        };

        match encode_frame(frame, self.config.jpeg_quality).await {
            Ok(payload) => {
                log::info!("Captured {} ({} bytes)", payload.name, payload.len());
                self.last_outcome = Some(SessionOutcome::Captured);
                Ok(payload)
            }
            Err(e) => {
                self.last_outcome = Some(SessionOutcome::Failed);
                Err(e)
            }
        }
    }

    /// Releases the camera without producing an item; idempotent
    pub fn cancel(&mut self) -> bool {
        let was_running = self.state != CameraState::Idle || self.stream.is_some();
        if let Some(mut active) = self.stream.take() {
            active.release();
        }
        self.state = CameraState::Idle;
        if was_running {
            self.last_outcome = Some(SessionOutcome::Cancelled);
        }
        was_running
    }

    fn abort(&mut self) {
        if let Some(mut active) = self.stream.take() {
            active.release();
        }
        self.state = CameraState::Idle;
        self.last_outcome = Some(SessionOutcome::Failed);
    }
}

fn not_active() -> MediaError {
    MediaError::CaptureEncodingFailed("camera is not active".to_string())
}

/// Encodes a frame off the async thread
pub async fn encode_frame(frame: DynamicImage, quality: u8) -> Result<LocalPayload, MediaError> {
    tokio::task::spawn_blocking(move || encode_jpeg(&frame, quality))
        .await
        .map_err(|e| MediaError::CaptureEncodingFailed(format!("Task join error: {}", e)))?
}

/// Lossy JPEG encoding named `photo_<unix-millis>.jpg`
pub fn encode_jpeg(frame: &DynamicImage, quality: u8) -> Result<LocalPayload, MediaError> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(MediaError::CaptureEncodingFailed("empty frame".to_string()));
    }
    let rgb = frame.to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| MediaError::CaptureEncodingFailed(format!("JPEG encoding failed: {}", e)))?;

    let name = format!("photo_{}.jpg", chrono::Utc::now().timestamp_millis());
    Ok(LocalPayload::new(name, "image/jpeg", bytes))
}
