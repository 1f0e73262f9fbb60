use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::preview::PreviewHandle;

/// Maximum number of photos one form session can hold
pub const MAX_ITEMS: usize = 10;

/// Stable identity of one logical photo
///
/// Upload completions are matched against this id, never against the
/// position of the item in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw photo bytes as captured or selected, not yet stored remotely
#[derive(Debug, Clone, PartialEq)]
pub struct LocalPayload {
    pub name: String,
    pub mime: String,
    pub bytes: Arc<[u8]>,
}

impl LocalPayload {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a picked file from disk, guessing the MIME type from its extension
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo.jpg")
            .to_string();
        Ok(Self::new(name, guess_mime_from_ext(path), bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Simple MIME type lookup based on the file extension
pub fn guess_mime_from_ext(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("heic") | Some("heif") => "image/heic",
        _ => "image/jpeg",
    }
}

/// Durable reference returned by the remote media store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRef(pub String);

impl RemoteRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RemoteRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One logical photo: local bytes, preview handle and (once uploaded) the
/// remote reference, kept together so they can only ever move as a unit
#[derive(Debug)]
pub struct MediaItem {
    pub id: ItemId,
    pub payload: LocalPayload,
    pub(crate) preview: PreviewHandle,
    pub remote: Option<RemoteRef>,
}

impl MediaItem {
    pub fn is_pending(&self) -> bool {
        self.remote.is_none()
    }
}

/// Render-ready copy of one registry entry for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub id: ItemId,
    pub preview_src: String,
    pub uploaded: bool,
}

/// Which sensor the camera should prefer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Outward facing sensor ("environment")
    Environment,
    User,
}

/// Settings for one camera capture attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub facing: Facing,
    pub audio: bool,
    /// JPEG quality used to encode the captured frame (1-100)
    pub jpeg_quality: u8,
    pub acquire_timeout_secs: u64,
}

impl CaptureConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            facing: Facing::Environment,
            audio: false,
            jpeg_quality: 95,
            acquire_timeout_secs: 60,
        }
    }
}
