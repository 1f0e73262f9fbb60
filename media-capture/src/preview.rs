//! Local preview sources for photos that are not stored remotely yet.
//!
//! A [`PreviewHandle`] is an opaque ticket into the [`PreviewStore`]. It is
//! neither `Clone` nor `Copy`: whoever owns it is the only one who can release
//! it, and releasing consumes it.

use base64::Engine;
use std::collections::HashMap;

use crate::models::LocalPayload;

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PreviewHandle(u64);

#[derive(Debug, Default)]
pub struct PreviewStore {
    sources: HashMap<u64, String>,
    next_id: u64,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `data:` URL for the payload and returns its handle
    pub fn create(&mut self, payload: &LocalPayload) -> PreviewHandle {
        let mime = sniff_mime(payload);
        let b64 = base64::engine::general_purpose::STANDARD.encode(&payload.bytes);
        let id = self.next_id;
        self.next_id += 1;
        self.sources.insert(id, format!("data:{};base64,{}", mime, b64));
        log::debug!("Preview {} created for {} ({})", id, payload.name, mime);
        PreviewHandle(id)
    }

    /// Borrows the render source; `None` once the handle was released
    pub fn resolve(&self, handle: &PreviewHandle) -> Option<&str> {
        self.sources.get(&handle.0).map(String::as_str)
    }

    pub fn release(&mut self, handle: PreviewHandle) {
        if self.sources.remove(&handle.0).is_none() {
            log::warn!("Preview {} was already released", handle.0);
        } else {
            log::debug!("Preview {} released", handle.0);
        }
    }

    pub fn live_count(&self) -> usize {
        self.sources.len()
    }
}

/// Prefers the magic bytes over the declared type
fn sniff_mime(payload: &LocalPayload) -> String {
    match image::guess_format(&payload.bytes) {
        Ok(format) => format.to_mime_type().to_string(),
        Err(_) if !payload.mime.is_empty() => payload.mime.clone(),
        Err(_) => "image/jpeg".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[test]
    fn test_create_resolve_release() {
        let mut store = PreviewStore::new();
        let payload = LocalPayload::new("a.bin", "image/gif", vec![1, 2, 3]);
        let handle = store.create(&payload);

        let src = store.resolve(&handle).unwrap();
        assert!(src.starts_with("data:image/gif;base64,"));
        assert_eq!(store.live_count(), 1);

        store.release(handle);
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_magic_bytes_win_over_declared_mime() {
        let mut store = PreviewStore::new();
        let payload = LocalPayload::new("photo.jpg", "image/jpeg", PNG_MAGIC.to_vec());
        let handle = store.create(&payload);
        assert!(store
            .resolve(&handle)
            .unwrap()
            .starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_unknown_bytes_without_mime_default_to_jpeg() {
        let mut store = PreviewStore::new();
        let payload = LocalPayload::new("x", "", vec![0, 0, 0]);
        let handle = store.create(&payload);
        assert!(store.resolve(&handle).unwrap().starts_with("data:image/jpeg"));
    }

    #[test]
    fn test_handles_are_distinct() {
        let mut store = PreviewStore::new();
        let payload = LocalPayload::new("a", "image/jpeg", vec![1]);
        let a = store.create(&payload);
        let b = store.create(&payload);
        assert_ne!(a, b);
        store.release(a);
        assert!(store.resolve(&b).is_some());
    }
}
