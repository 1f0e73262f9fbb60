//! Ordered collection of the photos attached to one form session.
//!
//! Each entry is a single [`MediaItem`] record, so payload, preview handle and
//! remote reference cannot drift out of alignment. Positional indices are only
//! used at the UI boundary; everything asynchronous works with [`ItemId`].

use crate::error::MediaError;
use crate::models::{ItemId, ItemView, LocalPayload, MediaItem, RemoteRef, MAX_ITEMS};
use crate::preview::PreviewStore;

/// Result of [`MediaRegistry::append`]
#[derive(Debug, Clone, PartialEq)]
pub struct AppendOutcome {
    /// Ids of the accepted items, in input order
    pub accepted: Vec<ItemId>,
    /// Trailing items that did not fit
    pub dropped: usize,
}

impl AppendOutcome {
    pub fn is_truncated(&self) -> bool {
        self.dropped > 0
    }

    pub fn capacity_error(&self) -> Option<MediaError> {
        self.is_truncated().then(|| MediaError::CapacityExceeded {
            accepted: self.accepted.len(),
            dropped: self.dropped,
        })
    }
}

#[derive(Debug, Default)]
pub struct MediaRegistry {
    items: Vec<MediaItem>,
    previews: PreviewStore,
}

impl MediaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn remaining_capacity(&self) -> usize {
        MAX_ITEMS.saturating_sub(self.items.len())
    }

    pub fn is_full(&self) -> bool {
        self.remaining_capacity() == 0
    }

    /// Accepts as many items as fit, in input order, creating one preview each
    pub fn append(&mut self, raw: Vec<LocalPayload>) -> AppendOutcome {
        let remaining = self.remaining_capacity();
        let offered = raw.len();
        let mut accepted = Vec::with_capacity(remaining.min(offered));

        for payload in raw.into_iter().take(remaining) {
            let preview = self.previews.create(&payload);
            let id = ItemId::new();
            self.items.push(MediaItem {
                id,
                payload,
                preview,
                remote: None,
            });
            accepted.push(id);
        }

        let dropped = offered - accepted.len();
        if dropped > 0 {
            log::warn!(
                "Capacity reached: accepted {} of {} items",
                accepted.len(),
                offered
            );
        }
        AppendOutcome { accepted, dropped }
    }

    /// Removes the item at `index`, releasing its preview first
    pub fn remove(&mut self, index: usize) -> Option<ItemId> {
        if index >= self.items.len() {
            log::warn!("Remove ignored: index {} out of range", index);
            return None;
        }
        let item = self.items.remove(index);
        let id = item.id;
        self.previews.release(item.preview);
        log::debug!("Removed item {} at index {}", id, index);
        Some(id)
    }

    pub fn remove_by_id(&mut self, id: ItemId) -> bool {
        match self.index_of(id) {
            Some(index) => self.remove(index).is_some(),
            None => false,
        }
    }

    /// Records the remote reference; unknown ids (removed meanwhile) are ignored
    pub fn mark_uploaded(&mut self, id: ItemId, reference: RemoteRef) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.remote = Some(reference);
                true
            }
            None => {
                log::debug!("Discarding upload result for removed item {}", id);
                false
            }
        }
    }

    /// Removes every still-present item of a batch; returns how many were removed
    pub fn rollback(&mut self, ids: &[ItemId]) -> usize {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| ids.contains(&item.id));
        self.items = kept;
        let count = removed.len();
        for item in removed {
            self.previews.release(item.preview);
        }
        count
    }

    pub fn pending_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_pending()).count()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Remote references in item order, refused while anything is pending
    pub fn snapshot_for_submission(&self) -> Result<Vec<RemoteRef>, MediaError> {
        let pending = self.pending_count();
        if pending > 0 {
            return Err(MediaError::SubmissionNotReady { pending });
        }
        Ok(self
            .items
            .iter()
            .filter_map(|item| item.remote.clone())
            .collect())
    }

    /// Borrows the preview source of the item at `index` for rendering
    pub fn preview_src(&self, index: usize) -> Option<&str> {
        self.items
            .get(index)
            .and_then(|item| self.previews.resolve(&item.preview))
    }

    pub fn views(&self) -> Vec<ItemView> {
        self.items
            .iter()
            .map(|item| ItemView {
                id: item.id,
                preview_src: self
                    .previews
                    .resolve(&item.preview)
                    .unwrap_or_default()
                    .to_string(),
                uploaded: item.remote.is_some(),
            })
            .collect()
    }

    /// Ends the session: releases every preview and empties the registry
    pub fn release_all(&mut self) -> usize {
        let count = self.items.len();
        for item in self.items.drain(..) {
            self.previews.release(item.preview);
        }
        count
    }

    pub fn live_previews(&self) -> usize {
        self.previews.live_count()
    }
}
