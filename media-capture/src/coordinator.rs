//! Upload orchestration for one form session.
//!
//! [`UploadCoordinator`] owns the [`MediaRegistry`] behind a short-lived lock
//! (never held across an await), fans every accepted batch out to one upload
//! task per item and reconciles the results by [`ItemId`]. A batch is all or
//! nothing: if any of its uploads fails, every item of the batch still in the
//! registry is rolled back and the user is notified once.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{mpsc, watch};
use tokio::task::{AbortHandle, JoinSet};

use crate::error::MediaError;
use crate::models::{ItemId, ItemView, LocalPayload, RemoteRef};
use crate::notice::{emit, Notice};
use crate::registry::{AppendOutcome, MediaRegistry};
use crate::submission::{build_payload, FormSubmitter};
use crate::upload::MediaUploader;

#[derive(Default)]
struct SessionState {
    registry: MediaRegistry,
    in_flight: HashMap<ItemId, AbortHandle>,
    active_batches: usize,
    submitting: bool,
}

struct Inner<U> {
    uploader: Arc<U>,
    state: Mutex<SessionState>,
    notices: mpsc::UnboundedSender<Notice>,
    revision: watch::Sender<u64>,
}

impl<U> Inner<U> {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn touch(&self) {
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }
}

/// Keeps `is_uploading()` true until the batch settles or its future is dropped
struct BatchGuard<'a, U> {
    inner: &'a Inner<U>,
    ids: Vec<ItemId>,
}

impl<U> Drop for BatchGuard<'_, U> {
    fn drop(&mut self) {
        {
            let mut state = self.inner.lock();
            for id in &self.ids {
                state.in_flight.remove(id);
            }
            state.active_batches = state.active_batches.saturating_sub(1);
        }
        self.inner.touch();
    }
}

struct SubmitGuard<'a, U> {
    inner: &'a Inner<U>,
}

impl<U> Drop for SubmitGuard<'_, U> {
    fn drop(&mut self) {
        self.inner.lock().submitting = false;
        self.inner.touch();
    }
}

pub struct UploadCoordinator<U> {
    inner: Arc<Inner<U>>,
}

impl<U> Clone for UploadCoordinator<U> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<U: MediaUploader + 'static> UploadCoordinator<U> {
    /// Creates the coordinator together with the receiving end of its notices
    pub fn new(uploader: U) -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (notices, rx) = mpsc::unbounded_channel();
        let (revision, _) = watch::channel(0);
        let coordinator = Self {
            inner: Arc::new(Inner {
                uploader: Arc::new(uploader),
                state: Mutex::new(SessionState::default()),
                notices,
                revision,
            }),
        };
        (coordinator, rx)
    }

    pub fn uploader(&self) -> &U {
        &self.inner.uploader
    }

    /// Appends a batch and uploads it
    ///
    /// Resolves once every upload of the batch has settled. Returns the
    /// append outcome on success, `CapacityExceeded` when nothing fit and
    /// `UploadBatchFailed` after a rollback.
    pub async fn add_items(&self, raw: Vec<LocalPayload>) -> Result<AppendOutcome, MediaError> {
        if raw.is_empty() {
            return Ok(AppendOutcome {
                accepted: Vec::new(),
                dropped: 0,
            });
        }

        let mut join_set = JoinSet::new();
        let (outcome, batch) = {
            let mut state = self.inner.lock();
            let outcome = state.registry.append(raw);
            if outcome.accepted.is_empty() {
                drop(state);
                return Err(self.fail(MediaError::CapacityExceeded {
                    accepted: 0,
                    dropped: outcome.dropped,
                }));
            }

            state.active_batches += 1;
            let batch = BatchGuard {
                inner: &*self.inner,
                ids: outcome.accepted.clone(),
            };

            for id in &outcome.accepted {
                let Some(payload) = state
                    .registry
                    .index_of(*id)
                    .and_then(|index| state.registry.get(index))
                    .map(|item| item.payload.clone())
                else {
                    continue;
                };
                let uploader = Arc::clone(&self.inner.uploader);
                let id = *id;
                let handle = join_set.spawn(async move { (id, uploader.upload(payload).await) });
                state.in_flight.insert(id, handle);
            }
            (outcome, batch)
        };
        self.inner.touch();

        if let Some(err) = outcome.capacity_error() {
            self.notify(err.notice());
        }

        let total = outcome.accepted.len();
        log::info!("Uploading batch of {} item(s)", total);

        let mut failed = 0;
        let mut uploaded = 0;
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((id, Ok(reference))) => {
                    let applied = {
                        let mut state = self.inner.lock();
                        state.in_flight.remove(&id);
                        state.registry.mark_uploaded(id, reference)
                    };
                    if applied {
                        uploaded += 1;
                        self.inner.touch();
                    }
                }
                Ok((id, Err(e))) => {
                    let live = {
                        let mut state = self.inner.lock();
                        state.in_flight.remove(&id);
                        state.registry.contains(id)
                    };
                    if live {
                        log::error!("Upload of item {} failed: {}", id, e);
                        failed += 1;
                    } else {
                        log::debug!("Ignoring failed upload of removed item {}: {}", id, e);
                    }
                }
                Err(e) if e.is_cancelled() => {
                    log::debug!("Upload task cancelled after removal");
                }
                Err(e) => {
                    log::error!("Upload task aborted: {}", e);
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            let removed = self.inner.lock().registry.rollback(&outcome.accepted);
            log::warn!(
                "Batch failed ({} of {} uploads), rolled back {} item(s)",
                failed,
                total,
                removed
            );
            drop(batch);
            return Err(self.fail(MediaError::UploadBatchFailed { failed, total }));
        }

        drop(batch);
        log::info!("Batch settled: {} of {} item(s) uploaded", uploaded, total);
        if uploaded > 0 {
            self.notify(Notice::UploadBatchSucceeded { count: uploaded });
        }
        Ok(outcome)
    }

    /// Removes the item at `index` and cancels its upload if still running
    pub fn remove(&self, index: usize) -> Option<ItemId> {
        let id = {
            let mut state = self.inner.lock();
            let id = state.registry.remove(index)?;
            if let Some(handle) = state.in_flight.remove(&id) {
                log::debug!("Cancelling upload of removed item {}", id);
                handle.abort();
            }
            id
        };
        self.inner.touch();
        self.notify(Notice::ItemRemoved);
        Some(id)
    }

    /// Submits the form together with the references of all uploaded photos
    ///
    /// Refused while uploads are outstanding. On success the session ends and
    /// every preview is released; on failure the photos are kept for a retry.
    pub async fn submit<S: FormSubmitter>(
        &self,
        fields: Vec<(String, String)>,
        submitter: &S,
    ) -> Result<usize, MediaError> {
        let references = {
            let mut state = self.inner.lock();
            if state.submitting {
                drop(state);
                return Err(self.fail(MediaError::SubmissionInProgress));
            }
            let pending = state.registry.pending_count();
            if state.active_batches > 0 || pending > 0 {
                drop(state);
                return Err(self.fail(MediaError::SubmissionNotReady { pending }));
            }
            let references = match state.registry.snapshot_for_submission() {
                Ok(references) => references,
                Err(e) => {
                    drop(state);
                    return Err(self.fail(e));
                }
            };
            state.submitting = true;
            references
        };
        let _submitting = SubmitGuard {
            inner: &*self.inner,
        };
        self.inner.touch();
        self.notify(Notice::SubmissionInProgress);

        let count = references.len();
        match submitter.submit(build_payload(fields, &references)).await {
            Ok(()) => {
                let released = self.inner.lock().registry.release_all();
                log::info!(
                    "Form submitted with {} photo(s), released {} preview(s)",
                    count,
                    released
                );
                self.notify(Notice::SubmissionSucceeded);
                Ok(count)
            }
            Err(e) => {
                log::error!("Form submission failed: {}", e);
                Err(self.fail(e.into()))
            }
        }
    }

    /// Ends the session without submitting
    pub fn abandon(&self) -> usize {
        let released = {
            let mut state = self.inner.lock();
            for (_, handle) in state.in_flight.drain() {
                handle.abort();
            }
            state.registry.release_all()
        };
        log::debug!("Form abandoned, released {} preview(s)", released);
        self.inner.touch();
        released
    }

    pub fn is_uploading(&self) -> bool {
        self.inner.lock().active_batches > 0
    }

    pub fn is_submitting(&self) -> bool {
        self.inner.lock().submitting
    }

    pub fn len(&self) -> usize {
        self.inner.lock().registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.inner.lock().registry.is_full()
    }

    pub fn pending_count(&self) -> usize {
        self.inner.lock().registry.pending_count()
    }

    pub fn snapshot_for_submission(&self) -> Result<Vec<RemoteRef>, MediaError> {
        self.inner.lock().registry.snapshot_for_submission()
    }

    pub fn views(&self) -> Vec<ItemView> {
        self.inner.lock().registry.views()
    }

    /// Runs `f` with shared access to the registry
    pub fn with_registry<T>(&self, f: impl FnOnce(&MediaRegistry) -> T) -> T {
        f(&self.inner.lock().registry)
    }

    /// Revision counter bumped on every observable state change
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    pub fn notify(&self, notice: Notice) {
        emit(&self.inner.notices, notice);
    }

    fn fail(&self, err: MediaError) -> MediaError {
        self.notify(err.notice());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SubmitError, UploadError};
    use crate::models::MAX_ITEMS;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    enum Behavior {
        Succeed,
        Fail,
        Gate(oneshot::Receiver<bool>),
    }

    #[derive(Default)]
    struct FakeUploader {
        behaviors: Mutex<HashMap<String, Behavior>>,
        started: AtomicUsize,
    }

    impl FakeUploader {
        fn failing(names: &[&str]) -> Self {
            let uploader = Self::default();
            for name in names {
                uploader
                    .behaviors
                    .lock()
                    .unwrap()
                    .insert(name.to_string(), Behavior::Fail);
            }
            uploader
        }

        fn gate(&self, name: &str) -> oneshot::Sender<bool> {
            let (tx, rx) = oneshot::channel();
            self.behaviors
                .lock()
                .unwrap()
                .insert(name.to_string(), Behavior::Gate(rx));
            tx
        }

        fn started(&self) -> usize {
            self.started.load(Ordering::SeqCst)
        }
    }

    impl MediaUploader for FakeUploader {
        async fn upload(&self, payload: LocalPayload) -> Result<RemoteRef, UploadError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            let behavior = {
                self.behaviors
                    .lock()
                    .unwrap()
                    .remove(&payload.name)
                    .unwrap_or(Behavior::Succeed)
            };
            let succeed = match behavior {
                Behavior::Succeed => true,
                Behavior::Fail => false,
                Behavior::Gate(rx) => rx.await.unwrap_or(false),
            };
            if succeed {
                Ok(RemoteRef(format!("ref-{}", payload.name)))
            } else {
                Err(UploadError::Rejected(500))
            }
        }
    }

    struct FakeSubmitter {
        fail: bool,
        gate: Mutex<Option<oneshot::Receiver<bool>>>,
        received: Mutex<Vec<Vec<(String, String)>>>,
    }

    impl FakeSubmitter {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                gate: Mutex::new(None),
                received: Mutex::new(Vec::new()),
            }
        }

        /// Holds the submission until the sender resolves it
        fn gated() -> (Self, oneshot::Sender<bool>) {
            let (tx, rx) = oneshot::channel();
            let submitter = Self::new(false);
            *submitter.gate.lock().unwrap() = Some(rx);
            (submitter, tx)
        }
    }

    impl FormSubmitter for FakeSubmitter {
        async fn submit(&self, payload: Vec<(String, String)>) -> Result<(), SubmitError> {
            self.received.lock().unwrap().push(payload);
            let gate = self.gate.lock().unwrap().take();
            let succeed = match gate {
                Some(rx) => rx.await.unwrap_or(false),
                None => !self.fail,
            };
            if succeed {
                Ok(())
            } else {
                Err(SubmitError::Rejected(502))
            }
        }
    }

    fn payloads(names: &[&str]) -> Vec<LocalPayload> {
        names
            .iter()
            .map(|n| LocalPayload::new(*n, "image/jpeg", n.as_bytes().to_vec()))
            .collect()
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Notice>) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Ok(notice) = rx.try_recv() {
            notices.push(notice);
        }
        notices
    }

    async fn settle_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("condition not reached");
    }

    fn names(coordinator: &UploadCoordinator<FakeUploader>) -> Vec<String> {
        coordinator.with_registry(|registry| {
            registry
                .items()
                .iter()
                .map(|item| item.payload.name.clone())
                .collect()
        })
    }

    #[tokio::test]
    async fn test_all_uploads_succeed() {
        let (coordinator, mut rx) = UploadCoordinator::new(FakeUploader::default());

        let outcome = coordinator
            .add_items(payloads(&["a", "b", "c"]))
            .await
            .unwrap();

        assert_eq!(outcome.accepted.len(), 3);
        assert_eq!(coordinator.len(), 3);
        assert_eq!(coordinator.pending_count(), 0);
        assert!(!coordinator.is_uploading());
        assert_eq!(
            coordinator.snapshot_for_submission().unwrap(),
            vec![
                RemoteRef("ref-a".into()),
                RemoteRef("ref-b".into()),
                RemoteRef("ref-c".into())
            ]
        );
        assert_eq!(
            drain(&mut rx),
            vec![Notice::UploadBatchSucceeded { count: 3 }]
        );
    }

    #[tokio::test]
    async fn test_truncated_batch_is_notified() {
        let (coordinator, mut rx) = UploadCoordinator::new(FakeUploader::default());
        coordinator
            .add_items(payloads(&["1", "2", "3", "4", "5", "6", "7", "8"]))
            .await
            .unwrap();
        drain(&mut rx);

        let outcome = coordinator
            .add_items(payloads(&["x", "y", "z"]))
            .await
            .unwrap();

        assert_eq!(outcome.accepted.len(), 2);
        assert_eq!(outcome.dropped, 1);
        assert_eq!(coordinator.len(), MAX_ITEMS);
        assert_eq!(&names(&coordinator)[8..], ["x", "y"]);
        assert_eq!(
            drain(&mut rx),
            vec![
                Notice::CapacityExceeded {
                    accepted: 2,
                    dropped: 1
                },
                Notice::UploadBatchSucceeded { count: 2 }
            ]
        );
    }

    #[tokio::test]
    async fn test_full_registry_rejects_batch() {
        let uploader = FakeUploader::default();
        let (coordinator, mut rx) = UploadCoordinator::new(uploader);
        coordinator
            .add_items(payloads(&["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"]))
            .await
            .unwrap();
        drain(&mut rx);
        let started = coordinator.uploader().started();

        let err = coordinator.add_items(payloads(&["late"])).await.unwrap_err();

        assert_eq!(
            err,
            MediaError::CapacityExceeded {
                accepted: 0,
                dropped: 1
            }
        );
        assert_eq!(coordinator.uploader().started(), started);
        assert!(!coordinator.is_uploading());
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[tokio::test]
    async fn test_one_failure_rolls_back_whole_batch() {
        let (coordinator, mut rx) = UploadCoordinator::new(FakeUploader::failing(&["q"]));

        let err = coordinator
            .add_items(payloads(&["p", "q"]))
            .await
            .unwrap_err();

        assert_eq!(err, MediaError::UploadBatchFailed { failed: 1, total: 2 });
        assert!(coordinator.is_empty());
        assert!(!coordinator.is_uploading());
        assert_eq!(coordinator.with_registry(|r| r.live_previews()), 0);
        assert_eq!(drain(&mut rx), vec![Notice::UploadBatchFailed { count: 2 }]);
    }

    #[tokio::test]
    async fn test_rollback_keeps_earlier_batches() {
        let (coordinator, _rx) = UploadCoordinator::new(FakeUploader::failing(&["bad"]));
        coordinator.add_items(payloads(&["keep"])).await.unwrap();

        let result = coordinator.add_items(payloads(&["ok", "bad", "ok2"])).await;

        assert!(result.is_err());
        assert_eq!(names(&coordinator), ["keep"]);
        assert_eq!(
            coordinator.snapshot_for_submission().unwrap(),
            vec![RemoteRef("ref-keep".into())]
        );
    }

    #[tokio::test]
    async fn test_uploads_fan_out_and_flag_tracks_batch() {
        let uploader = FakeUploader::default();
        let gates: Vec<_> = ["a", "b", "c"].iter().map(|n| uploader.gate(n)).collect();
        let (coordinator, _rx) = UploadCoordinator::new(uploader);

        let worker = coordinator.clone();
        let batch =
            tokio::spawn(async move { worker.add_items(payloads(&["a", "b", "c"])).await });

        settle_until(|| coordinator.uploader().started() == 3).await;
        assert!(coordinator.is_uploading());
        assert_eq!(coordinator.pending_count(), 3);
        assert!(matches!(
            coordinator.snapshot_for_submission(),
            Err(MediaError::SubmissionNotReady { pending: 3 })
        ));

        // Completion order differs from capture order
        for gate in gates.into_iter().rev() {
            gate.send(true).unwrap();
        }
        batch.await.unwrap().unwrap();

        assert!(!coordinator.is_uploading());
        assert_eq!(names(&coordinator), ["a", "b", "c"]);
        assert_eq!(
            coordinator.snapshot_for_submission().unwrap(),
            vec![
                RemoteRef("ref-a".into()),
                RemoteRef("ref-b".into()),
                RemoteRef("ref-c".into())
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_during_upload_is_not_reintroduced() {
        let uploader = FakeUploader::default();
        let gate_a = uploader.gate("a");
        let gate_b = uploader.gate("b");
        let gate_c = uploader.gate("c");
        let (coordinator, mut rx) = UploadCoordinator::new(uploader);

        let worker = coordinator.clone();
        let batch =
            tokio::spawn(async move { worker.add_items(payloads(&["a", "b", "c"])).await });
        settle_until(|| coordinator.uploader().started() == 3).await;

        assert!(coordinator.remove(1).is_some());
        assert_eq!(names(&coordinator), ["a", "c"]);

        // The cancelled upload may still try to report back
        let _ = gate_b.send(true);
        gate_a.send(true).unwrap();
        gate_c.send(true).unwrap();
        batch.await.unwrap().unwrap();

        assert_eq!(names(&coordinator), ["a", "c"]);
        assert_eq!(
            coordinator.snapshot_for_submission().unwrap(),
            vec![RemoteRef("ref-a".into()), RemoteRef("ref-c".into())]
        );
        assert_eq!(coordinator.with_registry(|r| r.live_previews()), 2);
        assert!(!coordinator.is_uploading());
        let notices = drain(&mut rx);
        assert_eq!(
            notices,
            vec![
                Notice::ItemRemoved,
                Notice::UploadBatchSucceeded { count: 2 }
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_of_removed_item_does_not_roll_back() {
        let uploader = FakeUploader::default();
        let gate_p = uploader.gate("p");
        let gate_q = uploader.gate("q");
        let (coordinator, _rx) = UploadCoordinator::new(uploader);

        let worker = coordinator.clone();
        let batch = tokio::spawn(async move { worker.add_items(payloads(&["p", "q"])).await });
        settle_until(|| coordinator.uploader().started() == 2).await;

        coordinator.remove(1);
        let _ = gate_q.send(false);
        gate_p.send(true).unwrap();

        assert!(batch.await.unwrap().is_ok());
        assert_eq!(names(&coordinator), ["p"]);
    }

    #[tokio::test]
    async fn test_submit_refused_while_uploading() {
        let uploader = FakeUploader::default();
        let gate = uploader.gate("a");
        let (coordinator, mut rx) = UploadCoordinator::new(uploader);
        let submitter = FakeSubmitter::new(false);

        let worker = coordinator.clone();
        let batch = tokio::spawn(async move { worker.add_items(payloads(&["a"])).await });
        settle_until(|| coordinator.uploader().started() == 1).await;

        let err = coordinator.submit(Vec::new(), &submitter).await.unwrap_err();
        assert_eq!(err, MediaError::SubmissionNotReady { pending: 1 });
        assert!(submitter.received.lock().unwrap().is_empty());
        assert!(drain(&mut rx).contains(&Notice::SubmissionNotReady { pending: 1 }));

        gate.send(true).unwrap();
        batch.await.unwrap().unwrap();
        assert_eq!(coordinator.submit(Vec::new(), &submitter).await, Ok(1));
    }

    #[tokio::test]
    async fn test_successful_submit_releases_session() {
        let (coordinator, mut rx) = UploadCoordinator::new(FakeUploader::default());
        coordinator.add_items(payloads(&["a", "b"])).await.unwrap();
        drain(&mut rx);
        let submitter = FakeSubmitter::new(false);

        let fields = vec![("title".to_string(), "Broken light".to_string())];
        let count = coordinator.submit(fields, &submitter).await.unwrap();

        assert_eq!(count, 2);
        assert!(coordinator.is_empty());
        assert_eq!(coordinator.with_registry(|r| r.live_previews()), 0);
        assert!(!coordinator.is_submitting());
        let sent = submitter.received.lock().unwrap();
        assert_eq!(
            sent[0],
            vec![
                ("title".to_string(), "Broken light".to_string()),
                ("gallery[]".to_string(), "ref-a".to_string()),
                ("gallery[]".to_string(), "ref-b".to_string()),
            ]
        );
        assert_eq!(
            drain(&mut rx),
            vec![Notice::SubmissionInProgress, Notice::SubmissionSucceeded]
        );
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_photos_for_retry() {
        let (coordinator, mut rx) = UploadCoordinator::new(FakeUploader::default());
        coordinator.add_items(payloads(&["a"])).await.unwrap();
        drain(&mut rx);

        let err = coordinator
            .submit(Vec::new(), &FakeSubmitter::new(true))
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::SubmissionFailed(_)));
        assert_eq!(coordinator.len(), 1);
        assert_eq!(coordinator.with_registry(|r| r.live_previews()), 1);
        assert!(!coordinator.is_submitting());
        let notices = drain(&mut rx);
        assert_eq!(notices.len(), 2);
        assert!(matches!(notices[1], Notice::SubmissionFailed(_)));

        assert_eq!(
            coordinator
                .submit(Vec::new(), &FakeSubmitter::new(false))
                .await,
            Ok(1)
        );
    }

    #[tokio::test]
    async fn test_second_submit_refused_while_first_pending() {
        let (coordinator, mut rx) = UploadCoordinator::new(FakeUploader::default());
        coordinator.add_items(payloads(&["a"])).await.unwrap();
        drain(&mut rx);
        let (submitter, release) = FakeSubmitter::gated();
        let submitter = Arc::new(submitter);

        let worker = coordinator.clone();
        let first_submitter = Arc::clone(&submitter);
        let first =
            tokio::spawn(async move { worker.submit(Vec::new(), first_submitter.as_ref()).await });

        settle_until(|| submitter.received.lock().unwrap().len() == 1).await;
        assert!(coordinator.is_submitting());

        let second = FakeSubmitter::new(false);
        let err = coordinator.submit(Vec::new(), &second).await.unwrap_err();
        assert_eq!(err, MediaError::SubmissionInProgress);
        assert!(second.received.lock().unwrap().is_empty());
        assert_eq!(coordinator.len(), 1);

        release.send(true).unwrap();
        assert_eq!(first.await.unwrap(), Ok(1));
        assert!(!coordinator.is_submitting());
        assert!(coordinator.is_empty());
        assert_eq!(submitter.received.lock().unwrap().len(), 1);
        assert_eq!(
            drain(&mut rx),
            vec![
                Notice::SubmissionInProgress,
                Notice::SubmissionInProgress,
                Notice::SubmissionSucceeded
            ]
        );
    }

    #[tokio::test]
    async fn test_abandon_releases_everything() {
        let uploader = FakeUploader::default();
        let _gate = uploader.gate("slow");
        let (coordinator, _rx) = UploadCoordinator::new(uploader);
        coordinator.add_items(payloads(&["done"])).await.unwrap();

        let worker = coordinator.clone();
        let batch = tokio::spawn(async move { worker.add_items(payloads(&["slow"])).await });
        settle_until(|| coordinator.uploader().started() == 2).await;

        assert_eq!(coordinator.abandon(), 2);
        assert!(batch.await.unwrap().is_ok());
        assert!(coordinator.is_empty());
        assert_eq!(coordinator.with_registry(|r| r.live_previews()), 0);
        assert!(!coordinator.is_uploading());
    }

    #[tokio::test]
    async fn test_revision_advances_on_changes() {
        let (coordinator, _rx) = UploadCoordinator::new(FakeUploader::default());
        let mut revisions = coordinator.subscribe();
        revisions.borrow_and_update();

        coordinator.add_items(payloads(&["a"])).await.unwrap();
        assert!(revisions.has_changed().unwrap());
        revisions.borrow_and_update();

        coordinator.remove(0);
        assert!(revisions.has_changed().unwrap());
    }
}
