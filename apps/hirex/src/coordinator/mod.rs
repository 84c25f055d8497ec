//! Collection coordinator. Owns the in-memory candidate collection for the
//! current view and mediates every mutation of it.
//!
//! Load status moves `Idle -> Loading -> {Ready, Error}` and back to `Loading` on
//! the next fetch. Fetches are never cancelled; each one takes a sequence number
//! and only the most recently issued fetch may commit its result.
//!
//! Readers get an `Arc` snapshot, and every commit swaps the whole collection
//! under the write lock, so a reader never sees a half-applied update.

pub mod reconcile;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, error, info, warn};

use crate::backend::{BackendError, CandidateBackend, UploadFile};
use crate::candidates::search;
use crate::candidates::view_model::{build_collection, build_ranked};
use crate::errors::{AppError, Notice};
use crate::models::candidate::CandidateViewModel;
use crate::models::job::FetchContext;
use crate::models::raw::UploadOutcome;

use self::reconcile::{reconcile, Reconciliation, Trigger};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { count: usize },
    /// A newer fetch was issued while this one was in flight; its result was dropped.
    Stale,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadReport {
    pub outcomes: Vec<UploadOutcome>,
    pub refetched: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; no request was issued.
    Declined,
    Applied,
    Refetched,
}

/// Destructive-action gate. Deletions only reach the backend when this says yes.
pub trait ConfirmGate {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> ConfirmGate for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Default)]
struct CollectionState {
    status: LoadStatus,
    candidates: Arc<Vec<CandidateViewModel>>,
    /// The view the committed collection belongs to.
    view: FetchContext,
    /// The view of the most recently issued fetch, committed or not.
    requested_view: FetchContext,
    latest_request: u64,
    notices: Vec<Notice>,
}

pub struct CollectionCoordinator {
    backend: Arc<dyn CandidateBackend>,
    state: RwLock<CollectionState>,
}

impl CollectionCoordinator {
    pub fn new(backend: Arc<dyn CandidateBackend>) -> Self {
        Self {
            backend,
            state: RwLock::new(CollectionState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CollectionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CollectionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> LoadStatus {
        self.read().status.clone()
    }

    pub fn view(&self) -> FetchContext {
        self.read().view
    }

    pub fn snapshot(&self) -> Arc<Vec<CandidateViewModel>> {
        Arc::clone(&self.read().candidates)
    }

    /// Filtered view over the current collection.
    pub fn search(&self, query: &str) -> Vec<CandidateViewModel> {
        let snapshot = self.snapshot();
        search::filter(&snapshot, query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Drains the notices recorded since the last call.
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.write().notices)
    }

    fn notify(&self, notice: Notice) {
        self.write().notices.push(notice);
    }

    /// Records a transport failure as a single notice and converts it.
    fn report(&self, operation: &str, err: BackendError) -> AppError {
        error!("{operation} failed: {err}");
        self.notify(Notice::error(err.user_message()));
        AppError::Backend(err)
    }

    /// Fetches the collection for `context` and replaces the current one wholesale.
    /// On failure the previous collection stays in place.
    pub async fn fetch(&self, context: FetchContext) -> Result<FetchOutcome, AppError> {
        let request = {
            let mut state = self.write();
            state.latest_request += 1;
            state.requested_view = context;
            state.status = LoadStatus::Loading;
            state.latest_request
        };
        debug!("Fetch #{request} issued for {context:?}");

        let result = match context.job_id {
            Some(job_id) => self
                .backend
                .ranked_candidates(job_id)
                .await
                .map(build_ranked),
            None => self.backend.list_candidates().await.map(build_collection),
        };

        let mut state = self.write();
        if state.latest_request != request {
            warn!(
                "Discarding stale fetch #{request} (latest is #{})",
                state.latest_request
            );
            return Ok(FetchOutcome::Stale);
        }

        match result {
            Ok(candidates) => {
                let count = candidates.len();
                state.candidates = Arc::new(candidates);
                state.view = context;
                state.status = LoadStatus::Ready;
                info!("Loaded {count} candidates");
                Ok(FetchOutcome::Applied { count })
            }
            Err(err) => {
                let message = err.user_message();
                error!("Candidate fetch failed: {err}");
                state.status = LoadStatus::Error(message.clone());
                state.notices.push(Notice::error(message));
                Err(AppError::Backend(err))
            }
        }
    }

    /// Re-fetches the most recently requested view, so an in-flight switch of
    /// view is not overridden. Failures were already reported by `fetch`.
    async fn refetch(&self) {
        let view = self.read().requested_view;
        if let Err(e) = self.fetch(view).await {
            debug!("Re-fetch after mutation failed: {e}");
        }
    }

    /// Uploads resumes. Every failed file gets its own notice; any success
    /// triggers a full re-fetch since the backend extracts asynchronously.
    pub async fn upload(&self, files: Vec<UploadFile>) -> Result<UploadReport, AppError> {
        if files.is_empty() {
            return Err(AppError::Validation(
                "Select at least one file to upload".to_string(),
            ));
        }

        let outcomes = match self.backend.upload(files).await {
            Ok(outcomes) => outcomes,
            Err(err) => return Err(self.report("Upload", err)),
        };

        let failures: Vec<String> = outcomes
            .iter()
            .filter_map(UploadOutcome::failure_message)
            .collect();
        let succeeded = outcomes.len() - failures.len();
        for failure in &failures {
            warn!("Upload failed: {failure}");
            self.notify(Notice::error(failure.clone()));
        }

        match reconcile(Trigger::Upload { succeeded }) {
            Reconciliation::ForcedRefetch => {
                self.notify(Notice::success(format!("{succeeded} resume(s) uploaded")));
                self.refetch().await;
                Ok(UploadReport {
                    outcomes,
                    refetched: true,
                })
            }
            Reconciliation::OptimisticApply | Reconciliation::NoOp if failures.is_empty() => {
                Ok(UploadReport {
                    outcomes,
                    refetched: false,
                })
            }
            Reconciliation::OptimisticApply | Reconciliation::NoOp => {
                Err(AppError::UploadRejected { failures })
            }
        }
    }

    pub async fn delete_one(
        &self,
        id: i64,
        gate: &dyn ConfirmGate,
    ) -> Result<DeleteOutcome, AppError> {
        if !gate.confirm(&format!("Delete candidate #{id}? This cannot be undone.")) {
            debug!("Deletion of candidate {id} declined");
            return Ok(DeleteOutcome::Declined);
        }

        if let Err(err) = self.backend.delete_candidate(id).await {
            return Err(self.report("Delete", err));
        }
        self.notify(Notice::success("Candidate deleted"));

        let ranked_view = self.read().requested_view.is_ranked();
        Ok(self
            .apply(reconcile(Trigger::DeleteOne { ranked_view }), |c| {
                c.id != id
            })
            .await)
    }

    pub async fn delete_all(&self, gate: &dyn ConfirmGate) -> Result<DeleteOutcome, AppError> {
        if !gate.confirm("Delete ALL candidates? This cannot be undone.") {
            debug!("Deletion of all candidates declined");
            return Ok(DeleteOutcome::Declined);
        }

        if let Err(err) = self.backend.delete_all().await {
            return Err(self.report("Delete all", err));
        }
        self.notify(Notice::success("All candidates deleted"));

        Ok(self.apply(reconcile(Trigger::DeleteAll), |_| false).await)
    }

    /// Carries out a reconciliation after a confirmed, successful deletion.
    /// `keep` decides which entries survive an optimistic apply.
    async fn apply<F>(&self, reconciliation: Reconciliation, keep: F) -> DeleteOutcome
    where
        F: Fn(&CandidateViewModel) -> bool,
    {
        match reconciliation {
            Reconciliation::OptimisticApply => {
                let mut state = self.write();
                let remaining: Vec<CandidateViewModel> =
                    state.candidates.iter().filter(|&c| keep(c)).cloned().collect();
                state.candidates = Arc::new(remaining);
                DeleteOutcome::Applied
            }
            Reconciliation::ForcedRefetch => {
                self.refetch().await;
                DeleteOutcome::Refetched
            }
            Reconciliation::NoOp => DeleteOutcome::Applied,
        }
    }
}
