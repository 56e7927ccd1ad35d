use std::sync::Mutex;

use serde::Serialize;
use tracing::{info, warn};

use super::cache::RecordCache;
use super::pending::PendingWrites;
use super::search::{matches_query, Searchable};
use crate::store::{DocumentId, DocumentStore};
use crate::submissions::{
    Moderated, StatusBadge, StatusMachine, SubmissionError, SubmissionKind, SubmissionService,
};

/// Where a list view is in its fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed { message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("record {0} already has an update in flight")]
    InFlight(DocumentId),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminListView<R> {
    pub state: LoadState,
    /// Size of the last successfully loaded collection, before filtering.
    pub total: usize,
    pub rows: Vec<R>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListRow<K> {
    #[serde(flatten)]
    pub record: K,
    pub busy: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = "K: Serialize"))]
pub struct ModerationRow<K: Moderated> {
    #[serde(flatten)]
    pub record: K,
    pub busy: bool,
    pub badge: StatusBadge,
    /// Transitions offered to the operator; empty while busy or once terminal.
    pub actions: Vec<K::Status>,
}

struct ControllerState<K> {
    load: LoadState,
    cache: RecordCache<K>,
}

/// Binds one submission collection to an admin view: a single fetch, in-memory search, and
/// status transitions merged into the local copy once the store confirms them.
///
/// State sits behind a mutex that is never held across an await, so transitions on different
/// records can run concurrently.
pub struct AdminListController<K, S: ?Sized> {
    service: SubmissionService<K, S>,
    state: Mutex<ControllerState<K>>,
    pending: PendingWrites,
}

impl<K, S> AdminListController<K, S>
where
    K: SubmissionKind + Searchable,
    S: DocumentStore + ?Sized,
{
    pub fn new(service: SubmissionService<K, S>) -> Self {
        Self {
            service,
            state: Mutex::new(ControllerState {
                load: LoadState::Idle,
                cache: RecordCache::default(),
            }),
            pending: PendingWrites::default(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ControllerState<K>> {
        self.state.lock().expect("controller mutex poisoned")
    }

    /// Fetch the collection once. On failure the previous records and count are kept.
    pub async fn activate(&self) -> Result<usize, ControllerError> {
        self.lock().load = LoadState::Loading;

        match self.service.list().await {
            Ok(records) => {
                let mut state = self.lock();
                state.cache.replace_all(records);
                state.load = LoadState::Ready;
                Ok(state.cache.len())
            }
            Err(err) => {
                warn!(collection = K::COLLECTION, error = %err, "admin list failed to load");
                self.lock().load = LoadState::Failed {
                    message: err.to_string(),
                };
                Err(err.into())
            }
        }
    }

    pub fn load_state(&self) -> LoadState {
        self.lock().load.clone()
    }

    /// Last known collection length; zero until the first successful load.
    pub fn total(&self) -> usize {
        self.lock().cache.len()
    }

    pub fn records(&self) -> Vec<K> {
        self.lock().cache.records().to_vec()
    }

    pub fn get(&self, id: &DocumentId) -> Option<K> {
        self.lock().cache.get(id).cloned()
    }

    /// Filter the loaded records without touching the store.
    pub fn search(&self, query: &str) -> Vec<K> {
        self.lock()
            .cache
            .iter()
            .filter(|record| matches_query(*record, query))
            .cloned()
            .collect()
    }

    pub fn is_in_flight(&self, id: &DocumentId) -> bool {
        self.pending.contains(id)
    }

    pub fn view(&self, query: &str) -> AdminListView<ListRow<K>> {
        let state = self.lock();
        AdminListView {
            state: state.load.clone(),
            total: state.cache.len(),
            rows: state
                .cache
                .iter()
                .filter(|record| matches_query(*record, query))
                .map(|record| ListRow {
                    busy: self.pending.contains(record.id()),
                    record: record.clone(),
                })
                .collect(),
        }
    }
}

impl<K, S> AdminListController<K, S>
where
    K: Moderated + Searchable,
    S: DocumentStore + ?Sized,
{
    /// Ask the service to move `id` to `next`. The local copy changes only after the store
    /// confirms the write; any failure leaves it untouched.
    pub async fn transition(
        &self,
        id: &DocumentId,
        next: K::Status,
    ) -> Result<K::Status, ControllerError> {
        let _pending = self.pending.claim(id)?;

        let status = self.service.update_status(id, next).await?;

        let merged = self.lock().cache.merge_status(id, status);
        info!(
            collection = K::COLLECTION,
            %id,
            status = status.label(),
            merged,
            "admin transition applied"
        );
        Ok(status)
    }

    /// Transitions currently offered for a cached record.
    pub fn available_transitions(&self, id: &DocumentId) -> Vec<K::Status> {
        if self.pending.contains(id) {
            return Vec::new();
        }
        self.lock()
            .cache
            .get(id)
            .map(|record| record.status().successors().to_vec())
            .unwrap_or_default()
    }

    pub fn moderation_view(&self, query: &str) -> AdminListView<ModerationRow<K>> {
        let state = self.lock();
        AdminListView {
            state: state.load.clone(),
            total: state.cache.len(),
            rows: state
                .cache
                .iter()
                .filter(|record| matches_query(*record, query))
                .map(|record| {
                    let busy = self.pending.contains(record.id());
                    let status = record.status();
                    ModerationRow {
                        record: record.clone(),
                        busy,
                        badge: status.badge(),
                        actions: if busy {
                            Vec::new()
                        } else {
                            status.successors().to_vec()
                        },
                    }
                })
                .collect(),
        }
    }
}
