//! Per-resource comment state and fetch orchestration.
//!
//! A store holds the last successfully fetched thread of one resource and
//! its comment count. Loads never merge: every successful fetch replaces the
//! list. Each load takes a ticket, and a response is only applied if no
//! newer load of the same kind started and the resource did not change in
//! the meantime, so a slow early response cannot overwrite a later one.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::comment::UniversalComment;
use crate::error::Result;
use crate::notify::{Notification, Notifier};
use crate::resource::ResourceRef;
use crate::service::CommentApi;
use crate::thread;

/// Tracing target for store operations.
pub const TRACING_TARGET: &str = "pantau_comment::store";

#[derive(Debug)]
struct StoreState {
    resource: ResourceRef,
    comments: Vec<UniversalComment>,
    count: u64,
    loading: bool,
    epoch: u64,
    list_generation: u64,
    count_generation: u64,
}

impl StoreState {
    fn new(resource: ResourceRef) -> Self {
        Self {
            resource,
            comments: Vec::new(),
            count: 0,
            loading: false,
            epoch: 0,
            list_generation: 0,
            count_generation: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket {
    epoch: u64,
    generation: u64,
}

struct StoreInner {
    api: CommentApi,
    notifier: Arc<dyn Notifier>,
    state: Mutex<StoreState>,
}

/// Comment list and count of one resource.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct CommentStore {
    inner: Arc<StoreInner>,
}

impl fmt::Debug for CommentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommentStore")
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl CommentStore {
    /// Creates an empty store for `resource`. Nothing is fetched yet.
    pub fn new(api: CommentApi, resource: ResourceRef, notifier: Arc<dyn Notifier>) -> Self {
        let inner = StoreInner {
            api,
            notifier,
            state: Mutex::new(StoreState::new(resource)),
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// The resource this store currently follows.
    pub fn resource(&self) -> ResourceRef {
        self.lock().resource
    }

    /// The last successfully loaded thread.
    pub fn comments(&self) -> Vec<UniversalComment> {
        self.lock().comments.clone()
    }

    /// The last known comment count.
    pub fn count(&self) -> u64 {
        self.lock().count
    }

    /// Returns true while a list load is in flight.
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Returns true if `id` is anywhere in the loaded thread.
    pub fn contains(&self, id: i64) -> bool {
        thread::find(&self.lock().comments, id).is_some()
    }

    /// Nesting level of comment `id` in the loaded thread.
    pub fn level_of(&self, id: i64) -> Option<usize> {
        thread::find(&self.lock().comments, id).map(|entry| entry.level)
    }

    /// Renders the loaded thread as text.
    pub fn render(&self) -> String {
        let state = self.lock();
        thread::render(&state.comments, state.count)
    }

    /// Switches to another resource, dropping the loaded thread.
    ///
    /// Loads still in flight for the previous resource are discarded when
    /// they complete. Returns false if `resource` is already current.
    pub fn set_resource(&self, resource: ResourceRef) -> bool {
        let mut state = self.lock();
        if state.resource == resource {
            return false;
        }

        let epoch = state.epoch + 1;
        *state = StoreState::new(resource);
        state.epoch = epoch;

        tracing::debug!(
            target: TRACING_TARGET,
            resource = %resource,
            epoch,
            "Comment store switched resource"
        );

        true
    }

    /// Loads the thread, then the count.
    ///
    /// Both steps run even if the first fails; the first error is returned.
    pub async fn refresh(&self) -> Result<()> {
        let comments = self.load_comments().await;
        let count = self.load_comment_count().await;
        comments.and(count.map(|_| ()))
    }

    /// Fetches the thread and replaces the loaded list.
    ///
    /// On failure the previous list stays, and an error notification is
    /// issued.
    pub async fn load_comments(&self) -> Result<()> {
        let (resource, ticket) = {
            let mut state = self.lock();
            state.list_generation += 1;
            state.loading = true;
            let ticket = Ticket {
                epoch: state.epoch,
                generation: state.list_generation,
            };
            (state.resource, ticket)
        };

        let result = self.inner.api.fetch_comments(resource).await;

        {
            let mut state = self.lock();
            if state.epoch != ticket.epoch || state.list_generation != ticket.generation {
                tracing::debug!(
                    target: TRACING_TARGET,
                    resource = %resource,
                    generation = ticket.generation,
                    latest = state.list_generation,
                    "Discarding stale comment list"
                );
                return Ok(());
            }

            state.loading = false;
            if let Ok(comments) = &result {
                tracing::debug!(
                    target: TRACING_TARGET,
                    resource = %resource,
                    comment_count = comments.len(),
                    "Comments loaded"
                );
                state.comments = comments.clone();
            }
        }

        if let Err(error) = &result {
            tracing::error!(
                target: TRACING_TARGET,
                resource = %resource,
                error = %error,
                "Failed to load comments"
            );
            self.inner
                .notifier
                .notify(Notification::from_error("Gagal memuat komentar", error));
        }

        result.map(|_| ())
    }

    /// Refreshes the comment count and returns it.
    ///
    /// Resources with a count endpoint ask the server; the others count the
    /// loaded top-level comments, which is only exact while the whole thread
    /// fits in one page.
    pub async fn load_comment_count(&self) -> Result<u64> {
        let (resource, ticket) = {
            let mut state = self.lock();
            if !state.resource.resource_type.has_count_endpoint() {
                state.count = state.comments.len() as u64;
                return Ok(state.count);
            }

            state.count_generation += 1;
            let ticket = Ticket {
                epoch: state.epoch,
                generation: state.count_generation,
            };
            (state.resource, ticket)
        };

        let result = self.inner.api.fetch_count(resource).await;

        let mut state = self.lock();
        if state.epoch != ticket.epoch || state.count_generation != ticket.generation {
            tracing::debug!(
                target: TRACING_TARGET,
                resource = %resource,
                "Discarding stale comment count"
            );
            return Ok(state.count);
        }

        match result {
            Ok(count) => {
                state.count = count.unwrap_or(state.comments.len() as u64);
                Ok(state.count)
            }
            Err(error) => {
                drop(state);
                tracing::error!(
                    target: TRACING_TARGET,
                    resource = %resource,
                    error = %error,
                    "Failed to load comment count"
                );
                self.inner.notifier.notify(Notification::from_error(
                    "Gagal memuat jumlah komentar",
                    &error,
                ));
                Err(error)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
