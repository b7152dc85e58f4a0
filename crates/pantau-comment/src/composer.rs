//! Root comment and reply submission.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{Error, Result};
use crate::flags::InFlightSet;
use crate::notify::{Notification, Notifier};
use crate::payload::CommentBody;
use crate::service::CommentApi;
use crate::session::Session;
use crate::store::CommentStore;
use crate::thread::{self, MAX_REPLY_DEPTH};

/// Tracing target for comment submission.
pub const TRACING_TARGET: &str = "pantau_comment::composer";

/// Which compose form a draft belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftKey {
    /// The form for a new root comment.
    Root,
    /// The reply form under comment `parent_id`.
    Reply(i64),
}

impl DraftKey {
    fn parent_id(&self) -> Option<i64> {
        match self {
            Self::Root => None,
            Self::Reply(parent_id) => Some(*parent_id),
        }
    }
}

/// Contents of a compose form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Draft {
    /// Display name.
    #[validate(custom(function = "not_blank"))]
    pub nama: String,
    /// Comment text.
    #[validate(custom(function = "not_blank"))]
    pub konten: String,
}

impl Draft {
    /// Creates a draft with the name pre-filled from `session`.
    pub fn for_session(session: &Session) -> Self {
        Self {
            nama: session.prefill_name().unwrap_or_default().to_owned(),
            konten: String::new(),
        }
    }
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }

    Ok(())
}

/// Who may post comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPolicy {
    /// Whether visitors who are not logged in may post.
    pub allow_anonymous: bool,
}

impl Default for CommentPolicy {
    fn default() -> Self {
        Self {
            allow_anonymous: true,
        }
    }
}

#[derive(Debug, Default)]
struct ComposerState {
    root: Draft,
    replies: HashMap<i64, Draft>,
}

/// Compose forms of one comment section and their submission.
///
/// Holds the root form plus any number of open reply forms, keyed by the
/// comment being replied to.
pub struct ReplyComposer {
    api: CommentApi,
    store: CommentStore,
    notifier: Arc<dyn Notifier>,
    policy: CommentPolicy,
    state: Mutex<ComposerState>,
    submitting: InFlightSet<DraftKey>,
}

impl fmt::Debug for ReplyComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplyComposer")
            .field("policy", &self.policy)
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl ReplyComposer {
    /// Creates a composer posting to the store's resource.
    pub fn new(api: CommentApi, store: CommentStore, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            store,
            notifier,
            policy: CommentPolicy::default(),
            state: Mutex::new(ComposerState::default()),
            submitting: InFlightSet::new(),
        }
    }

    /// Sets who may post.
    #[must_use]
    pub fn with_policy(mut self, policy: CommentPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Clears every form and pre-fills the root form's name.
    pub fn reset(&self, session: &Session) {
        let mut state = self.lock();
        state.root = Draft::for_session(session);
        state.replies.clear();
    }

    /// Returns true when the name field should be read-only for `session`.
    ///
    /// This only discourages impersonation; the server does not enforce it.
    pub fn name_locked(&self, session: &Session) -> bool {
        session.prefill_name().is_some()
    }

    /// Returns a copy of a form's draft, if that form is open.
    pub fn draft(&self, key: DraftKey) -> Option<Draft> {
        let state = self.lock();
        match key {
            DraftKey::Root => Some(state.root.clone()),
            DraftKey::Reply(parent_id) => state.replies.get(&parent_id).cloned(),
        }
    }

    /// Opens the reply form under `parent_id`, pre-filling the name.
    ///
    /// Returns false if the comment is not loaded or too deeply nested to
    /// take replies.
    pub fn open_reply(&self, session: &Session, parent_id: i64) -> bool {
        let replyable = self
            .store
            .level_of(parent_id)
            .is_some_and(thread::can_reply);
        if !replyable {
            return false;
        }

        self.lock()
            .replies
            .entry(parent_id)
            .or_insert_with(|| Draft::for_session(session));
        true
    }

    /// Closes the reply form under `parent_id`, dropping its draft.
    pub fn close_reply(&self, parent_id: i64) {
        self.lock().replies.remove(&parent_id);
    }

    /// Returns the ids of comments with an open reply form.
    pub fn open_replies(&self) -> Vec<i64> {
        let mut ids = self.lock().replies.keys().copied().collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }

    /// Updates the name field. Ignored while the name is locked.
    pub fn set_nama(&self, session: &Session, key: DraftKey, nama: impl Into<String>) -> bool {
        if self.name_locked(session) {
            tracing::debug!(
                target: TRACING_TARGET,
                "Ignoring name change on a pre-filled form"
            );
            return false;
        }

        self.update(key, |draft| draft.nama = nama.into())
    }

    /// Updates the comment text.
    pub fn set_konten(&self, key: DraftKey, konten: impl Into<String>) -> bool {
        self.update(key, |draft| draft.konten = konten.into())
    }

    /// Returns true while the form's submission is in flight.
    pub fn is_submitting(&self, key: DraftKey) -> bool {
        self.submitting.contains(&key)
    }

    /// Validates and posts a form, then reloads the thread.
    ///
    /// On success the form is cleared (a reply form is closed) and a success
    /// notification is issued. On failure the draft is left as it was and an
    /// error or warning notification is issued. Nothing is sent when
    /// validation fails.
    pub async fn submit(&self, session: &Session, key: DraftKey) -> Result<()> {
        let result = self.try_submit(session, key).await;

        let (done, failed) = match key {
            DraftKey::Root => ("Komentar berhasil dikirim", "Gagal mengirim komentar"),
            DraftKey::Reply(_) => ("Balasan berhasil dikirim", "Gagal mengirim balasan"),
        };

        match &result {
            Ok(()) => self.notifier.notify(Notification::success(done)),
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    parent_id = ?key.parent_id(),
                    error = %error,
                    "Comment submission failed"
                );
                self.notifier.notify(Notification::from_error(failed, error));
            }
        }

        result
    }

    async fn try_submit(&self, session: &Session, key: DraftKey) -> Result<()> {
        if !self.policy.allow_anonymous && !session.is_authenticated() {
            return Err(Error::authentication()
                .with_message("Silakan login terlebih dahulu untuk berkomentar"));
        }

        let draft = self.draft(key).ok_or_else(|| {
            Error::invalid_input().with_message("Form balasan belum dibuka")
        })?;
        draft.validate().map_err(|errors| {
            Error::from(errors).with_message("Nama dan komentar wajib diisi")
        })?;

        if let DraftKey::Reply(parent_id) = key {
            self.check_reply_target(parent_id)?;
        }

        let _submitting = self.submitting.try_begin(key).ok_or_else(|| {
            Error::conflict().with_message("Komentar sedang dikirim")
        })?;

        let resource = self.store.resource();
        let body = CommentBody {
            nama: draft.nama.trim().to_owned(),
            konten: draft.konten.trim().to_owned(),
            foto: None,
            biografi_id: session.biografi_id(),
            parent_id: key.parent_id(),
        };

        tracing::debug!(
            target: TRACING_TARGET,
            resource = %resource,
            parent_id = ?body.parent_id,
            has_biografi = body.biografi_id.is_some(),
            "Submitting comment"
        );

        match key {
            DraftKey::Root => self.api.create_comment(resource, &body).await?,
            DraftKey::Reply(parent_id) => self.api.reply(resource, parent_id, &body).await?,
        };

        tracing::info!(
            target: TRACING_TARGET,
            resource = %resource,
            parent_id = ?body.parent_id,
            "Comment submitted"
        );

        match key {
            DraftKey::Root => self.lock().root = Draft::for_session(session),
            DraftKey::Reply(parent_id) => self.close_reply(parent_id),
        }

        // Reload failures are reported by the store itself.
        let _ = self.store.refresh().await;
        Ok(())
    }

    fn check_reply_target(&self, parent_id: i64) -> Result<()> {
        match self.store.level_of(parent_id) {
            None => Err(Error::invalid_input().with_message("Komentar yang dibalas tidak ditemukan")),
            Some(level) if !thread::can_reply(level) => Err(Error::invalid_input().with_message(
                format!("Balasan hanya dapat bersarang hingga {MAX_REPLY_DEPTH} tingkat"),
            )),
            Some(_) => Ok(()),
        }
    }

    fn update(&self, key: DraftKey, apply: impl FnOnce(&mut Draft)) -> bool {
        let mut state = self.lock();
        let draft = match key {
            DraftKey::Root => Some(&mut state.root),
            DraftKey::Reply(parent_id) => state.replies.get_mut(&parent_id),
        };

        match draft {
            Some(draft) => {
                apply(draft);
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ComposerState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
