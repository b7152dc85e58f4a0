//! The comment section of one resource.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::comment::UniversalComment;
use crate::composer::{CommentPolicy, Draft, DraftKey, ReplyComposer};
use crate::error::Result;
use crate::notify::Notifier;
use crate::payload::ReactionKind;
use crate::reaction::ReactionController;
use crate::resource::ResourceRef;
use crate::service::CommentApi;
use crate::session::Session;
use crate::store::CommentStore;

/// Tracing target for section lifecycle events.
pub const TRACING_TARGET: &str = "pantau_comment::section";

/// Comment thread, compose forms and reactions of one resource.
///
/// Every operation takes `&self`, so reactions on different comments and
/// submissions of different forms can run concurrently. Failures are both
/// returned and delivered to the [`Notifier`].
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
///
/// use pantau_comment::reqwest::{ReqwestClient, ReqwestConfig};
/// use pantau_comment::{CommentSection, DraftKey, NotificationLog, ResourceRef, Session};
///
/// let client = ReqwestClient::new(ReqwestConfig::default())?;
/// let log = NotificationLog::new();
/// let section = CommentSection::new(client.into_api(), ResourceRef::usulan(42), Arc::new(log));
///
/// section.mount().await?;
/// section.set_konten(DraftKey::Root, "Mohon ditinjau ulang");
/// section.submit_comment().await?;
/// ```
#[derive(Debug)]
pub struct CommentSection {
    store: CommentStore,
    composer: ReplyComposer,
    reactions: ReactionController,
    session: Mutex<Session>,
}

impl CommentSection {
    /// Creates a section for `resource`. Nothing is fetched until [`mount`].
    ///
    /// [`mount`]: Self::mount
    pub fn new(api: CommentApi, resource: ResourceRef, notifier: Arc<dyn Notifier>) -> Self {
        let store = CommentStore::new(api.clone(), resource, notifier.clone());
        let composer = ReplyComposer::new(api.clone(), store.clone(), notifier.clone());
        let reactions = ReactionController::new(api, store.clone(), notifier);

        Self {
            store,
            composer,
            reactions,
            session: Mutex::new(Session::Anonymous),
        }
    }

    /// Sets who may post.
    #[must_use]
    pub fn with_policy(mut self, policy: CommentPolicy) -> Self {
        self.composer = self.composer.with_policy(policy);
        self
    }

    /// Sets the acting user.
    #[must_use]
    pub fn with_session(self, session: Session) -> Self {
        self.set_session(session);
        self
    }

    /// Resets the forms and loads the thread and count.
    pub async fn mount(&self) -> Result<()> {
        tracing::debug!(
            target: TRACING_TARGET,
            resource = %self.store.resource(),
            "Mounting comment section"
        );

        self.composer.reset(&self.session());
        self.store.refresh().await
    }

    /// Points the section at another resource and reloads it.
    ///
    /// Does nothing if `resource` is already current.
    pub async fn set_resource(&self, resource: ResourceRef) -> Result<()> {
        if !self.store.set_resource(resource) {
            return Ok(());
        }

        self.composer.reset(&self.session());
        self.store.refresh().await
    }

    /// Replaces the acting user and re-applies the name pre-fill.
    pub fn set_session(&self, session: Session) {
        tracing::debug!(
            target: TRACING_TARGET,
            authenticated = session.is_authenticated(),
            "Comment section session changed"
        );

        self.composer.reset(&session);
        *self.lock_session() = session;
    }

    /// The acting user.
    pub fn session(&self) -> Session {
        self.lock_session().clone()
    }

    /// The resource this section shows.
    pub fn resource(&self) -> ResourceRef {
        self.store.resource()
    }

    /// The loaded thread.
    pub fn comments(&self) -> Vec<UniversalComment> {
        self.store.comments()
    }

    /// The last known comment count.
    pub fn count(&self) -> u64 {
        self.store.count()
    }

    /// Returns true while the thread is loading.
    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    /// Renders the thread as text.
    pub fn render(&self) -> String {
        self.store.render()
    }

    /// Likes comment `comment_id`.
    pub async fn like(&self, comment_id: i64) -> Result<()> {
        self.reactions
            .react(&self.session(), comment_id, ReactionKind::Like)
            .await
    }

    /// Dislikes comment `comment_id`.
    pub async fn dislike(&self, comment_id: i64) -> Result<()> {
        self.reactions
            .react(&self.session(), comment_id, ReactionKind::Dislike)
            .await
    }

    /// Returns true while a reaction on `comment_id` is pending.
    pub fn is_reacting(&self, comment_id: i64) -> bool {
        self.reactions.is_busy(comment_id)
    }

    /// Returns true when the name field is read-only.
    pub fn name_locked(&self) -> bool {
        self.composer.name_locked(&self.session())
    }

    /// A copy of a form's draft, if the form is open.
    pub fn draft(&self, key: DraftKey) -> Option<Draft> {
        self.composer.draft(key)
    }

    /// Updates a form's name field. Returns false if ignored.
    pub fn set_nama(&self, key: DraftKey, nama: impl Into<String>) -> bool {
        self.composer.set_nama(&self.session(), key, nama)
    }

    /// Updates a form's comment text. Returns false if the form is not open.
    pub fn set_konten(&self, key: DraftKey, konten: impl Into<String>) -> bool {
        self.composer.set_konten(key, konten)
    }

    /// Opens the reply form under `parent_id`.
    pub fn open_reply(&self, parent_id: i64) -> bool {
        self.composer.open_reply(&self.session(), parent_id)
    }

    /// Closes the reply form under `parent_id`.
    pub fn close_reply(&self, parent_id: i64) {
        self.composer.close_reply(parent_id);
    }

    /// Submits the root comment form.
    pub async fn submit_comment(&self) -> Result<()> {
        self.composer.submit(&self.session(), DraftKey::Root).await
    }

    /// Submits the reply form under `parent_id`.
    pub async fn submit_reply(&self, parent_id: i64) -> Result<()> {
        self.composer
            .submit(&self.session(), DraftKey::Reply(parent_id))
            .await
    }

    /// Returns true while a form's submission is in flight.
    pub fn is_submitting(&self, key: DraftKey) -> bool {
        self.composer.is_submitting(key)
    }

    fn lock_session(&self) -> MutexGuard<'_, Session> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
