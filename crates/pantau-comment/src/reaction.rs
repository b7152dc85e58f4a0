//! Like and dislike handling.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::flags::InFlightSet;
use crate::notify::{Notification, Notifier};
use crate::payload::{ReactionBody, ReactionKind};
use crate::resource::ResourceRef;
use crate::service::CommentApi;
use crate::session::Session;
use crate::store::CommentStore;

/// Tracing target for reactions.
pub const TRACING_TARGET: &str = "pantau_comment::reaction";

/// Sends reactions for one comment section.
///
/// Each comment has its own in-flight flag, shared by like and dislike and
/// keyed by the resource it belongs to. While a reaction on a comment is
/// pending, further reactions on that comment are refused; reactions on
/// other comments proceed.
pub struct ReactionController {
    api: CommentApi,
    store: CommentStore,
    notifier: Arc<dyn Notifier>,
    pending: InFlightSet<(ResourceRef, i64)>,
}

impl fmt::Debug for ReactionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactionController")
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl ReactionController {
    /// Creates a controller reacting on the store's resource.
    pub fn new(api: CommentApi, store: CommentStore, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            store,
            notifier,
            pending: InFlightSet::new(),
        }
    }

    /// Returns true while a reaction on `comment_id` of the current
    /// resource is pending.
    pub fn is_busy(&self, comment_id: i64) -> bool {
        self.pending.contains(&(self.store.resource(), comment_id))
    }

    /// Likes or dislikes a comment, then reloads the thread.
    ///
    /// Requires a logged-in user with a linked biography. The comment stays
    /// busy until the reload has finished.
    pub async fn react(&self, session: &Session, comment_id: i64, kind: ReactionKind) -> Result<()> {
        let result = self.try_react(session, comment_id, kind).await;

        match &result {
            Ok(()) => {
                let message = match kind {
                    ReactionKind::Like => "Komentar disukai",
                    ReactionKind::Dislike => "Komentar tidak disukai",
                };
                self.notifier.notify(Notification::success(message));
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    comment_id,
                    reaction = %kind,
                    error = %error,
                    "Reaction failed"
                );
                self.notifier
                    .notify(Notification::from_error("Gagal memberi reaksi", error));
            }
        }

        result
    }

    async fn try_react(&self, session: &Session, comment_id: i64, kind: ReactionKind) -> Result<()> {
        let Some(user) = session.user() else {
            return Err(Error::authentication()
                .with_message("Silakan login terlebih dahulu untuk memberi reaksi"));
        };
        let Some(biografi_id) = session.biografi_id() else {
            return Err(Error::authorization()
                .with_message("Lengkapi biografi Anda terlebih dahulu untuk memberi reaksi"));
        };

        let resource = self.store.resource();
        let _pending = self.pending.try_begin((resource, comment_id)).ok_or_else(|| {
            Error::conflict().with_message("Reaksi sebelumnya masih diproses")
        })?;

        let body = ReactionBody {
            biografi_id,
            user_name: user.reaction_name().to_owned(),
        };

        tracing::debug!(
            target: TRACING_TARGET,
            resource = %resource,
            comment_id,
            reaction = %kind,
            "Sending reaction"
        );

        self.api.react(resource, comment_id, kind, &body).await?;

        // Reload failures are reported by the store itself.
        let _ = self.store.load_comments().await;
        Ok(())
    }
}
