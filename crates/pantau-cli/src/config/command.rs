//! Subcommands.

use clap::{Args, Subcommand};
use pantau_comment::{ResourceRef, ResourceType};

/// A resource's comment thread.
#[derive(Debug, Clone, Args)]
pub struct Target {
    /// Resource type: berita, document, pelaksanaan or usulan
    pub resource: ResourceType,

    /// Resource id
    pub id: i64,
}

impl Target {
    /// The resource reference.
    pub fn resource_ref(&self) -> ResourceRef {
        ResourceRef::new(self.resource, self.id)
    }
}

/// Contents of a new comment or reply.
#[derive(Debug, Clone, Args)]
pub struct DraftArgs {
    /// Comment text
    #[arg(long)]
    pub konten: String,

    /// Display name (ignored when the session provides one)
    #[arg(long)]
    pub nama: Option<String>,
}

/// What the CLI does.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the comment thread and count
    List {
        #[command(flatten)]
        target: Target,

        /// Print the thread as JSON with resolved photo URLs
        #[arg(long)]
        json: bool,
    },

    /// Post a root comment
    Comment {
        #[command(flatten)]
        target: Target,

        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Reply to a comment
    Reply {
        #[command(flatten)]
        target: Target,

        /// Comment to reply to
        parent_id: i64,

        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Like a comment
    Like {
        #[command(flatten)]
        target: Target,

        /// Comment to like
        comment_id: i64,
    },

    /// Dislike a comment
    Dislike {
        #[command(flatten)]
        target: Target,

        /// Comment to dislike
        comment_id: i64,
    },
}

impl Command {
    /// The thread the command works on.
    pub fn target(&self) -> &Target {
        match self {
            Self::List { target, .. }
            | Self::Comment { target, .. }
            | Self::Reply { target, .. }
            | Self::Like { target, .. }
            | Self::Dislike { target, .. } => target,
        }
    }
}
