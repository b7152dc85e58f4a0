//! Subcommand execution against a comment section.

use std::sync::Arc;

use anyhow::{Context, bail};
use pantau_comment::reqwest::{ReqwestClient, ReqwestConfig};
use pantau_comment::{CommentSection, DraftKey, Notifier, UniversalComment};

use crate::TRACING_TARGET_ACTION;
use crate::config::{Cli, Command, DraftArgs};

/// Runs the parsed command.
///
/// The section is mounted first, so every command works on a freshly
/// loaded thread.
pub async fn execute(cli: &Cli, notifier: Arc<dyn Notifier>) -> anyhow::Result<()> {
    let client =
        ReqwestClient::new(cli.client.clone()).context("failed to create API client")?;
    let resource = cli.command.target().resource_ref();

    let section = CommentSection::new(client.into_api(), resource, notifier)
        .with_policy(cli.session.policy())
        .with_session(cli.session.session());

    tracing::debug!(
        target: TRACING_TARGET_ACTION,
        resource = %resource,
        "Loading comment section"
    );
    section
        .mount()
        .await
        .with_context(|| format!("failed to load comments of {resource}"))?;

    match &cli.command {
        Command::List { json: true, .. } => {
            let comments = resolve_photos(section.comments(), &cli.client);
            let output =
                serde_json::to_string_pretty(&comments).context("failed to encode comments")?;
            println!("{output}");
        }
        Command::List { json: false, .. } => print!("{}", section.render()),
        Command::Comment { draft, .. } => {
            fill(&section, DraftKey::Root, draft);
            section
                .submit_comment()
                .await
                .context("failed to post comment")?;
            print!("{}", section.render());
        }
        Command::Reply {
            parent_id, draft, ..
        } => {
            if !section.open_reply(*parent_id) {
                bail!("comment {parent_id} is not in {resource} or cannot take replies");
            }
            fill(&section, DraftKey::Reply(*parent_id), draft);
            section
                .submit_reply(*parent_id)
                .await
                .context("failed to post reply")?;
            print!("{}", section.render());
        }
        Command::Like { comment_id, .. } => {
            section
                .like(*comment_id)
                .await
                .context("failed to like comment")?;
        }
        Command::Dislike { comment_id, .. } => {
            section
                .dislike(*comment_id)
                .await
                .context("failed to dislike comment")?;
        }
    }

    Ok(())
}

fn fill(section: &CommentSection, key: DraftKey, draft: &DraftArgs) {
    if let Some(nama) = &draft.nama
        && !section.set_nama(key, nama.clone())
    {
        tracing::warn!(
            target: TRACING_TARGET_ACTION,
            "Ignoring --nama, the session provides the display name"
        );
    }
    section.set_konten(key, draft.konten.clone());
}

/// Replaces photo references with absolute URLs, recursively.
fn resolve_photos(comments: Vec<UniversalComment>, config: &ReqwestConfig) -> Vec<UniversalComment> {
    comments
        .into_iter()
        .map(|mut comment| {
            comment.foto = comment
                .foto
                .as_deref()
                .and_then(|foto| config.asset_url(foto))
                .map(String::from);
            comment.replies = resolve_photos(comment.replies, config);
            comment
        })
        .collect()
}
