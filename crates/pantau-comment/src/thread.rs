//! Depth-aware views over a comment tree.
//!
//! Root comments sit at level 0. The reply control is offered only below
//! [`MAX_REPLY_DEPTH`], so threads nest at most three replies deep even
//! though the model itself has no limit.

use std::fmt::Write;

use crate::comment::UniversalComment;

/// Comments at this level or deeper cannot be replied to.
pub const MAX_REPLY_DEPTH: usize = 3;

/// Shown when a resource has no comments.
pub const EMPTY_MESSAGE: &str = "Belum ada komentar";

/// Label of the reply control.
pub const REPLY_LABEL: &str = "Balas";

/// Returns true if a comment at `level` offers the reply control.
pub const fn can_reply(level: usize) -> bool {
    level < MAX_REPLY_DEPTH
}

/// A comment together with its nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadEntry<'a> {
    /// The comment.
    pub comment: &'a UniversalComment,
    /// Nesting level, 0 for roots.
    pub level: usize,
}

impl ThreadEntry<'_> {
    /// Returns true if this comment offers the reply control.
    pub fn can_reply(&self) -> bool {
        can_reply(self.level)
    }
}

/// Lists every comment in display order (pre-order) with its level.
pub fn walk(comments: &[UniversalComment]) -> Vec<ThreadEntry<'_>> {
    let mut entries = Vec::new();
    let mut stack = comments
        .iter()
        .rev()
        .map(|comment| ThreadEntry { comment, level: 0 })
        .collect::<Vec<_>>();

    while let Some(entry) = stack.pop() {
        stack.extend(entry.comment.replies.iter().rev().map(|reply| ThreadEntry {
            comment: reply,
            level: entry.level + 1,
        }));
        entries.push(entry);
    }

    entries
}

/// Finds a comment anywhere in the tree.
pub fn find(comments: &[UniversalComment], id: i64) -> Option<ThreadEntry<'_>> {
    walk(comments)
        .into_iter()
        .find(|entry| entry.comment.id == id)
}

/// Renders the thread as indented text.
pub fn render(comments: &[UniversalComment], count: u64) -> String {
    let mut output = format!("Komentar ({count})\n");
    if comments.is_empty() {
        output.push_str(EMPTY_MESSAGE);
        output.push('\n');
        return output;
    }

    for entry in walk(comments) {
        let comment = entry.comment;
        let indent = "  ".repeat(entry.level);
        let _ = writeln!(
            output,
            "{indent}#{} {} · {}",
            comment.id,
            comment.nama,
            comment.display_time()
        );
        let _ = writeln!(output, "{indent}  {}", comment.konten);

        let mut actions = format!("👍 {}  👎 {}", comment.likes, comment.dislikes);
        if entry.can_reply() {
            let _ = write!(actions, "  [{REPLY_LABEL}]");
        }
        let _ = writeln!(output, "{indent}  {actions}");
    }

    output
}
