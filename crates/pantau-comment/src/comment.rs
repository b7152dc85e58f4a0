//! The normalized comment model shared by every resource type.

use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A comment in the shape common to all four backends.
///
/// Produced by [`normalize`](crate::normalize::normalize); never edited in
/// place by this crate, the whole list is replaced on every re-fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversalComment {
    /// Server-assigned id, unique within the resource's comment table.
    pub id: i64,
    /// Display name of the commenter.
    pub nama: String,
    /// Comment body.
    pub konten: String,
    /// Reference to the commenter's profile image, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foto: Option<String>,
    /// Creation time as sent by the server.
    pub created_at: String,
    /// Number of likes.
    pub likes: u64,
    /// Number of dislikes.
    pub dislikes: u64,
    /// Direct replies, in server order.
    #[serde(default)]
    pub replies: Vec<UniversalComment>,
    /// Id of the comment this one replies to; `None` for root comments.
    #[serde(default)]
    pub parent_id: Option<i64>,
}

impl UniversalComment {
    /// Returns true if this comment is not a reply.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Counts every reply below this comment, at any depth.
    pub fn total_replies(&self) -> usize {
        self.replies
            .iter()
            .map(|reply| 1 + reply.total_replies())
            .sum()
    }

    /// Parses the creation time.
    ///
    /// Instants (`2024-05-01T03:00:00Z`) are converted to UTC wall time;
    /// zone-less date-times (`2024-05-01T10:00:00`) are taken as-is.
    pub fn created_at(&self) -> Option<DateTime> {
        let raw = self.created_at.trim();
        if let Ok(timestamp) = raw.parse::<Timestamp>() {
            return Some(timestamp.to_zoned(TimeZone::UTC).datetime());
        }

        raw.parse::<DateTime>().ok()
    }

    /// Formats the creation time for display, e.g. `01 May 2024 10:00`.
    ///
    /// Falls back to the raw server string when it cannot be parsed.
    pub fn display_time(&self) -> String {
        match self.created_at() {
            Some(created_at) => created_at.strftime("%d %b %Y %H:%M").to_string(),
            None => self.created_at.clone(),
        }
    }
}
