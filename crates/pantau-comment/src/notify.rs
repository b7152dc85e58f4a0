//! User-facing notifications.
//!
//! Every failure in a comment section ends here: it is logged and handed to
//! a [`Notifier`], which the embedding application renders as a toast,
//! a status line, or anything else.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::error::{Error, ErrorKind};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationLevel {
    /// The operation succeeded.
    Success,
    /// Neutral information.
    Info,
    /// The operation was refused before anything was sent.
    Warning,
    /// The operation failed.
    Error,
}

/// A message for the person operating the section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Human-readable message.
    pub message: String,
}

impl Notification {
    /// Creates a success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    /// Creates an informational notification.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    /// Creates a warning notification.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    /// Creates an error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    /// Builds the notification for a failed operation.
    ///
    /// Refusals raised before any request was answered become warnings
    /// carrying the error message. Server and network failures, including
    /// 4xx answers, become errors prefixed with `action`.
    pub fn from_error(action: &str, error: &Error) -> Self {
        if error.is_refusal() {
            let message = error
                .message
                .clone()
                .unwrap_or_else(|| action.to_owned());
            return Self::warning(message);
        }

        let reason = match error.kind {
            ErrorKind::Timeout => "server tidak merespons".to_owned(),
            ErrorKind::NetworkError => "tidak dapat terhubung ke server".to_owned(),
            _ => error
                .message
                .clone()
                .unwrap_or_else(|| error.kind.to_string()),
        };

        Self::error(format!("{action}: {reason}"))
    }
}

/// Receiver of user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Delivers one notification.
    fn notify(&self, notification: Notification);
}

/// A notifier that keeps every notification in memory.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all notifications so far.
    pub fn entries(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    /// Removes and returns all notifications so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.lock())
    }

    /// Returns the most recent notification.
    pub fn last(&self) -> Option<Notification> {
        self.lock().last().cloned()
    }

    /// Returns true if any notification has the given level.
    pub fn contains_level(&self, level: NotificationLevel) -> bool {
        self.lock().iter().any(|entry| entry.level == level)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        self.lock().push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_collects_and_drains() {
        let log = NotificationLog::new();
        log.notify(Notification::success("Komentar berhasil dikirim"));
        log.notify(Notification::error("Gagal"));

        assert_eq!(log.entries().len(), 2);
        assert!(log.contains_level(NotificationLevel::Error));
        assert_eq!(log.last().unwrap().message, "Gagal");

        assert_eq!(log.drain().len(), 2);
        assert!(log.entries().is_empty());
    }

    #[test]
    fn test_clones_share_entries() {
        let log = NotificationLog::new();
        let clone = log.clone();
        clone.notify(Notification::info("hi"));
        assert_eq!(log.entries().len(), 1);
    }

    #[test]
    fn test_from_error_levels() {
        let refused = Error::invalid_input().with_message("Nama dan komentar wajib diisi");
        let notification = Notification::from_error("Gagal mengirim komentar", &refused);
        assert_eq!(notification.level, NotificationLevel::Warning);
        assert_eq!(notification.message, "Nama dan komentar wajib diisi");

        let failed = Error::from_status(500);
        let notification = Notification::from_error("Gagal mengirim komentar", &failed);
        assert_eq!(notification.level, NotificationLevel::Error);
        assert_eq!(notification.message, "Gagal mengirim komentar: HTTP 500");

        let rejected = Error::from_status(401);
        let notification = Notification::from_error("Gagal memuat komentar", &rejected);
        assert_eq!(notification.level, NotificationLevel::Error);
        assert_eq!(notification.message, "Gagal memuat komentar: HTTP 401");

        let offline = Error::network_error();
        let notification = Notification::from_error("Gagal memuat komentar", &offline);
        assert!(notification.message.ends_with("tidak dapat terhubung ke server"));
    }
}
