//! Terminal notifications.

use std::sync::atomic::{AtomicBool, Ordering};

use pantau_comment::{Notification, NotificationLevel, Notifier};

/// Prints notifications to stderr and remembers whether any was an error.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    failed: AtomicBool,
}

impl ConsoleNotifier {
    /// Creates a notifier with no failures recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once an error notification has been printed.
    pub fn failed(&self) -> bool {
        self.failed.load(Ordering::Relaxed)
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        if notification.level == NotificationLevel::Error {
            self.failed.store(true, Ordering::Relaxed);
        }

        eprintln!("[{}] {}", notification.level, notification.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_errors_mark_failure() {
        let notifier = ConsoleNotifier::new();
        notifier.notify(Notification::success("Komentar berhasil dikirim"));
        notifier.notify(Notification::warning("Nama dan komentar wajib diisi"));
        assert!(!notifier.failed());

        notifier.notify(Notification::error("Gagal memuat komentar"));
        assert!(notifier.failed());
    }
}
