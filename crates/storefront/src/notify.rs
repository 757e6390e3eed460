//! User-facing cart notifications.
//!
//! Every failed cart operation produces exactly one [`Notice`]. Notifiers are
//! fire-and-forget: the store never waits on them and never learns whether the
//! message was shown.

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// A transient error message for the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    /// The requested quantity is above the available stock.
    StockExceeded,
    /// Adding a product failed for any other reason.
    AddFailed,
    /// Removing a product failed (usually: it was not in the cart).
    RemoveFailed,
    /// Changing a quantity failed for any other reason.
    UpdateFailed,
}

impl Notice {
    /// The message shown to the shopper.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::StockExceeded => "requested quantity exceeds stock",
            Self::AddFailed => "failed to add product",
            Self::RemoveFailed => "failed to remove product",
            Self::UpdateFailed => "failed to update quantity",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Displays notices to the shopper.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Emits notices as `tracing` warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        tracing::warn!(notice = ?notice, "{notice}");
    }
}

/// Keeps every notice in memory until taken.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far, oldest first.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain the recorded notices.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_messages_are_distinct() {
        let all = [
            Notice::StockExceeded,
            Notice::AddFailed,
            Notice::RemoveFailed,
            Notice::UpdateFailed,
        ];
        let mut messages: Vec<&str> = all.iter().map(|n| n.message()).collect();
        messages.sort_unstable();
        messages.dedup();
        assert_eq!(messages.len(), all.len());
    }

    #[test]
    fn test_notice_display() {
        assert_eq!(
            Notice::StockExceeded.to_string(),
            "requested quantity exceeds stock"
        );
    }

    #[test]
    fn test_recording_notifier_take_drains() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notice::AddFailed);
        notifier.notify(Notice::StockExceeded);

        assert_eq!(notifier.notices(), vec![Notice::AddFailed, Notice::StockExceeded]);
        assert_eq!(notifier.take().len(), 2);
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn test_tracing_notifier_does_not_panic() {
        TracingNotifier.notify(Notice::RemoveFailed);
    }
}
