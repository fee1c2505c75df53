//! User-visible notifications.
//!
//! Bulk outcomes are reported as short-lived toasts. [`ToastQueue`] keeps
//! them until the renderer takes them or they expire.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use log::debug;

/// Default duration for notifications.
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_secs(4);

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast message.
///
/// # Example
///
/// ```ignore
/// notifier.notify(Notification::success("Deleted 3 documents"));
/// notifier.notify(Notification::error("Bulk delete failed").with_duration(Duration::from_secs(8)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// How long to show the notification.
    pub duration: Duration,
}

impl Notification {
    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            duration: DEFAULT_NOTIFICATION_DURATION,
        }
    }

    /// Create an info notification.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    /// Create a success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    /// Create a warning notification.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    /// Create an error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    /// Set a custom duration for this notification.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

impl From<String> for Notification {
    fn from(message: String) -> Self {
        Notification::info(message)
    }
}

impl From<&str> for Notification {
    fn from(message: &str) -> Self {
        Notification::info(message)
    }
}

/// Receives user-visible notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Shared queue of notifications, newest last.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    items: Arc<Mutex<Vec<(Notification, Instant)>>>,
}

impl ToastQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications that have not expired at `now`, newest first.
    /// Expired ones are dropped.
    pub fn active(&self, now: Instant) -> Vec<Notification> {
        let Ok(mut items) = self.items.lock() else {
            return Vec::new();
        };
        items.retain(|(notification, shown_at)| {
            now.saturating_duration_since(*shown_at) < notification.duration
        });
        items.iter().rev().map(|(n, _)| n.clone()).collect()
    }

    /// Remove and return every queued notification, oldest first.
    pub fn take(&self) -> Vec<Notification> {
        self.items
            .lock()
            .map(|mut items| items.drain(..).map(|(n, _)| n).collect())
            .unwrap_or_default()
    }

    /// Queued notifications, oldest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.items
            .lock()
            .map(|items| items.iter().map(|(n, _)| n.clone()).collect())
            .unwrap_or_default()
    }

    /// Number of queued notifications.
    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, notification: Notification) {
        debug!("{:?}: {}", notification.level, notification.message);
        if let Ok(mut items) = self.items.lock() {
            items.push((notification, Instant::now()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_drops_expired() {
        let queue = ToastQueue::new();
        queue.notify(Notification::info("short").with_duration(Duration::from_millis(10)));
        queue.notify(Notification::success("long"));

        let later = Instant::now() + Duration::from_secs(1);
        let active = queue.active(later);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "long");
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_take_drains_in_order() {
        let queue = ToastQueue::new();
        queue.notify("first".into());
        queue.notify(Notification::error("second"));
        let taken = queue.take();
        assert_eq!(taken[0].level, NotificationLevel::Info);
        assert_eq!(taken[1].message, "second");
        assert!(queue.is_empty());
    }
}
