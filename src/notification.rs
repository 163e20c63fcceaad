use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(2500);

pub const INVALID_URLS_MESSAGE: &str = "Kindly enter valid URLs";
pub const REQUEST_FAILED_MESSAGE: &str = "Something went wrong, or try again with valid URLs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Validation,
    RequestFailed,
}

/// A transient, non-blocking message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub raised_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant, lifetime: Duration) -> bool {
        now.saturating_duration_since(self.raised_at) >= lifetime
    }
}

/// Toast queue. Entries expire after `lifetime`, and any user interaction
/// dismisses all of them.
#[derive(Debug, Clone)]
pub struct Notifications {
    lifetime: Duration,
    queue: VecDeque<Notification>,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl Notifications {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            queue: VecDeque::new(),
        }
    }

    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>, now: Instant) {
        self.queue.push_back(Notification {
            kind,
            message: message.into(),
            raised_at: now,
        });
    }

    /// Drops expired toasts and returns the ones still visible, oldest first.
    pub fn active(&mut self, now: Instant) -> impl Iterator<Item = &Notification> {
        let lifetime = self.lifetime;
        self.queue.retain(|n| !n.is_expired(now, lifetime));
        self.queue.iter()
    }

    pub fn dismiss_all(&mut self) {
        self.queue.clear();
    }

    /// Everything raised and not yet dismissed or pruned, regardless of age.
    pub fn pending(&self) -> impl Iterator<Item = &Notification> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
