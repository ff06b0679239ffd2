//! Transient user notifications

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const DEFAULT_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    created: Instant,
    ttl: Duration,
}

impl Toast {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created) >= self.ttl
    }
}

/// Queue of auto-dismissing notifications.
///
/// Owned by the app and passed where needed, so tests can construct
/// isolated instances instead of sharing process-wide state. Expiry
/// happens on `tick`, driven by the main event loop.
#[derive(Debug, Default)]
pub struct ToastBus {
    toasts: VecDeque<Toast>,
}

impl ToastBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, ToastKind::Info, DEFAULT_TTL);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, ToastKind::Success, DEFAULT_TTL);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        // Errors linger a little longer
        self.push(message, ToastKind::Error, DEFAULT_TTL * 2);
    }

    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind, ttl: Duration) {
        self.toasts.push_back(Toast {
            message: message.into(),
            kind,
            created: Instant::now(),
            ttl,
        });
    }

    /// Drop expired toasts; called once per event-loop iteration
    pub fn tick(&mut self) {
        let now = Instant::now();
        while self.toasts.front().is_some_and(|t| t.is_expired(now)) {
            self.toasts.pop_front();
        }
    }

    /// Oldest live toast, shown in the status line
    pub fn current(&self) -> Option<&Toast> {
        self.toasts.front()
    }

    /// Dismiss the currently shown toast
    pub fn dismiss(&mut self) {
        self.toasts.pop_front();
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
