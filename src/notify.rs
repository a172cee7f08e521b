//! Transient, auto-dismissing notifications

use std::time::{Duration, Instant};

use crate::constants::NOTIFICATION_TTL;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub expires: Instant,
}

/// Queue of live notifications, oldest first
#[derive(Clone, Debug)]
pub struct Notifications {
    items: Vec<Notification>,
    ttl: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Notifications::new(NOTIFICATION_TTL)
    }
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Notifications {
            items: Vec::new(),
            ttl,
        }
    }

    pub fn push_at(&mut self, message: impl Into<String>, severity: Severity, now: Instant) {
        self.items.push(Notification {
            message: message.into(),
            severity,
            expires: now + self.ttl,
        });
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity) {
        self.push_at(message, severity, Instant::now());
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Info);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Success);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Warning);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error);
    }

    /// Drop expired notifications; true when anything was removed
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.expires > now);
        self.items.len() != before
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_expire_after_ttl() {
        let start = Instant::now();
        let mut queue = Notifications::new(Duration::from_secs(3));
        queue.push_at("saved", Severity::Success, start);
        queue.push_at("boom", Severity::Error, start + Duration::from_secs(2));

        assert!(!queue.expire(start + Duration::from_secs(1)));
        assert!(queue.expire(start + Duration::from_secs(3)));
        assert_eq!(queue.items().len(), 1);
        assert_eq!(queue.items()[0].severity, Severity::Error);
        assert!(queue.expire(start + Duration::from_secs(6)));
        assert!(queue.is_empty());
    }
}
