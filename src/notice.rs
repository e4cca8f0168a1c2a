//! Transient, auto-dismissing user notices ("toasts").

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    shown_at: Instant,
    ttl: Duration,
}

impl Notice {
    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < self.ttl
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// Holds the single visible notice. Showing a new one replaces the old one
/// and restarts the dismissal timer.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    current: Option<Notice>,
    ttl: Duration,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(message.into(), NoticeKind::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(message.into(), NoticeKind::Error);
    }

    fn show(&mut self, message: String, kind: NoticeKind) {
        log::debug!("Notice ({kind:?}): {message}");
        self.current = Some(Notice {
            message,
            kind,
            shown_at: Instant::now(),
            ttl: self.ttl,
        });
    }

    /// The notice still on screen at `now`, if any.
    pub fn visible(&self, now: Instant) -> Option<&Notice> {
        self.current.as_ref().filter(|n| n.is_visible_at(now))
    }

    /// Removes and returns the notice if it is still visible.
    pub fn take(&mut self, now: Instant) -> Option<Notice> {
        self.current.take().filter(|n| n.is_visible_at(now))
    }

    /// Most recent notice, ignoring expiry.
    pub fn latest(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    pub fn latest_message(&self) -> Option<&str> {
        self.current.as_ref().map(|n| n.message.as_str())
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::config::DEFAULT_NOTICE_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_notice_replaces_previous() {
        let mut board = NoticeBoard::default();
        board.success("Product added");
        board.error("Failed to delete");

        let notice = board.latest().unwrap();
        assert_eq!(notice.message, "Failed to delete");
        assert!(notice.is_error());
    }

    #[test]
    fn notice_dismisses_after_ttl() {
        let mut board = NoticeBoard::new(Duration::from_millis(100));
        board.success("Stock increased");
        let shown = Instant::now();

        assert!(board.visible(shown).is_some());
        assert!(board.visible(shown + Duration::from_millis(500)).is_none());
        // Still recorded even once hidden
        assert_eq!(board.latest_message(), Some("Stock increased"));
    }

    #[test]
    fn take_consumes_visible_notice() {
        let mut board = NoticeBoard::default();
        board.success("Logged out");
        let now = Instant::now();

        assert_eq!(board.take(now).unwrap().message, "Logged out");
        assert!(board.take(now).is_none());
    }

    #[test]
    fn take_drops_expired_notice() {
        let mut board = NoticeBoard::new(Duration::from_millis(10));
        board.error("old");
        assert!(board.take(Instant::now() + Duration::from_secs(1)).is_none());
        assert!(board.latest().is_none());
    }
}
