//! Debounced serialization.
//!
//! Every change restarts the idle window; HTML is produced once the window
//! passes without further changes. Callers supply the clock, so nothing here
//! sleeps or spawns.

use std::time::{Duration, Instant};

use crate::editing::{Cmd, Document, Patch};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Trailing-edge debounce over caller-supplied instants
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    /// When the most recent change arrived, if not yet emitted
    last_change: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_change: None,
        }
    }

    pub fn mark_changed(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_change.is_some()
    }

    /// True once `window` has passed since the last change.
    pub fn is_due(&self, now: Instant) -> bool {
        self.last_change
            .is_some_and(|last| now.saturating_duration_since(last) >= self.window)
    }

    pub fn clear(&mut self) {
        self.last_change = None;
    }
}

/// A document plus the debounced HTML handed to the outside world.
pub struct EditSession {
    document: Document,
    debouncer: Debouncer,
    last_html: String,
}

impl EditSession {
    pub fn new(document: Document, window: Duration) -> Self {
        let last_html = document.to_html();
        Self {
            document,
            debouncer: Debouncer::new(window),
            last_html,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// HTML from the most recent `poll` or `flush`.
    pub fn last_html(&self) -> &str {
        &self.last_html
    }

    pub fn is_dirty(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn apply(&mut self, cmd: Cmd, now: Instant) -> Patch {
        let patch = self.document.apply(cmd);
        if patch.changed {
            self.debouncer.mark_changed(now);
        }
        patch
    }

    /// Fresh HTML if a burst of changes has gone quiet, at most once per burst.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if !self.debouncer.is_due(now) {
            return None;
        }
        Some(self.flush())
    }

    /// Serialize now, whether or not anything is pending.
    pub fn flush(&mut self) -> String {
        self.debouncer.clear();
        self.last_html = self.document.to_html();
        log::debug!(
            "serialized version {} ({} bytes)",
            self.document.version(),
            self.last_html.len()
        );
        self.last_html.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::BlockUpdate;
    use crate::models::{BlockId, BlockType};

    const WINDOW: Duration = Duration::from_millis(500);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn burst_of_edits_serializes_once() {
        let start = Instant::now();
        let mut session = EditSession::new(Document::new(), WINDOW);
        let id = session.document().blocks()[0].id;

        for (i, text) in ["a", "ab", "abc"].into_iter().enumerate() {
            session.apply(
                Cmd::Update {
                    id,
                    update: BlockUpdate::content(text),
                },
                start + ms(100 * i as u64),
            );
        }

        assert_eq!(session.poll(start + ms(600)), None);
        let html = session.poll(start + ms(700)).expect("window elapsed");
        assert!(html.contains("abc"));
        assert_eq!(session.poll(start + ms(5000)), None);
        assert_eq!(session.last_html(), html);
    }

    #[test]
    fn no_ops_do_not_schedule_serialization() {
        let start = Instant::now();
        let mut session = EditSession::new(Document::new(), WINDOW);

        session.apply(Cmd::Delete { id: BlockId::new() }, start);

        assert!(!session.is_dirty());
        assert_eq!(session.poll(start + ms(1000)), None);
    }

    #[test]
    fn flush_reflects_latest_state() {
        let start = Instant::now();
        let mut session = EditSession::new(Document::new(), WINDOW);
        let id = session.document().blocks()[0].id;
        session.apply(
            Cmd::Insert {
                after: id,
                block_type: BlockType::Divider,
            },
            start,
        );

        let html = session.flush();

        assert_eq!(html, session.document().to_html());
        assert!(!session.is_dirty());
        assert_eq!(session.poll(start + ms(1000)), None);
    }

    #[test]
    fn clock_going_backwards_is_not_due() {
        let start = Instant::now() + ms(1000);
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.mark_changed(start);
        assert!(!debouncer.is_due(start - ms(10)));
        assert!(debouncer.is_due(start + WINDOW));
    }
}
