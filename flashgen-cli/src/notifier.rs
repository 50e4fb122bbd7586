use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use flashgen_core::{NoticeId, Notifier};

/// Prints notices to stderr. Timed notices simply stay in the scrollback.
#[derive(Default)]
pub struct TerminalNotifier {
    next: AtomicU64,
}

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str, duration: Option<Duration>) -> NoticeId {
        let id = NoticeId(self.next.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(notice = id.0, ?duration, "Showing notice");
        eprintln!("{message}");
        id
    }

    fn dismiss(&self, id: NoticeId) {
        tracing::debug!(notice = id.0, "Dismissed notice");
    }
}
