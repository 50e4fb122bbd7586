//! User-facing notices.

use std::time::Duration;

/// Identifies a shown notice so it can be dismissed early
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoticeId(pub u64);

/// Shows short messages to the user.
///
/// A `duration` of `None` keeps the notice up until [`Notifier::dismiss`]
/// is called with its id.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, duration: Option<Duration>) -> NoticeId;

    fn dismiss(&self, id: NoticeId);
}
