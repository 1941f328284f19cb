//! Collaborator traits.
//!
//! The core never performs I/O. Everything that talks to the outside world
//! sits behind one of these traits:
//!
//! - [`EventSource`]: fetches all-day events for the lookahead window
//! - [`StatusSink`]: reads and applies the account status
//! - [`Notifier`]: announces a status change

use std::future::Future;
use std::pin::Pin;

use phstatus_core::{AllDayEvent, LookaheadWindow, NotificationMessage, StatusUpdate};

use crate::error::ProviderResult;

/// A boxed future for async trait methods.
///
/// Boxed futures keep the traits object-safe, so the pipeline can hold
/// `&dyn EventSource` regardless of the backend.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A source of all-day calendar events.
///
/// # Contract
///
/// - Only all-day events are returned; timed events are dropped.
/// - Every returned event overlaps `window`.
/// - Events are sorted by start date, ascending.
pub trait EventSource: Send + Sync {
    /// Returns the name of this source (e.g., "google", "file").
    fn name(&self) -> &str;

    /// Fetches the events overlapping `window`.
    fn fetch_events(&self, window: LookaheadWindow) -> BoxFuture<'_, ProviderResult<Vec<AllDayEvent>>>;
}

/// A service hosting the account status (e.g., Slack profile status).
pub trait StatusSink: Send + Sync {
    /// Returns the name of this sink.
    fn name(&self) -> &str;

    /// Reads the status currently shown, or `None` if it is empty.
    fn current_status(&self) -> BoxFuture<'_, ProviderResult<Option<StatusUpdate>>>;

    /// Replaces the account status.
    fn apply_status<'a>(&'a self, status: &'a StatusUpdate) -> BoxFuture<'a, ProviderResult<()>>;
}

/// A push notification channel.
pub trait Notifier: Send + Sync {
    /// Returns the name of this notifier.
    fn name(&self) -> &str;

    /// Sends `message`.
    fn notify<'a>(&'a self, message: &'a NotificationMessage) -> BoxFuture<'a, ProviderResult<()>>;
}

/// Keeps the events overlapping `window` and sorts them by start date.
///
/// Sources call this before returning so the ordering contract holds even
/// when the backend ignores the requested order.
pub fn restrict_to_window(mut events: Vec<AllDayEvent>, window: LookaheadWindow) -> Vec<AllDayEvent> {
    events.retain(|e| window.overlaps(e.start_date, e.end_date));
    events.sort_by_key(|e| e.start_date);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn restrict_filters_and_sorts() {
        let window = LookaheadWindow::new(date(2024, 2, 9));
        let events = vec![
            AllDayEvent::single_day(date(2024, 2, 11), "Second"),
            AllDayEvent::single_day(date(2024, 2, 20), "Outside"),
            AllDayEvent::single_day(date(2024, 2, 9), "First"),
            AllDayEvent::single_day(date(2024, 2, 8), "Yesterday"),
        ];
        let kept = restrict_to_window(events, window);
        let names: Vec<_> = kept.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn restrict_keeps_stable_order_for_equal_starts() {
        let window = LookaheadWindow::new(date(2024, 5, 1));
        let events = vec![
            AllDayEvent::single_day(date(2024, 5, 1), "Labour Day"),
            AllDayEvent::single_day(date(2024, 5, 1), "Labour Day (Observed)"),
        ];
        let kept = restrict_to_window(events, window);
        assert_eq!(kept[0].summary, "Labour Day");
        assert_eq!(kept[1].summary, "Labour Day (Observed)");
    }
}
