//! Status text composition.
//!
//! Turns a [`Decision`] into the status that gets posted and the push
//! notification that announces it:
//!
//! | decision | emoji | text | expires |
//! |---|---|---|---|
//! | today | `:red_circle:` | `PH: Deepavali` | midnight after the holiday |
//! | upcoming | `:large_yellow_circle:` | `Upcoming PH: [31/10] Deepavali` | midnight the holiday starts |

use chrono::{Datelike, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::decide::Decision;
use crate::event::HolidaySpan;

/// Emoji shown while a holiday is in progress.
pub const TODAY_EMOJI: &str = ":red_circle:";

/// Emoji shown ahead of an upcoming holiday.
pub const UPCOMING_EMOJI: &str = ":large_yellow_circle:";

/// Default label prefix ("public holiday").
pub const DEFAULT_LABEL: &str = "PH";

/// Title of the push notification sent after a status change.
pub const NOTIFICATION_TITLE: &str = "Slack status updated";

/// Tag attached to the push notification.
pub const NOTIFICATION_TAG: &str = "mega";

/// A status ready to be applied to a status-hosting account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Status text.
    pub text: String,
    /// Emoji shortcode, e.g. `:red_circle:`.
    pub emoji: String,
    /// Unix timestamp (seconds) at which the status clears itself.
    pub expiration: i64,
}

impl StatusUpdate {
    /// Creates a new status update.
    pub fn new(text: impl Into<String>, emoji: impl Into<String>, expiration: i64) -> Self {
        Self {
            text: text.into(),
            emoji: emoji.into(),
            expiration,
        }
    }

    /// Returns true if both statuses would look the same to a reader.
    ///
    /// The expiration is ignored.
    pub fn same_display(&self, other: &StatusUpdate) -> bool {
        self.text == other.text && self.emoji == other.emoji
    }
}

/// A push notification describing a status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// Notification tags (ntfy renders known tags as emoji).
    pub tags: Vec<String>,
}

/// Builds status texts with a configurable label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusComposer {
    label: String,
}

impl Default for StatusComposer {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL)
    }
}

impl StatusComposer {
    /// Creates a composer using `label` as the status prefix.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// The label prefix.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Composes the status for `decision`, or `None` if there is no holiday.
    ///
    /// Expirations are computed at local midnight in `tz`.
    pub fn compose<Tz: TimeZone>(&self, decision: &Decision, tz: &Tz) -> Option<StatusUpdate> {
        match decision {
            Decision::Today { span } => Some(StatusUpdate::new(
                format!("{}: {}", self.label, span.display_name),
                TODAY_EMOJI,
                midnight_timestamp(span.end_date, tz),
            )),
            Decision::Upcoming { span, .. } => Some(StatusUpdate::new(
                format!(
                    "Upcoming {}: [{}] {}",
                    self.label,
                    date_range(span),
                    span.display_name
                ),
                UPCOMING_EMOJI,
                midnight_timestamp(span.start_date, tz),
            )),
            Decision::None => None,
        }
    }

    /// Builds the notification announcing a status change for `decision`.
    pub fn notification(&self, decision: &Decision) -> Option<NotificationMessage> {
        decision.span().map(|span| NotificationMessage {
            title: NOTIFICATION_TITLE.to_string(),
            body: format!("{}: {}", self.label, span.display_name),
            tags: vec![NOTIFICATION_TAG.to_string()],
        })
    }
}

/// Formats the days covered by a span as `d/m` or `d/m-d/m`.
pub fn date_range(span: &HolidaySpan) -> String {
    let first = span.start_date;
    let last = span.last_day();
    if first == last {
        day_month(first)
    } else {
        format!("{}-{}", day_month(first), day_month(last))
    }
}

fn day_month(date: NaiveDate) -> String {
    format!("{}/{}", date.day(), date.month())
}

/// Unix timestamp of midnight at the start of `date` in `tz`.
///
/// Falls back to UTC midnight when local midnight does not exist (a DST gap).
pub fn midnight_timestamp<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp())
        .unwrap_or_else(|| midnight.and_utc().timestamp())
}
