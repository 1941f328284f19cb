//! All-day calendar events and the holiday spans built from them.
//!
//! - [`AllDayEvent`]: a date-only event as delivered by an event source
//! - [`HolidaySpan`]: a contiguous run of same-holiday events after merging
//!
//! Both types use an exclusive end date, following the calendar convention
//! for all-day events: a holiday covering only 2024-01-01 ends on 2024-01-02.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Date format used by calendar APIs for all-day events.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An all-day event from a calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllDayEvent {
    /// First day of the event.
    #[serde(rename = "start")]
    pub start_date: NaiveDate,
    /// Day after the last day of the event (exclusive).
    #[serde(rename = "end")]
    pub end_date: NaiveDate,
    /// Free-text title, e.g. "Christmas Day".
    pub summary: String,
}

impl AllDayEvent {
    /// Creates a new event. Call [`AllDayEvent::validate`] to check the range.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, summary: impl Into<String>) -> Self {
        Self {
            start_date,
            end_date,
            summary: summary.into(),
        }
    }

    /// Creates a one-day event on `date`.
    pub fn single_day(date: NaiveDate, summary: impl Into<String>) -> Self {
        Self::new(date, date + Days::new(1), summary)
    }

    /// Parses an event from `YYYY-MM-DD` date strings and validates its range.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidEventData`] if either date is malformed or
    /// if `end <= start`.
    pub fn parse(start: &str, end: &str, summary: impl Into<String>) -> CoreResult<Self> {
        let start_date = parse_date(start)?;
        let end_date = parse_date(end)?;
        let event = Self::new(start_date, end_date, summary);
        event.validate()?;
        Ok(event)
    }

    /// Checks that the event covers at least one day.
    pub fn validate(&self) -> CoreResult<()> {
        if self.end_date <= self.start_date {
            return Err(CoreError::invalid_event_data(format!(
                "event '{}' ends ({}) on or before it starts ({})",
                self.summary, self.end_date, self.start_date
            )));
        }
        Ok(())
    }

    /// Returns true if `date` falls within `[start_date, end_date)`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date < self.end_date
    }

    /// Number of days covered by the event.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

fn parse_date(value: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| CoreError::invalid_event_data(format!("malformed date '{}': {}", value, e)))
}

/// A merged holiday covering one or more consecutive all-day events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidaySpan {
    /// First day of the holiday.
    pub start_date: NaiveDate,
    /// Day after the last day of the holiday (exclusive).
    pub end_date: NaiveDate,
    /// Name shown in the status text.
    pub display_name: String,
    /// How many calendar events were merged into this span.
    pub event_count: usize,
}

impl HolidaySpan {
    /// Creates a span from its parts.
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        display_name: impl Into<String>,
        event_count: usize,
    ) -> Self {
        Self {
            start_date,
            end_date,
            display_name: display_name.into(),
            event_count,
        }
    }

    /// Returns true if `date` falls within `[start_date, end_date)`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date < self.end_date
    }

    /// The last day covered by the holiday (inclusive).
    pub fn last_day(&self) -> NaiveDate {
        self.end_date.pred_opt().unwrap_or(self.start_date)
    }

    /// Number of days covered by the holiday.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Returns true if the holiday covers exactly one day.
    pub fn is_single_day(&self) -> bool {
        self.days() == 1
    }

    /// Returns true if more than one event was merged into this span.
    pub fn is_merged(&self) -> bool {
        self.event_count > 1
    }

    /// Returns this span as an event, with the display name as summary.
    pub fn to_event(&self) -> AllDayEvent {
        AllDayEvent::new(self.start_date, self.end_date, &self.display_name)
    }
}
