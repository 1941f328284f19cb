//! Merging consecutive all-day events into holiday spans.
//!
//! Holiday calendars frequently publish a multi-day holiday as one event per
//! day, each with a slightly different title. [`merge_events`] walks the
//! events in start-date order and folds every run of contiguous (or
//! overlapping) events with the same normalized name into one
//! [`HolidaySpan`].

use tracing::debug;

use crate::error::CoreResult;
use crate::event::{AllDayEvent, HolidaySpan};
use crate::normalize::{normalize_summary, same_holiday};

/// How span display names are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Use the normalized name for single-event spans too.
    ///
    /// By default a span built from one event keeps that event's original
    /// summary, and only merged spans get the normalized name.
    pub uniform_display_names: bool,
}

impl MergeOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set uniform display names.
    pub fn with_uniform_display_names(mut self, uniform: bool) -> Self {
        self.uniform_display_names = uniform;
        self
    }
}

/// The span currently being extended.
struct OpenSpan<'a> {
    first: &'a AllDayEvent,
    end_date: chrono::NaiveDate,
    name: String,
    count: usize,
}

impl<'a> OpenSpan<'a> {
    fn start(event: &'a AllDayEvent, name: String) -> Self {
        Self {
            first: event,
            end_date: event.end_date,
            name,
            count: 1,
        }
    }

    fn accepts(&self, event: &AllDayEvent, normalized: &str) -> bool {
        event.start_date <= self.end_date && same_holiday(&self.name, normalized)
    }

    fn extend(&mut self, event: &AllDayEvent) {
        self.end_date = self.end_date.max(event.end_date);
        self.count += 1;
    }

    fn close(self, options: MergeOptions) -> HolidaySpan {
        let display_name = if self.count > 1 || options.uniform_display_names {
            self.name
        } else {
            self.first.summary.clone()
        };
        debug!(
            name = %display_name,
            start = %self.first.start_date,
            end = %self.end_date,
            events = self.count,
            "closed holiday span"
        );
        HolidaySpan::new(self.first.start_date, self.end_date, display_name, self.count)
    }
}

/// Merges events sorted by start date into holiday spans.
///
/// # Errors
///
/// Returns [`crate::CoreError::InvalidEventData`] if any event ends on or
/// before its start date. No spans are returned in that case.
pub fn merge_events(events: &[AllDayEvent], options: MergeOptions) -> CoreResult<Vec<HolidaySpan>> {
    for event in events {
        event.validate()?;
    }

    let mut spans = Vec::new();
    let mut open: Option<OpenSpan<'_>> = None;

    for event in events {
        let normalized = normalize_summary(&event.summary);
        if let Some(span) = open.as_mut().filter(|span| span.accepts(event, &normalized)) {
            span.extend(event);
            continue;
        }
        if let Some(done) = open.replace(OpenSpan::start(event, normalized)) {
            spans.push(done.close(options));
        }
    }

    if let Some(done) = open {
        spans.push(done.close(options));
    }

    debug!(events = events.len(), spans = spans.len(), "merged events");
    Ok(spans)
}

/// Merges events with the default display-name policy.
pub fn merge(events: &[AllDayEvent]) -> CoreResult<Vec<HolidaySpan>> {
    merge_events(events, MergeOptions::default())
}
