//! The lookahead window checked for holidays.
//!
//! A [`LookaheadWindow`] covers today plus the next [`LOOKAHEAD_DAYS`] days,
//! inclusive on both ends. Event sources use it to bound their query and the
//! decision engine walks its offsets in order.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of days after today that are checked for upcoming holidays.
pub const LOOKAHEAD_DAYS: u8 = 3;

/// An inclusive range of dates starting today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookaheadWindow {
    /// The reference date ("today").
    pub today: NaiveDate,
    /// Days checked after today.
    pub days: u8,
}

impl LookaheadWindow {
    /// Creates the standard window starting at `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self::with_days(today, LOOKAHEAD_DAYS)
    }

    /// Creates a window with a custom number of lookahead days.
    pub fn with_days(today: NaiveDate, days: u8) -> Self {
        Self { today, days }
    }

    /// First date in the window (today).
    pub fn first_day(&self) -> NaiveDate {
        self.today
    }

    /// Last date in the window (inclusive).
    pub fn last_day(&self) -> NaiveDate {
        self.date_at(self.days)
    }

    /// Day after the last date in the window.
    pub fn end_exclusive(&self) -> NaiveDate {
        self.date_at(self.days + 1)
    }

    /// Date at `offset` days from today.
    pub fn date_at(&self, offset: u8) -> NaiveDate {
        self.today + Days::new(u64::from(offset))
    }

    /// Returns true if `date` is inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first_day() <= date && date <= self.last_day()
    }

    /// Returns true if an event covering `[start, end)` touches the window.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start < self.end_exclusive() && end > self.first_day()
    }

    /// Iterates over `(offset, date)` for the days after today, nearest first.
    pub fn upcoming(&self) -> impl Iterator<Item = (u8, NaiveDate)> + '_ {
        (1..=self.days).map(move |offset| (offset, self.date_at(offset)))
    }
}
