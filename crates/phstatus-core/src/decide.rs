//! Holiday decision engine.
//!
//! Given merged [`HolidaySpan`]s and today's date, [`decide`] reports whether
//! today is a holiday, whether one starts within the lookahead window, or
//! neither. Today always wins over an upcoming holiday, and among upcoming
//! days the nearest one wins.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::event::HolidaySpan;
use crate::window::LookaheadWindow;

/// Outcome of a holiday check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    /// Today falls inside the span.
    Today { span: HolidaySpan },
    /// The span covers the day `offset` days from today.
    Upcoming { offset: u8, span: HolidaySpan },
    /// No holiday today or within the lookahead window.
    None,
}

impl Decision {
    /// Returns the span driving this decision, if any.
    pub fn span(&self) -> Option<&HolidaySpan> {
        match self {
            Self::Today { span } | Self::Upcoming { span, .. } => Some(span),
            Self::None => None,
        }
    }

    /// Returns true if no holiday was found.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Today { .. } => "today",
            Self::Upcoming { .. } => "upcoming",
            Self::None => "none",
        }
    }
}

/// Returns the first span containing `date`.
pub fn find_span_for_date(spans: &[HolidaySpan], date: NaiveDate) -> Option<&HolidaySpan> {
    spans.iter().find(|span| span.contains(date))
}

/// Decides which holiday, if any, applies to `today`.
pub fn decide(spans: &[HolidaySpan], today: NaiveDate) -> Decision {
    decide_in(spans, LookaheadWindow::new(today))
}

/// Decides against an explicit lookahead window.
pub fn decide_in(spans: &[HolidaySpan], window: LookaheadWindow) -> Decision {
    if let Some(span) = find_span_for_date(spans, window.today) {
        debug!(name = %span.display_name, "today is a holiday");
        return Decision::Today { span: span.clone() };
    }

    for (offset, date) in window.upcoming() {
        if let Some(span) = find_span_for_date(spans, date) {
            debug!(name = %span.display_name, offset, %date, "upcoming holiday");
            return Decision::Upcoming {
                offset,
                span: span.clone(),
            };
        }
    }

    Decision::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::AllDayEvent;
    use crate::merge::merge;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn span(start: NaiveDate, end: NaiveDate, name: &str) -> HolidaySpan {
        HolidaySpan::new(start, end, name, 1)
    }

    mod precedence {
        use super::*;

        #[test]
        fn today_beats_upcoming() {
            let spans = vec![
                span(date(2024, 3, 1), date(2024, 3, 2), "Today Holiday"),
                span(date(2024, 3, 2), date(2024, 3, 3), "Tomorrow Holiday"),
            ];
            let decision = decide(&spans, date(2024, 3, 1));
            assert_eq!(decision.kind(), "today");
            assert_eq!(decision.span().unwrap().display_name, "Today Holiday");
        }

        #[test]
        fn multi_day_span_covering_today_is_today() {
            let spans = vec![span(date(2024, 2, 10), date(2024, 2, 13), "Chinese New Year")];
            let decision = decide(&spans, date(2024, 2, 12));
            assert!(matches!(decision, Decision::Today { .. }));
        }

        #[test]
        fn nearest_offset_wins() {
            let spans = vec![
                span(date(2024, 3, 2), date(2024, 3, 3), "One"),
                span(date(2024, 3, 4), date(2024, 3, 5), "Three"),
            ];
            let decision = decide(&spans, date(2024, 3, 1));
            assert_eq!(
                decision,
                Decision::Upcoming {
                    offset: 1,
                    span: span(date(2024, 3, 2), date(2024, 3, 3), "One"),
                }
            );
        }

        #[test]
        fn later_offsets_are_reported() {
            let spans = vec![span(date(2024, 3, 4), date(2024, 3, 5), "Three")];
            match decide(&spans, date(2024, 3, 1)) {
                Decision::Upcoming { offset, span } => {
                    assert_eq!(offset, 3);
                    assert_eq!(span.display_name, "Three");
                }
                other => panic!("expected upcoming, got {:?}", other),
            }
        }
    }

    mod no_holiday {
        use super::*;

        #[test]
        fn empty_spans() {
            assert_eq!(decide(&[], date(2024, 6, 1)), Decision::None);
        }

        #[test]
        fn holiday_beyond_window() {
            let spans = vec![span(date(2024, 6, 5), date(2024, 6, 6), "Too Far")];
            assert!(decide(&spans, date(2024, 6, 1)).is_none());
        }

        #[test]
        fn holiday_already_over() {
            let spans = vec![span(date(2024, 5, 30), date(2024, 6, 1), "Yesterday")];
            assert!(decide(&spans, date(2024, 6, 1)).is_none());
        }
    }

    mod scenarios {
        use super::*;

        #[test]
        fn single_day_holiday_keeps_original_text() {
            let events = [AllDayEvent::new(date(2024, 1, 1), date(2024, 1, 2), "New Year's Day")];
            let spans = merge(&events).unwrap();
            let decision = decide(&spans, date(2024, 1, 1));
            match decision {
                Decision::Today { span } => assert_eq!(span.display_name, "New Year's Day"),
                other => panic!("expected today, got {:?}", other),
            }
        }

        #[test]
        fn two_day_merge_is_upcoming_tomorrow() {
            let events = [
                AllDayEvent::new(date(2024, 2, 10), date(2024, 2, 11), "Thaipusam Holiday"),
                AllDayEvent::new(
                    date(2024, 2, 11),
                    date(2024, 2, 12),
                    "Thaipusam (Regional Holiday)",
                ),
            ];
            let spans = merge(&events).unwrap();
            let decision = decide(&spans, date(2024, 2, 9));
            assert_eq!(
                decision,
                Decision::Upcoming {
                    offset: 1,
                    span: HolidaySpan::new(date(2024, 2, 10), date(2024, 2, 12), "Thaipusam", 2),
                }
            );
        }

        #[test]
        fn no_events_means_no_holiday() {
            let spans = merge(&[]).unwrap();
            assert_eq!(decide(&spans, date(2024, 7, 15)), Decision::None);
        }
    }

    #[test]
    fn decision_serializes_with_kind_tag() {
        let decision = Decision::Upcoming {
            offset: 2,
            span: span(date(2024, 3, 3), date(2024, 3, 4), "Test"),
        };
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["kind"], "upcoming");
        assert_eq!(json["offset"], 2);
        assert_eq!(json["span"]["display_name"], "Test");
    }
}
