//! Core types: all-day events, holiday spans, merge, decision, status
//!
//! The pipeline is pure and synchronous:
//!
//! ```text
//! [AllDayEvent] ──merge_events()──▶ [HolidaySpan] ──decide()──▶ Decision
//!                                                                 │
//!                                          StatusComposer::compose()
//!                                                                 ▼
//!                                                           StatusUpdate
//! ```

pub mod decide;
pub mod error;
pub mod event;
pub mod merge;
pub mod normalize;
pub mod status;
pub mod tracing;
pub mod window;

pub use decide::{Decision, decide, decide_in, find_span_for_date};
pub use error::{CoreError, CoreResult};
pub use event::{AllDayEvent, DATE_FORMAT, HolidaySpan};
pub use merge::{MergeOptions, merge, merge_events};
pub use normalize::{SuffixRule, normalize_summary, normalize_with, same_holiday, suffix_rules};
pub use status::{
    DEFAULT_LABEL, NotificationMessage, StatusComposer, StatusUpdate, TODAY_EMOJI,
    UPCOMING_EMOJI, date_range, midnight_timestamp,
};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use window::{LOOKAHEAD_DAYS, LookaheadWindow};
