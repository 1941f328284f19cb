//! Event sources, status sinks and notifiers.
//!
//! This crate holds everything that talks to the outside world:
//!
//! - [`EventSource`] - fetches all-day events ([`google`], [`file`])
//! - [`StatusSink`] - reads and writes the account status ([`slack`])
//! - [`Notifier`] - announces a status change ([`ntfy`])
//! - [`ProviderError`] - error type shared by all of the above
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │ Google Calendar │    │   events.json   │
//! └────────┬────────┘    └────────┬────────┘
//!          │                      │
//!          │     EventSource      │
//!          └──────────┬───────────┘
//!                     ▼
//!              ┌─────────────┐
//!              │ AllDayEvent │──▶ phstatus-core
//!              └─────────────┘        │
//!                                     ▼
//!                     ┌──────────────────────────┐
//!                     │ StatusSink │  Notifier   │
//!                     │  (Slack)   │   (ntfy)    │
//!                     └──────────────────────────┘
//! ```

pub mod error;
pub mod file;
#[cfg(feature = "google")]
pub mod google;
#[cfg(feature = "ntfy")]
pub mod ntfy;
#[cfg(feature = "slack")]
pub mod slack;
pub mod source;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use file::JsonFileSource;
pub use source::{BoxFuture, EventSource, Notifier, StatusSink, restrict_to_window};
