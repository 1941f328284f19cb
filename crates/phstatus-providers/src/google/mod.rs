//! Google Calendar event source.
//!
//! Holidays are read from a shared calendar (for example one of Google's
//! public holiday calendars) with a service account:
//!
//! 1. The service-account key is loaded from its JSON file
//! 2. A signed JWT assertion is exchanged for an access token
//! 3. `events.list` is queried for the lookahead window, with recurring
//!    events expanded server-side
//! 4. Timed and cancelled events are dropped
//!
//! # Example
//!
//! ```ignore
//! use phstatus_providers::google::{GoogleCalendarSource, GoogleConfig, ServiceAccountKey};
//!
//! let key = ServiceAccountKey::from_file("service_account.json")?;
//! let source = GoogleCalendarSource::new(GoogleConfig::new(calendar_id, key))?;
//! let events = source.fetch_events(LookaheadWindow::new(today)).await?;
//! ```

mod auth;
mod client;
mod config;
mod source;

pub use auth::{AssertionClaims, ServiceAccountAuth, sign_assertion};
pub use client::GoogleCalendarClient;
pub use config::{DEFAULT_TOKEN_URI, GoogleConfig, ServiceAccountKey};
pub use source::GoogleCalendarSource;
