//! Logging setup.
//!
//! Logs always go to stderr so they never mix with the command's own output.
//! Interactive runs get a readable format; scheduled runs (cron, systemd
//! timers) use [`TracingConfig::scheduled`] for one JSON object per line.
//!
//! `RUST_LOG` overrides the configured level.

use thiserror::Error;
use tracing::{Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    prelude::*,
    registry::LookupSpan,
};

/// Targets covered by the default filter.
const CRATE_TARGETS: [&str; 4] = ["phstatus", "phstatus_core", "phstatus_providers", "phstatus_client"];

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// Multi-line, human-readable
    #[default]
    Pretty,
    /// One line per event
    Compact,
    /// One JSON object per line
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level for phstatus crates when `RUST_LOG` is unset
    pub default_level: Level,
    pub output_format: TracingOutputFormat,
    /// Include file and line numbers
    pub include_location: bool,
    pub include_timestamp: bool,
    /// Log span open/close, which gives each pipeline step a duration
    pub include_span_events: bool,
    /// Explicit filter directive; takes precedence over `RUST_LOG`
    pub env_filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            output_format: TracingOutputFormat::Pretty,
            include_location: false,
            include_timestamp: true,
            include_span_events: false,
            env_filter: None,
        }
    }
}

impl TracingConfig {
    /// `--debug`: compact debug output with source locations.
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            default_level: Level::DEBUG,
            output_format: TracingOutputFormat::Compact,
            include_location: true,
            include_timestamp: false,
            ..Self::default()
        }
    }

    /// Unattended runs: JSON lines with span timings.
    #[must_use]
    pub fn scheduled() -> Self {
        Self {
            output_format: TracingOutputFormat::Json,
            include_span_events: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Builds the filter: explicit directive, then `RUST_LOG`, then the default level.
    fn filter(&self) -> Result<EnvFilter, TracingError> {
        match &self.env_filter {
            Some(directive) => Ok(EnvFilter::try_new(directive)?),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for(self.default_level)))),
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.include_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    /// The formatting layer for the configured output format.
    fn fmt_layer<S>(&self) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    {
        let base = fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(self.include_location)
            .with_line_number(self.include_location)
            .with_span_events(self.span_events());

        match (self.output_format, self.include_timestamp) {
            (TracingOutputFormat::Pretty, _) => base.pretty().boxed(),
            (TracingOutputFormat::Compact, true) => base.compact().boxed(),
            (TracingOutputFormat::Compact, false) => base.compact().without_time().boxed(),
            (TracingOutputFormat::Json, _) => base.json().boxed(),
        }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if a subscriber is already installed or the filter directive is
/// invalid.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let subscriber = tracing_subscriber::registry()
        .with(config.filter()?)
        .with(config.fmt_layer());
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Default filter directive covering every phstatus crate.
fn directive_for(level: Level) -> String {
    CRATE_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        let debug = TracingConfig::cli_debug();
        assert_eq!(debug.default_level, Level::DEBUG);
        assert_eq!(debug.output_format, TracingOutputFormat::Compact);
        assert!(debug.include_location);
        assert!(!debug.include_timestamp);

        let scheduled = TracingConfig::scheduled();
        assert_eq!(scheduled.default_level, Level::INFO);
        assert_eq!(scheduled.output_format, TracingOutputFormat::Json);
        assert!(scheduled.include_span_events);
        assert!(scheduled.include_timestamp);
    }

    #[test]
    fn default_directive_names_every_crate() {
        let directive = directive_for(Level::WARN);
        assert_eq!(
            directive,
            "phstatus=WARN,phstatus_core=WARN,phstatus_providers=WARN,phstatus_client=WARN"
        );
        assert!(EnvFilter::try_new(&directive).is_ok());
    }

    #[test]
    fn explicit_filter_wins() {
        let config = TracingConfig::default().with_env_filter("phstatus_core::merge=trace");
        assert!(config.filter().is_ok());

        let broken = TracingConfig::default().with_env_filter("phstatus_core=loud");
        assert!(matches!(broken.filter(), Err(TracingError::EnvFilter(_))));
    }

    #[test]
    fn builders() {
        let config = TracingConfig::default()
            .with_level(Level::TRACE)
            .with_format(TracingOutputFormat::Compact);
        assert_eq!(config.default_level, Level::TRACE);
        assert_eq!(config.output_format, TracingOutputFormat::Compact);
        assert!(config.env_filter.is_none());
    }
}
