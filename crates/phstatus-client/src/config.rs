//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/phstatus/config.toml` by default:
//!
//! ```toml
//! [google]
//! calendar_id = "en.malaysia#holiday@group.v.calendar.google.com"
//! service_account_file = "/etc/phstatus/service_account.json"
//!
//! [slack]
//! token = "env::SLACK_TOKEN"
//!
//! [ntfy]
//! topic = "pass::ntfy/holiday-topic"
//!
//! [status]
//! label = "PH"
//! ```
//!
//! The Slack token and the ntfy topic accept secret references, see
//! [`crate::secret`].

use std::path::{Path, PathBuf};

use phstatus_core::{DEFAULT_LABEL, MergeOptions, StatusComposer};
use phstatus_providers::google::{GoogleConfig, ServiceAccountKey};
use phstatus_providers::ntfy::DEFAULT_SERVER;
use phstatus_providers::slack::SlackConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};
use crate::secret;

/// Configuration for phstatus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Google Calendar settings.
    pub google: Option<GoogleSettings>,

    /// Slack settings.
    pub slack: Option<SlackSettings>,

    /// ntfy settings; notifications are disabled without this section.
    pub ntfy: Option<NtfySettings>,

    /// Status text settings.
    pub status: StatusSettings,
}

/// Google Calendar event source settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleSettings {
    /// Calendar holding the holidays.
    pub calendar_id: Option<String>,

    /// Path to the service-account JSON key.
    pub service_account_file: Option<PathBuf>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,
}

/// Slack status sink settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlackSettings {
    /// User token (supports `pass::` and `env::` prefixes).
    pub token: Option<String>,
}

/// ntfy notifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NtfySettings {
    /// Topic to publish to (supports `pass::` and `env::` prefixes).
    pub topic: Option<String>,

    /// ntfy server.
    #[serde(default = "default_ntfy_server")]
    pub server: String,
}

impl Default for NtfySettings {
    fn default() -> Self {
        Self {
            topic: None,
            server: default_ntfy_server(),
        }
    }
}

fn default_ntfy_server() -> String {
    DEFAULT_SERVER.to_string()
}

/// Status text settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusSettings {
    /// Label placed before the holiday name.
    pub label: String,

    /// Normalize single-event names too, not only merged ones.
    pub uniform_display_names: bool,
}

impl Default for StatusSettings {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            uniform_display_names: false,
        }
    }
}

impl StatusSettings {
    /// Merge options derived from these settings.
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions::new().with_uniform_display_names(self.uniform_display_names)
    }

    /// Status composer using the configured label.
    pub fn composer(&self) -> StatusComposer {
        StatusComposer::new(self.label.clone())
    }
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if it is absent.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::config(format!("failed to read config {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML content.
    pub fn parse(content: &str) -> ClientResult<Self> {
        toml::from_str(content).map_err(|e| ClientError::config(format!("failed to parse config: {}", e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("phstatus")
    }

    /// Google settings, required unless events come from a file.
    pub fn google(&self) -> ClientResult<&GoogleSettings> {
        self.google.as_ref().ok_or_else(|| {
            ClientError::config(format!(
                "[google] section is missing from {}",
                Self::default_path().display()
            ))
        })
    }

    /// Slack settings, required unless running dry.
    pub fn slack(&self) -> ClientResult<&SlackSettings> {
        self.slack
            .as_ref()
            .ok_or_else(|| ClientError::config("[slack] section is missing"))
    }

    /// Checks that every required value is present and every secret resolves.
    ///
    /// Values are not checked against the remote services.
    pub fn validate(&self) -> ClientResult<()> {
        self.google()?.to_source_config()?;
        self.slack()?.to_sink_config()?;
        if let Some(ntfy) = &self.ntfy {
            ntfy.resolve_topic()?;
        }
        if self.status.label.trim().is_empty() {
            return Err(ClientError::config("status label must not be empty"));
        }
        Ok(())
    }
}

impl GoogleSettings {
    /// Converts to the event source configuration, loading the key file.
    pub fn to_source_config(&self) -> ClientResult<GoogleConfig> {
        let calendar_id = self
            .calendar_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ClientError::config("calendar_id is missing from [google] section"))?;

        let key_path = self
            .service_account_file
            .as_ref()
            .ok_or_else(|| ClientError::config("service_account_file is missing from [google] section"))?;

        let key = ServiceAccountKey::from_file(key_path)?;
        let mut config = GoogleConfig::new(calendar_id, key);
        if let Some(secs) = self.timeout {
            config = config.with_timeout(std::time::Duration::from_secs(secs));
        }
        Ok(config)
    }
}

impl SlackSettings {
    /// Resolves the token and builds the sink configuration.
    pub fn to_sink_config(&self) -> ClientResult<SlackConfig> {
        let raw = self
            .token
            .as_deref()
            .ok_or_else(|| ClientError::config("token is missing from [slack] section"))?;
        let token = secret::resolve(raw)?;
        if token.trim().is_empty() {
            return Err(ClientError::config("slack token is empty"));
        }
        Ok(SlackConfig::new(token))
    }
}

impl NtfySettings {
    /// Resolves the topic.
    pub fn resolve_topic(&self) -> ClientResult<String> {
        let raw = self
            .topic
            .as_deref()
            .ok_or_else(|| ClientError::config("topic is missing from [ntfy] section"))?;
        Ok(secret::resolve(raw)?)
    }
}
