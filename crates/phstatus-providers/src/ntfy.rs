//! ntfy push notifications.
//!
//! A notification is a plain-text `POST {server}/{topic}`; the title and tags
//! travel in the `Title` and `Tags` headers.

use std::time::Duration;

use phstatus_core::NotificationMessage;
use tracing::info;
use url::Url;

use crate::error::{ProviderError, ProviderResult};
use crate::source::{BoxFuture, Notifier};

const PROVIDER_NAME: &str = "ntfy";

/// Public ntfy instance.
pub const DEFAULT_SERVER: &str = "https://ntfy.sh";

/// Posts notifications to an ntfy topic.
#[derive(Debug)]
pub struct NtfyNotifier {
    topic_url: Url,
    http_client: reqwest::Client,
}

impl NtfyNotifier {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// Creates a notifier posting to `topic` on `server`.
    pub fn new(server: &str, topic: &str) -> ProviderResult<Self> {
        let topic_url = topic_url(server, topic).map_err(|e| e.with_provider(PROVIDER_NAME))?;
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::internal("failed to create HTTP client").with_source(e))?;

        Ok(Self {
            topic_url,
            http_client,
        })
    }

    /// Creates a notifier posting to `topic` on the public server.
    pub fn public(topic: &str) -> ProviderResult<Self> {
        Self::new(DEFAULT_SERVER, topic)
    }

    /// The URL notifications are posted to.
    pub fn topic_url(&self) -> &Url {
        &self.topic_url
    }

    async fn send(&self, message: &NotificationMessage) -> ProviderResult<()> {
        let response = self
            .http_client
            .post(self.topic_url.clone())
            .header("Title", message.title.as_str())
            .header("Tags", message.tags.join(","))
            .body(message.body.clone())
            .send()
            .await
            .map_err(|e| ProviderError::network(format!("ntfy request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::http(status.as_u16(), body));
        }

        info!(topic = %self.topic_url, body = %message.body, "notification sent");
        Ok(())
    }
}

/// Builds the topic URL, percent-encoding the topic as one path segment.
pub fn topic_url(server: &str, topic: &str) -> ProviderResult<Url> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(ProviderError::configuration("ntfy topic is empty"));
    }

    let mut url = Url::parse(server).map_err(|e| {
        ProviderError::configuration(format!("invalid ntfy server URL {}: {}", server, e))
            .with_source(e)
    })?;

    url.path_segments_mut()
        .map_err(|()| ProviderError::configuration(format!("ntfy server URL cannot have a path: {}", server)))?
        .pop_if_empty()
        .push(topic);

    Ok(url)
}

impl Notifier for NtfyNotifier {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn notify<'a>(&'a self, message: &'a NotificationMessage) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(async move { self.send(message).await.map_err(|e| e.with_provider(PROVIDER_NAME)) })
    }
}
