//! Error type shared by event sources, status sinks and notifiers.
//!
//! Every backend reports failures as a [`ProviderError`]: a backend-neutral
//! [`ProviderErrorCode`], a message, the backend name once known, and the
//! underlying error when there is one. Nothing here retries.

use std::fmt;

use thiserror::Error;

/// What went wrong, independent of the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// Credentials were rejected or have expired.
    AuthenticationFailed,
    /// Credentials are valid but lack a permission or scope.
    AuthorizationFailed,
    /// The request never got an answer.
    NetworkError,
    /// The backend asked us to slow down.
    RateLimited,
    /// The backend failed on its side.
    ServerError,
    /// The answer could not be understood.
    InvalidResponse,
    /// Unknown calendar, topic or method.
    NotFound,
    /// Missing or unusable local configuration (key file, token, URL).
    ConfigurationError,
    /// A bug or an unexpected local state.
    InternalError,
}

impl ProviderErrorCode {
    /// Maps a non-success HTTP status code to an error code.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 => Self::AuthenticationFailed,
            403 => Self::AuthorizationFailed,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            400..=499 => Self::InvalidResponse,
            _ => Self::ServerError,
        }
    }

    /// Returns true if a later run may succeed without any change on our side.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::NetworkError | Self::RateLimited | Self::ServerError)
    }

    /// Snake-case name used in messages and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::AuthorizationFailed => "authorization_failed",
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::ConfigurationError => "configuration_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure while talking to a calendar, status or notification backend.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    provider: Option<String>,
    http_status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

macro_rules! code_constructors {
    ($($(#[$doc:meta])* $name:ident => $code:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ProviderErrorCode::$code, message)
            }
        )*
    };
}

impl ProviderError {
    /// Creates an error with an explicit code.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            http_status: None,
            source: None,
        }
    }

    code_constructors! {
        /// Credentials were rejected.
        authentication => AuthenticationFailed;
        /// A permission or scope is missing.
        authorization => AuthorizationFailed;
        /// The request failed in transit.
        network => NetworkError;
        /// The backend is throttling us.
        rate_limited => RateLimited;
        /// The backend failed.
        server => ServerError;
        /// The answer was malformed.
        invalid_response => InvalidResponse;
        /// The resource does not exist.
        not_found => NotFound;
        /// Local configuration is unusable.
        configuration => ConfigurationError;
        /// Unexpected local failure.
        internal => InternalError;
    }

    /// Creates an error from a non-success HTTP response.
    ///
    /// The code follows the status and the trimmed body becomes the message.
    pub fn http(status: u16, body: impl AsRef<str>) -> Self {
        let mut err = Self::new(
            ProviderErrorCode::from_http_status(status),
            format!("HTTP {}: {}", status, body.as_ref().trim()),
        );
        err.http_status = Some(status);
        err
    }

    /// Tags the error with the backend that produced it.
    ///
    /// An existing tag is kept, so the innermost backend wins.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        if self.provider.is_none() {
            self.provider = Some(provider.into());
        }
        self
    }

    /// Attaches the underlying error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The backend name, once tagged.
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// The HTTP status, for errors built from a response.
    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    /// See [`ProviderErrorCode::is_transient`].
    pub fn is_transient(&self) -> bool {
        self.code.is_transient()
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.provider {
            Some(provider) => write!(f, "[{}] {}: {}", provider, self.code, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
