//! Secret references in configuration values.
//!
//! Tokens and topics in `config.toml` may point at a secret instead of
//! holding it:
//!
//! - `env::SLACK_TOKEN` reads `$SLACK_TOKEN`
//! - `pass::slack/holiday-bot` returns the first line of `pass show slack/holiday-bot`
//!
//! Any other value is used verbatim.

use std::process::Command;

use thiserror::Error;

/// Failure to resolve a secret reference.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecretError {
    /// The referenced environment variable is unset or not unicode.
    #[error("environment variable `{0}` is not set")]
    MissingEnv(String),

    /// `pass` could not be run or exited unsuccessfully.
    #[error("`pass show {path}` failed: {reason}")]
    Pass { path: String, reason: String },

    /// `pass` succeeded but printed nothing.
    #[error("`pass show {0}` produced no output")]
    EmptyPass(String),
}

/// A parsed configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretRef<'a> {
    Env(&'a str),
    Pass(&'a str),
    Plain(&'a str),
}

impl<'a> SecretRef<'a> {
    /// Classifies `value` by its prefix.
    pub fn parse(value: &'a str) -> Self {
        if let Some(var) = value.strip_prefix("env::") {
            Self::Env(var)
        } else if let Some(path) = value.strip_prefix("pass::") {
            Self::Pass(path)
        } else {
            Self::Plain(value)
        }
    }

    /// Returns true if the value is stored outside the config file.
    pub fn is_reference(&self) -> bool {
        !matches!(self, Self::Plain(_))
    }

    /// Resolves the reference to its value.
    pub fn resolve(self) -> Result<String, SecretError> {
        match self {
            Self::Env(var) => std::env::var(var).map_err(|_| SecretError::MissingEnv(var.to_string())),
            Self::Pass(path) => resolve_pass(path),
            Self::Plain(value) => Ok(value.to_string()),
        }
    }
}

/// Resolves `value`, expanding `env::` and `pass::` references.
pub fn resolve(value: &str) -> Result<String, SecretError> {
    SecretRef::parse(value).resolve()
}

fn resolve_pass(path: &str) -> Result<String, SecretError> {
    let output = Command::new("pass")
        .arg("show")
        .arg(path)
        .output()
        .map_err(|e| SecretError::Pass {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(SecretError::Pass {
            path: path.to_string(),
            reason: format!(
                "exit {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(str::to_string)
        .ok_or_else(|| SecretError::EmptyPass(path.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_values_pass_through() {
        assert_eq!(resolve("xoxp-1234").unwrap(), "xoxp-1234");
        assert_eq!(resolve("").unwrap(), "");
        assert!(!SecretRef::parse("holiday-alerts").is_reference());
    }

    #[test]
    fn classifies_prefixes() {
        assert_eq!(SecretRef::parse("env::SLACK_TOKEN"), SecretRef::Env("SLACK_TOKEN"));
        assert_eq!(SecretRef::parse("pass::slack/bot"), SecretRef::Pass("slack/bot"));
        assert!(SecretRef::parse("pass::slack/bot").is_reference());
    }

    #[test]
    fn env_reference_resolves() {
        unsafe {
            std::env::set_var("_PHSTATUS_TEST_SECRET", "xoxp-from-env");
        }
        assert_eq!(resolve("env::_PHSTATUS_TEST_SECRET").unwrap(), "xoxp-from-env");
        unsafe {
            std::env::remove_var("_PHSTATUS_TEST_SECRET");
        }
    }

    #[test]
    fn missing_env_errors() {
        let err = resolve("env::_PHSTATUS_DEFINITELY_UNSET_4821").unwrap_err();
        assert_eq!(err, SecretError::MissingEnv("_PHSTATUS_DEFINITELY_UNSET_4821".to_string()));
        assert!(err.to_string().contains("not set"));
    }

    #[test]
    fn pass_lookup_of_unknown_entry_fails() {
        // Fails whether or not `pass` is installed.
        assert!(resolve("pass::phstatus/nonexistent/entry/4821").is_err());
    }
}
