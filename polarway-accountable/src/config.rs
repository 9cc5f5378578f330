//! Configuration for Polarway Accountable
//!
//! Only holds the initial state of a resolver. Both settings can be changed
//! at runtime on [`crate::Accountable`] afterwards.

use serde::{Deserialize, Serialize};

use crate::auth::AnonymousUser;
use crate::error::{AccountableError, Result};

/// Environment variable toggling stamping (`true` / `false` / `1` / `0`)
pub const ENV_ENABLED: &str = "ACCOUNTABLE_ENABLED";

/// Environment variable naming the anonymous fallback user
pub const ENV_ANONYMOUS_NAME: &str = "ACCOUNTABLE_ANONYMOUS_NAME";

/// Accountable configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountableConfig {
    /// Whether stamping starts enabled (default: true)
    pub enabled: bool,

    /// Display identity for records without a recorded actor
    pub anonymous_user: Option<AnonymousUser>,
}

impl Default for AccountableConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            anonymous_user: None,
        }
    }
}

impl AccountableConfig {
    /// Create config with sensible defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load overrides from `ACCOUNTABLE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load overrides through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_ENABLED) {
            config.enabled = parse_flag(&raw)?;
        }
        if let Some(name) = lookup(ENV_ANONYMOUS_NAME).filter(|n| !n.trim().is_empty()) {
            config.anonymous_user = Some(AnonymousUser::named(name.trim()));
        }
        Ok(config)
    }

    /// Parse a JSON document, e.g. `{"enabled": false, "anonymous_user": {"name": "Guest"}}`
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Override the initial enabled flag
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Override the anonymous fallback
    pub fn with_anonymous_user(mut self, anonymous: impl Into<AnonymousUser>) -> Self {
        self.anonymous_user = Some(anonymous.into());
        self
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AccountableError::Config(format!(
            "{ENV_ENABLED} must be a boolean, got '{other}'"
        ))),
    }
}
