//! Messages API configuration.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Messages API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Model used when `HOOKSCRIBE_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Token budget for the generated message.
pub const DEFAULT_MAX_TOKENS: u32 = 300;

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Value of the `anthropic-version` header.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

pub const API_KEY_ENV_VAR: &str = "CLAUDE_API_KEY";
pub const API_URL_ENV_VAR: &str = "HOOKSCRIBE_API_URL";
pub const MODEL_ENV_VAR: &str = "HOOKSCRIBE_MODEL";
pub const MAX_TOKENS_ENV_VAR: &str = "HOOKSCRIBE_MAX_TOKENS";
pub const TIMEOUT_ENV_VAR: &str = "HOOKSCRIBE_TIMEOUT";

/// Everything the generator needs to talk to the Messages API.
#[derive(Clone)]
pub struct ApiConfig {
    /// `None` (or empty) sends the generator straight to the fallback.
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// Read the configuration from the process environment.
    ///
    /// Invalid numeric values log a warning and keep the default.
    pub fn from_env() -> Self {
        let api_key = env::var(API_KEY_ENV_VAR).ok().filter(|k| !k.trim().is_empty());
        let api_url = non_empty_var(API_URL_ENV_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let model = non_empty_var(MODEL_ENV_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let max_tokens = parse_var(MAX_TOKENS_ENV_VAR, DEFAULT_MAX_TOKENS);
        let timeout = Duration::from_secs(parse_var(TIMEOUT_ENV_VAR, DEFAULT_TIMEOUT_SECS));

        Self {
            api_key,
            api_url,
            model,
            max_tokens,
            timeout,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The API key, if one is set and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

// Manual impl so the key never reaches logs.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    match env::var(name) {
        Ok(v) if !v.is_empty() => match v.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Invalid {} value '{}', using default {}", name, v, default);
                default
            }
        },
        _ => default,
    }
}
