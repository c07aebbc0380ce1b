use crate::utils::error::{GameError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MISMATCH_DELAY_MS: u64 = 900;
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

/// Environment-provided configuration. Every external endpoint is
/// independently optional: a missing setting disables its feature instead
/// of failing at runtime. Only present-but-malformed values are errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub score_store_url: Option<String>,
    pub score_store_key: Option<String>,
    pub hint_endpoint_url: Option<String>,
    pub mismatch_delay_ms: u64,
    pub leaderboard_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            score_store_url: None,
            score_store_key: None,
            hint_endpoint_url: None,
            mismatch_delay_ms: DEFAULT_MISMATCH_DELAY_MS,
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
        }
    }
}

impl AppConfig {
    /// Read `SCORE_STORE_URL`, `SCORE_STORE_KEY`, `HINT_ENDPOINT_URL`,
    /// `MISMATCH_DELAY_MS` and `LEADERBOARD_LIMIT` from the environment.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            score_store_url: read_env("SCORE_STORE_URL"),
            score_store_key: read_env("SCORE_STORE_KEY"),
            hint_endpoint_url: read_env("HINT_ENDPOINT_URL"),
            mismatch_delay_ms: read_env_parsed("MISMATCH_DELAY_MS", DEFAULT_MISMATCH_DELAY_MS)?,
            leaderboard_limit: read_env_parsed("LEADERBOARD_LIMIT", DEFAULT_LEADERBOARD_LIMIT)?,
        };
        config.validate()?;

        if config.score_store_url.is_some() != config.score_store_key.is_some() {
            tracing::warn!(
                "score store URL and key must both be set; leaderboard stays disabled"
            );
        }
        Ok(config)
    }

    /// The leaderboard credentials, when the feature is enabled (both
    /// halves of the pair present).
    pub fn score_store(&self) -> Option<(&str, &str)> {
        match (
            self.score_store_url.as_deref(),
            self.score_store_key.as_deref(),
        ) {
            (Some(url), Some(key)) => Some((url, key)),
            _ => None,
        }
    }

    pub fn hint_endpoint(&self) -> Option<&str> {
        self.hint_endpoint_url.as_deref()
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        if let Some(url) = &self.score_store_url {
            validate_url("score_store_url", url)?;
        }
        if let Some(key) = &self.score_store_key {
            validate_non_empty_string("score_store_key", key)?;
        }
        if let Some(url) = &self.hint_endpoint_url {
            validate_url("hint_endpoint_url", url)?;
        }
        validate_range("mismatch_delay_ms", self.mismatch_delay_ms, 0, 60_000)?;
        validate_range("leaderboard_limit", self.leaderboard_limit, 1, 100)?;
        Ok(())
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn read_env_parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match read_env(name) {
        Some(raw) => raw.parse().map_err(|_| GameError::InvalidConfigValueError {
            field: name.to_string(),
            value: raw,
            reason: "expected an unsigned integer".to_string(),
        }),
        None => Ok(default),
    }
}
