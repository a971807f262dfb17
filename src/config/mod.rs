use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, WatchError};
use crate::utils::validation::{validate_path, validate_positive_number, validate_url, Validate};
use std::env;
use std::time::Duration;

pub const DEFAULT_SOURCE_URL: &str =
    "https://www.inli.fr/locations/offres/val-doise-departement_d:95";
pub const DEFAULT_BUDGET_MAX: u32 = 950;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 120;
pub const DEFAULT_SEEN_FILE: &str = "seen.json";

/// Runtime configuration, sourced from environment variables only. The bot
/// token and chat id have no sensible defaults and are required; everything
/// else falls back to the values above.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub telegram_token: String,
    pub chat_id: String,
    pub source_url: String,
    pub budget_max: u32,
    pub poll_interval_secs: u64,
    pub seen_file: String,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any name → value lookup, so tests do not have
    /// to mutate process-wide environment variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            telegram_token: required(&lookup, "TELEGRAM_TOKEN")?,
            chat_id: required(&lookup, "CHAT_ID")?,
            source_url: lookup("WATCH_URL").unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            budget_max: parsed(&lookup, "BUDGET_MAX", DEFAULT_BUDGET_MAX)?,
            poll_interval_secs: parsed(&lookup, "POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?,
            seen_file: lookup("SEEN_FILE").unwrap_or_else(|| DEFAULT_SEEN_FILE.to_string()),
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String> {
    match lookup(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(WatchError::ConfigError {
            message: format!("required environment variable {} is not set", name),
        }),
    }
}

fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T> {
    match lookup(name) {
        Some(value) => value
            .parse()
            .map_err(|_| WatchError::InvalidConfigValueError {
                field: name.to_string(),
                value,
                reason: "not a valid number".to_string(),
            }),
        None => Ok(default),
    }
}

impl ConfigProvider for EnvConfig {
    fn budget_max(&self) -> u32 {
        self.budget_max
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Validate for EnvConfig {
    fn validate(&self) -> Result<()> {
        validate_url("WATCH_URL", &self.source_url)?;
        validate_path("SEEN_FILE", &self.seen_file)?;
        validate_positive_number("POLL_INTERVAL_SECS", self.poll_interval_secs, 1)?;
        Ok(())
    }
}
