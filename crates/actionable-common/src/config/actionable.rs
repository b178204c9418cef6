//! Feature settings for actionable marks
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `ACTIONABLE_*` environment variables.

use actionable_core::TrustLevel;
use serde::Deserialize;
use std::env;

use super::app_config::ConfigError;

/// Settings file used when `ACTIONABLE_CONFIG` is unset
const DEFAULT_SETTINGS_FILE: &str = "config/actionable.toml";

/// Environment prefix for overrides, e.g. `ACTIONABLE_MAX_PER_DAY`
const ENV_PREFIX: &str = "ACTIONABLE";

/// Site settings controlling the feature
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionableSettings {
    /// Master switch
    pub enabled: bool,
    /// Minimum trust level required to mark posts
    pub min_trust_level: TrustLevel,
    /// Maximum marks per user per calendar day (0 disables marking)
    pub max_per_day: i32,
    /// Whether non-staff may list who marked a post
    pub show_who_actioned: bool,
    /// Days of daily quota rows kept by the purge sweep
    pub retention_days: i64,
    /// TTL of cached user summaries
    pub summary_cache_ttl_secs: u64,
}

impl Default for ActionableSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_trust_level: TrustLevel::MIN,
            max_per_day: 50,
            show_who_actioned: true,
            retention_days: 90,
            summary_cache_ttl_secs: 300,
        }
    }
}

impl ActionableSettings {
    /// Load settings from the file named by `ACTIONABLE_CONFIG` and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let file = env::var("ACTIONABLE_CONFIG").unwrap_or_else(|_| DEFAULT_SETTINGS_FILE.to_string());
        Self::build(&file, ::config::Environment::with_prefix(ENV_PREFIX))
    }

    fn build(file: &str, env_source: ::config::Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let settings: Self = ::config::Config::builder()
            .set_default("enabled", defaults.enabled)?
            .set_default("min_trust_level", i64::from(defaults.min_trust_level.value()))?
            .set_default("max_per_day", i64::from(defaults.max_per_day))?
            .set_default("show_who_actioned", defaults.show_who_actioned)?
            .set_default("retention_days", defaults.retention_days)?
            .set_default("summary_cache_ttl_secs", defaults.summary_cache_ttl_secs as i64)?
            .add_source(::config::File::with_name(file).required(false))
            .add_source(env_source.try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would make the quota meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_per_day < 0 {
            return Err(ConfigError::InvalidValue(
                "ACTIONABLE_MAX_PER_DAY",
                self.max_per_day.to_string(),
            ));
        }
        if self.retention_days < 1 {
            return Err(ConfigError::InvalidValue(
                "ACTIONABLE_RETENTION_DAYS",
                self.retention_days.to_string(),
            ));
        }
        Ok(())
    }
}
