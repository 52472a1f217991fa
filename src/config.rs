use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::{Deserialize, Serialize};

use crate::cleaner::CleanOptions;
use crate::wiki::SummaryOptions;

pub const WIKI_API: &str = "https://en.wikipedia.org/w/api.php";
pub const USER_AGENT: &str = "WikiCap/1.0 (https://github.com/WikiCap/year-overview)";

/// Runtime settings: built-in defaults overlaid with `WIKICAP_*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub api_url: String,
    pub user_agent: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub per_month_limit: usize,
    pub max_concurrent_fetches: usize,
    pub max_event_len: usize,
    pub keep_date_prefix: bool,
    pub bind: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: WIKI_API.to_string(),
            user_agent: USER_AGENT.to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 10,
            per_month_limit: 6,
            max_concurrent_fetches: 4,
            max_event_len: 200,
            keep_date_prefix: false,
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_env(Environment::with_prefix("WIKICAP").try_parsing(true))
    }

    fn from_env(env: Environment) -> Result<Self> {
        let defaults = Config::try_from(&Settings::default()).context("Failed to encode default settings")?;
        Config::builder()
            .add_source(defaults)
            .add_source(env)
            .build()
            .context("Failed to load settings")?
            .try_deserialize()
            .context("Invalid WIKICAP_* settings")
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            per_month_limit: self.per_month_limit,
            max_concurrent_fetches: self.max_concurrent_fetches.max(1),
            clean: CleanOptions {
                max_len: self.max_event_len,
                keep_date_prefix: self.keep_date_prefix,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("WIKICAP")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn defaults_without_env() {
        let settings = Settings::from_env(env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.connect_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn env_overrides_defaults() {
        let settings = Settings::from_env(env(&[
            ("WIKICAP_MAX_CONCURRENT_FETCHES", "2"),
            ("WIKICAP_KEEP_DATE_PREFIX", "true"),
            ("WIKICAP_BIND", "0.0.0.0:9000"),
        ]))
        .unwrap();
        assert_eq!(settings.max_concurrent_fetches, 2);
        assert!(settings.keep_date_prefix);
        assert_eq!(settings.bind, "0.0.0.0:9000");
        assert_eq!(settings.per_month_limit, 6);
    }

    #[test]
    fn zero_concurrency_is_clamped() {
        let settings = Settings {
            max_concurrent_fetches: 0,
            ..Settings::default()
        };
        assert_eq!(settings.summary_options().max_concurrent_fetches, 1);
    }
}
