//! Effective runtime settings, resolved from CLI > environment > config file
//! > defaults.

use std::time::Duration;

use crate::config_file::ConfigFile;
use crate::controller::BrowseSettings;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_THEME: &str = "hacker";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Largest `limit` the backend accepts on list and search endpoints.
pub const MAX_LIMIT: u32 = 100;

/// Environment variable naming the backend origin.
pub const URL_ENV: &str = "PAPERDECK_URL";

/// One layer of optional overrides (CLI flags or environment).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub page_size: Option<u32>,
    pub search_limit: Option<u32>,
    pub theme: Option<String>,
    pub log_level: Option<String>,
}

impl Overrides {
    /// Overrides read from the process environment.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var(URL_ENV).ok().filter(|v| !v.trim().is_empty()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub timeout: Duration,
    pub browse: BrowseSettings,
    pub theme: String,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            browse: BrowseSettings::default(),
            theme: DEFAULT_THEME.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Settings {
    /// `cli` beats `env`, which beats `file`, which beats the defaults.
    pub fn resolve(file: &ConfigFile, env: &Overrides, cli: &Overrides) -> Self {
        let defaults = Settings::default();
        let server = file.server.clone().unwrap_or_default();
        let browse = file.browse.clone().unwrap_or_default();
        let display = file.display.clone().unwrap_or_default();
        let logging = file.logging.clone().unwrap_or_default();

        let base_url = cli
            .base_url
            .clone()
            .or_else(|| env.base_url.clone())
            .or(server.base_url)
            .unwrap_or(defaults.base_url);
        let timeout_secs = cli
            .timeout_secs
            .or(env.timeout_secs)
            .or(server.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .max(1);
        let page_size = cli
            .page_size
            .or(env.page_size)
            .or(browse.page_size)
            .unwrap_or(defaults.browse.page_size);
        let search_limit = cli
            .search_limit
            .or(env.search_limit)
            .or(browse.search_limit)
            .unwrap_or(defaults.browse.search_limit);
        let theme = cli
            .theme
            .clone()
            .or_else(|| env.theme.clone())
            .or(display.theme)
            .unwrap_or(defaults.theme);
        let log_level = cli
            .log_level
            .clone()
            .or_else(|| env.log_level.clone())
            .or(logging.level)
            .unwrap_or(defaults.log_level);

        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            browse: BrowseSettings {
                page_size: clamp_limit(page_size),
                search_limit: clamp_limit(search_limit),
            },
            theme,
            log_level,
        }
    }
}

/// Keep a request limit within what the backend validates (1..=100).
pub fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_file::{BrowseConfig, ServerConfig};

    fn file_with_url(url: &str) -> ConfigFile {
        ConfigFile {
            server: Some(ServerConfig {
                base_url: Some(url.into()),
                timeout_secs: Some(5),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_when_nothing_set() {
        let settings = Settings::resolve(
            &ConfigFile::default(),
            &Overrides::default(),
            &Overrides::default(),
        );
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.browse.page_size, 100);
        assert_eq!(settings.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn precedence_cli_env_file() {
        let file = file_with_url("http://file");
        let env = Overrides {
            base_url: Some("http://env".into()),
            ..Default::default()
        };
        let cli = Overrides {
            base_url: Some("http://cli".into()),
            ..Default::default()
        };

        assert_eq!(Settings::resolve(&file, &env, &cli).base_url, "http://cli");
        assert_eq!(
            Settings::resolve(&file, &env, &Overrides::default()).base_url,
            "http://env"
        );
        let from_file = Settings::resolve(&file, &Overrides::default(), &Overrides::default());
        assert_eq!(from_file.base_url, "http://file");
        assert_eq!(from_file.timeout, Duration::from_secs(5));
    }

    #[test]
    fn limits_are_clamped() {
        let file = ConfigFile {
            browse: Some(BrowseConfig {
                page_size: Some(500),
                search_limit: Some(0),
            }),
            ..Default::default()
        };
        let settings = Settings::resolve(&file, &Overrides::default(), &Overrides::default());
        assert_eq!(settings.browse.page_size, 100);
        assert_eq!(settings.browse.search_limit, 1);
    }
}
