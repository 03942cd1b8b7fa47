//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::fetch::RetryPolicy;
use crate::core::project::Project;

const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 2000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Pacta configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the remote contract catalog
    pub catalog_url: Option<String>,

    /// Groups this project tracks; `refresh` without `--group` walks all of them
    pub group_codes: Vec<String>,

    /// Live-fetch attempts before giving up
    pub retry_attempts: Option<u32>,

    /// Delay between live-fetch attempts, milliseconds
    pub retry_delay_ms: Option<u64>,

    /// Per-request timeout for the live catalog, seconds
    pub request_timeout_secs: Option<u64>,

    /// Default output format for listings
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/pacta/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        // 3. Project config (.pacta/config.yaml)
        if let Some(project) = project {
            let project_config_path = project.pacta_dir().join("config.yaml");
            if project_config_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&project_config_path) {
                    if let Ok(project_config) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(project_config);
                    }
                }
            }
        }

        // 4. Environment variables
        if let Ok(url) = std::env::var("PACTA_CATALOG_URL") {
            config.catalog_url = Some(url);
        }
        if let Ok(group) = std::env::var("PACTA_GROUP") {
            config.group_codes = vec![group];
        }

        config
    }

    /// Retry behavior for the live fetch path
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retry_attempts.unwrap_or(DEFAULT_RETRY_ATTEMPTS),
            delay: Duration::from_millis(self.retry_delay_ms.unwrap_or(DEFAULT_RETRY_DELAY_MS)),
        }
    }

    /// Per-request timeout for the live catalog
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "pacta")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.catalog_url.is_some() {
            self.catalog_url = other.catalog_url;
        }
        if !other.group_codes.is_empty() {
            self.group_codes = other.group_codes;
        }
        if other.retry_attempts.is_some() {
            self.retry_attempts = other.retry_attempts;
        }
        if other.retry_delay_ms.is_some() {
            self.retry_delay_ms = other.retry_delay_ms;
        }
        if other.request_timeout_secs.is_some() {
            self.request_timeout_secs = other.request_timeout_secs;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_precedence() {
        let mut base = Config {
            catalog_url: Some("https://old.example.gov".to_string()),
            retry_attempts: Some(5),
            ..Default::default()
        };
        let overlay = Config {
            catalog_url: Some("https://new.example.gov".to_string()),
            group_codes: vec!["787000".to_string()],
            ..Default::default()
        };

        base.merge(overlay);
        assert_eq!(base.catalog_url.as_deref(), Some("https://new.example.gov"));
        assert_eq!(base.group_codes, vec!["787000".to_string()]);
        assert_eq!(base.retry_attempts, Some(5));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        let retry = config.retry_policy();
        assert_eq!(retry.attempts, 3);
        assert_eq!(retry.delay, Duration::from_millis(2000));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
catalog_url: https://catalog.example.gov/api
group_codes: ["787000", "787010"]
retry_attempts: 2
"#;
        let config: Config = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.group_codes.len(), 2);
        assert_eq!(config.retry_attempts, Some(2));
    }
}
