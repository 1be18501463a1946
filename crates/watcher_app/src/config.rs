//! Application configuration read from a RON file.
//!
//! Every field has a default, so the file may list only what it changes.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use watcher_core::{RefreshPolicy, CHECK_INTERVAL};
use watcher_engine::{FetchSettings, DEFAULT_BASE_URL};

use crate::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "puzzle_watcher.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Portal root; listing pages live below it.
    pub base_url: String,
    /// Directory holding the persisted watch state.
    pub state_dir: PathBuf,
    /// Minimum seconds between automatic refreshes.
    pub check_interval_secs: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_body_bytes: u64,
    pub log_destination: LogDestination,
    pub log_level: String,
    /// File the configuration was read from; `None` when running on defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            state_dir: PathBuf::from(".puzzle_watcher"),
            check_interval_secs: CHECK_INTERVAL.as_secs(),
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            max_body_bytes: fetch.max_bytes,
            log_destination: LogDestination::default(),
            log_level: "info".to_string(),
            source: None,
        }
    }
}

impl AppConfig {
    /// Loads `path`, or `./puzzle_watcher.ron` when no path is given.
    ///
    /// A missing default file yields defaults; a missing explicit file is an
    /// error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILENAME), false),
        };

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !explicit => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {}", path.display()));
            }
        };
        let mut config =
            Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))?;
        config.source = Some(path);
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_body_bytes,
            ..FetchSettings::default()
        }
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        RefreshPolicy::new(Duration::from_secs(self.check_interval_secs))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::AppConfig;
    use crate::logging::LogDestination;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = AppConfig::parse(
            r#"(
                check_interval_secs: 600,
                log_destination: Both,
            )"#,
        )
        .unwrap();
        assert_eq!(config.check_interval_secs, 600);
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.base_url, AppConfig::default().base_url);
        assert_eq!(config.refresh_policy().interval, Duration::from_secs(600));
    }

    #[test]
    fn default_policy_is_hourly() {
        assert_eq!(
            AppConfig::default().refresh_policy().interval,
            Duration::from_secs(3600)
        );
    }

    #[test]
    fn fetch_settings_follow_config() {
        let config = AppConfig {
            request_timeout_secs: 3,
            max_body_bytes: 1024,
            ..AppConfig::default()
        };
        let settings = config.fetch_settings();
        assert_eq!(settings.request_timeout, Duration::from_secs(3));
        assert_eq!(settings.max_bytes, 1024);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(AppConfig::load(Some(&temp.path().join("absent.ron"))).is_err());
    }

    #[test]
    fn explicit_file_is_read() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("watch.ron");
        fs::write(&path, r#"(base_url: "http://localhost:8080/Raetselportal")"#).unwrap();
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/Raetselportal");
        assert_eq!(config.source, Some(path));
    }

    #[test]
    fn parsed_text_has_no_source() {
        let config = AppConfig::parse("()").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.source, None);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(AppConfig::parse("(check_interval_secs: \"soon\")").is_err());
    }
}
