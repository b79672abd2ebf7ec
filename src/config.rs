use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/scraper.json";
pub const DEFAULT_OUTPUT_FILE: &str = "chat_messages.json";
pub const DEFAULT_STOP_FILE: &str = "stop.txt";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";
pub const DEFAULT_OVERLAY_PATH: &str = "kicktools.app/fusion_chat";
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// CSS selectors for the parts of the overlay DOM that get scraped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub container: String,
    pub message_item: String,
    pub timestamp: String,
    /// Plain and themed (`.kick`) username variants.
    pub username: String,
    pub message: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            container: "#chat".to_string(),
            message_item: ".message-item".to_string(),
            timestamp: ".timestamp".to_string(),
            username: ".username, .username.kick".to_string(),
            message: ".message".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub webdriver_url: String,
    pub output_file: PathBuf,
    pub stop_file: PathBuf,
    pub headless: bool,
    pub browser_args: Vec<String>,
    pub timezone: String,
    pub overlay_path: String,
    pub selectors: Selectors,
    pub poll_interval_ms: u64,
    pub container_retry_ms: u64,
    pub stop_poll_ms: u64,
    pub field_retries: u32,
    pub field_retry_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            stop_file: PathBuf::from(DEFAULT_STOP_FILE),
            headless: false,
            browser_args: vec![
                "--disable-gpu".to_string(),
                "--no-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
                "--disable-logging".to_string(),
            ],
            timezone: DEFAULT_TIMEZONE.to_string(),
            overlay_path: DEFAULT_OVERLAY_PATH.to_string(),
            selectors: Selectors::default(),
            poll_interval_ms: 100,
            container_retry_ms: 1000,
            stop_poll_ms: 1000,
            field_retries: 5,
            field_retry_delay_ms: 100,
        }
    }
}

impl AppConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn container_retry(&self) -> Duration {
        Duration::from_millis(self.container_retry_ms)
    }

    pub fn stop_poll(&self) -> Duration {
        Duration::from_millis(self.stop_poll_ms)
    }

    pub fn field_retry_delay(&self) -> Duration {
        Duration::from_millis(self.field_retry_delay_ms)
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.json");
        let config = load_config(path.to_str().expect("utf-8 path"));

        assert_eq!(config.output_file, PathBuf::from(DEFAULT_OUTPUT_FILE));
        assert_eq!(config.stop_file, PathBuf::from(DEFAULT_STOP_FILE));
        assert_eq!(config.field_retries, 5);
        assert_eq!(config.selectors.username, ".username, .username.kick");
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scraper.json");
        fs::write(
            &path,
            r#"{ "output_file": "out/log.json", "headless": true, "selectors": { "message": ".text" } }"#,
        )
        .expect("write config");

        let config = load_config(path.to_str().expect("utf-8 path"));
        assert_eq!(config.output_file, PathBuf::from("out/log.json"));
        assert!(config.headless);
        assert_eq!(config.selectors.message, ".text");
        assert_eq!(config.selectors.container, "#chat");
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scraper.json");
        fs::write(&path, "{ not json").expect("write config");

        let config = load_config(path.to_str().expect("utf-8 path"));
        assert_eq!(config.webdriver_url, DEFAULT_WEBDRIVER_URL);
    }
}
