//! Settings for gateways, defaults and logging
//!
//! Values come from defaults overridden by `WEB_EXPLORER_MCP_*` environment
//! variables. Settings are passed explicitly to constructors; nothing here
//! is read from global state after startup.

use crate::error::ExplorerError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "WEB_EXPLORER_MCP_";

/// Format of the optional log file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err("Invalid log file format: must be text or json".to_string()),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Level filter for stderr output
    pub console_log_level: String,
    /// Level filter for the log file
    pub file_log_level: String,
    /// Log file; no file logging when unset
    pub log_file_path: Option<PathBuf>,
    pub log_file_format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            console_log_level: "info".to_string(),
            file_log_level: "info".to_string(),
            log_file_path: None,
            log_file_format: LogFormat::Text,
        }
    }
}

/// Search aggregator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSearchSettings {
    /// Base URL of the SearXNG instance
    pub searxng_url: String,
    pub default_page_size: usize,
    pub timeout: Duration,
}

impl Default for WebSearchSettings {
    fn default() -> Self {
        Self {
            searxng_url: "http://127.0.0.1:9011".to_string(),
            default_page_size: 5,
            timeout: Duration::from_secs(15),
        }
    }
}

/// Webpage extraction settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebpageSettings {
    /// Base URL of the remote headless-browser rendering service
    pub browser_url: String,
    pub default_max_chars: usize,
    pub timeout: Duration,
}

impl Default for WebpageSettings {
    fn default() -> Self {
        Self {
            browser_url: "http://127.0.0.1:9012".to_string(),
            default_max_chars: 5000,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub debug: bool,
    pub logging: LoggingSettings,
    pub web_search: WebSearchSettings,
    pub webpage: WebpageSettings,
}

impl Settings {
    /// Defaults overridden by process environment
    pub fn from_env() -> Result<Self, ExplorerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup(WEB_EXPLORER_MCP_<NAME>)`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ExplorerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut settings = Settings::default();

        if let Some(v) = get("DEBUG") {
            settings.debug = parse_bool("DEBUG", &v)?;
        }

        let logging = &mut settings.logging;
        if let Some(v) = get("LOGGING_CONSOLE_LOG_LEVEL") {
            logging.console_log_level = v.to_lowercase();
        }
        if let Some(v) = get("LOGGING_FILE_LOG_LEVEL") {
            logging.file_log_level = v.to_lowercase();
        }
        if let Some(v) = get("LOGGING_LOG_FILE_PATH") {
            logging.log_file_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get("LOGGING_LOG_FILE_FORMAT") {
            logging.log_file_format = v.parse().map_err(ExplorerError::Config)?;
        }

        let search = &mut settings.web_search;
        if let Some(v) = get("WEB_SEARCH_SEARXNG_URL") {
            search.searxng_url = v;
        }
        if let Some(v) = get("WEB_SEARCH_DEFAULT_PAGE_SIZE") {
            search.default_page_size = parse_positive("WEB_SEARCH_DEFAULT_PAGE_SIZE", &v)?;
        }
        if let Some(v) = get("WEB_SEARCH_TIMEOUT") {
            search.timeout = parse_secs("WEB_SEARCH_TIMEOUT", &v)?;
        }

        let webpage = &mut settings.webpage;
        if let Some(v) = get("WEBPAGE_BROWSER_URL") {
            webpage.browser_url = v;
        }
        if let Some(v) = get("WEBPAGE_MAX_CHARS") {
            webpage.default_max_chars = parse_positive("WEBPAGE_MAX_CHARS", &v)?;
        }
        if let Some(v) = get("WEBPAGE_TIMEOUT") {
            webpage.timeout = parse_secs("WEBPAGE_TIMEOUT", &v)?;
        }

        Ok(settings)
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ExplorerError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ExplorerError::Config(format!(
            "{ENV_PREFIX}{name}: expected a boolean, got {value:?}"
        ))),
    }
}

fn parse_positive(name: &str, value: &str) -> Result<usize, ExplorerError> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ExplorerError::Config(format!(
            "{ENV_PREFIX}{name}: expected a positive integer, got {value:?}"
        ))),
    }
}

fn parse_secs(name: &str, value: &str) -> Result<Duration, ExplorerError> {
    parse_positive(name, value).map(|n| Duration::from_secs(n as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> Result<Settings, ExplorerError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(!s.debug);
        assert_eq!(s.logging.console_log_level, "info");
        assert_eq!(s.logging.file_log_level, "info");
        assert_eq!(s.logging.log_file_path, None);
        assert_eq!(s.logging.log_file_format, LogFormat::Text);
        assert_eq!(s.web_search.searxng_url, "http://127.0.0.1:9011");
        assert_eq!(s.web_search.default_page_size, 5);
        assert_eq!(s.web_search.timeout, Duration::from_secs(15));
        assert_eq!(s.webpage.default_max_chars, 5000);
        assert_eq!(s.webpage.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        assert_eq!(from_map(&[]).unwrap(), Settings::default());
    }

    #[test]
    fn test_environment_overrides() {
        let s = from_map(&[
            ("WEB_EXPLORER_MCP_DEBUG", "true"),
            ("WEB_EXPLORER_MCP_LOGGING_CONSOLE_LOG_LEVEL", "DEBUG"),
            ("WEB_EXPLORER_MCP_LOGGING_LOG_FILE_PATH", "/var/log/app.log"),
            ("WEB_EXPLORER_MCP_LOGGING_LOG_FILE_FORMAT", "json"),
            ("WEB_EXPLORER_MCP_WEB_SEARCH_SEARXNG_URL", "http://custom-searxng:8080"),
            ("WEB_EXPLORER_MCP_WEB_SEARCH_DEFAULT_PAGE_SIZE", "10"),
            ("WEB_EXPLORER_MCP_WEB_SEARCH_TIMEOUT", "30"),
            ("WEB_EXPLORER_MCP_WEBPAGE_MAX_CHARS", "3000"),
            ("WEB_EXPLORER_MCP_WEBPAGE_TIMEOUT", "20"),
        ])
        .unwrap();

        assert!(s.debug);
        assert_eq!(s.logging.console_log_level, "debug");
        assert_eq!(s.logging.log_file_path, Some(PathBuf::from("/var/log/app.log")));
        assert_eq!(s.logging.log_file_format, LogFormat::Json);
        assert_eq!(s.web_search.searxng_url, "http://custom-searxng:8080");
        assert_eq!(s.web_search.default_page_size, 10);
        assert_eq!(s.web_search.timeout, Duration::from_secs(30));
        assert_eq!(s.webpage.default_max_chars, 3000);
        assert_eq!(s.webpage.timeout, Duration::from_secs(20));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            from_map(&[("WEB_EXPLORER_MCP_DEBUG", "maybe")]),
            Err(ExplorerError::Config(_))
        ));
        assert!(matches!(
            from_map(&[("WEB_EXPLORER_MCP_WEBPAGE_MAX_CHARS", "0")]),
            Err(ExplorerError::Config(_))
        ));
        assert!(matches!(
            from_map(&[("WEB_EXPLORER_MCP_LOGGING_LOG_FILE_FORMAT", "xml")]),
            Err(ExplorerError::Config(_))
        ));
    }

    #[test]
    fn test_blank_values_ignored() {
        let s = from_map(&[("WEB_EXPLORER_MCP_WEB_SEARCH_SEARXNG_URL", "  ")]).unwrap();
        assert_eq!(s.web_search.searxng_url, "http://127.0.0.1:9011");
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
