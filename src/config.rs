//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,

    #[serde(default)]
    pub language: LanguageConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote data source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_data_url")]
    pub data_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_base_retry_delay")]
    pub base_retry_delay_ms: u64,
}

fn default_data_url() -> String {
    "https://data.covid19japan.com/summary/latest.json".to_string()
}

fn default_request_timeout() -> u64 {
    30_000
}

fn default_base_retry_delay() -> u64 {
    2_000
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            data_url: default_data_url(),
            request_timeout_ms: default_request_timeout(),
            base_retry_delay_ms: default_base_retry_delay(),
        }
    }
}

/// Refresh scheduling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_refresh_interval")]
    pub interval_ms: u64,
}

fn default_refresh_interval() -> u64 {
    300_000 // 5 minutes
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_refresh_interval(),
        }
    }
}

/// Language configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageConfig {
    #[serde(default = "default_supported_langs")]
    pub supported: Vec<String>,

    #[serde(default = "default_lang")]
    pub default: String,
}

fn default_supported_langs() -> Vec<String> {
    crate::lang::DEFAULT_SUPPORTED_LANGS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_lang() -> String {
    "en".to_string()
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            supported: default_supported_langs(),
            default: default_lang(),
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderConfig {
    /// Reduced-surface mode: suppress all non-map, non-KPI components
    #[serde(default)]
    pub embed_mode: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("epiwatch").join("config.toml")),
            Some(PathBuf::from("/etc/epiwatch/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("EPIWATCH_DATA_URL") {
            self.fetch.data_url = url;
        }
        if let Ok(interval) = std::env::var("EPIWATCH_REFRESH_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.refresh.interval_ms = ms;
            }
        }
        if let Ok(lang) = std::env::var("EPIWATCH_LANG") {
            self.language.default = lang;
        }
        if let Ok(embed) = std::env::var("EPIWATCH_EMBED_MODE") {
            if let Ok(flag) = embed.parse() {
                self.render.embed_mode = flag;
            }
        }
        if let Ok(level) = std::env::var("EPIWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("EPIWATCH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            refresh: RefreshConfig::default(),
            language: LanguageConfig::default(),
            render: RenderConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Epiwatch Configuration
#
# Environment variables override these settings:
# - EPIWATCH_DATA_URL
# - EPIWATCH_REFRESH_INTERVAL_MS
# - EPIWATCH_LANG
# - EPIWATCH_EMBED_MODE
# - EPIWATCH_LOG_LEVEL
# - EPIWATCH_LOG_FORMAT

[fetch]
# URL of the remote data document
data_url = "https://data.covid19japan.com/summary/latest.json"

# Per-request timeout (ms)
request_timeout_ms = 30000

# First retry delay after a failed fetch (ms); doubles per failure
base_retry_delay_ms = 2000

[refresh]
# Time between scheduled refreshes (ms)
interval_ms = 300000

[language]
# Languages the dashboard can display
supported = ["en", "ja"]

# Startup language when detection finds nothing usable
default = "en"

[render]
# Reduced-surface mode: KPIs and map only
embed_mode = false

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/epiwatch/epiwatch.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.refresh.interval_ms, 300_000);
        assert_eq!(config.fetch.base_retry_delay_ms, 2_000);
        assert_eq!(config.language.supported, vec!["en", "ja"]);
        assert_eq!(config.language.default, "en");
        assert!(!config.render.embed_mode);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let toml = r#"
            [fetch]
            data_url = "http://localhost:9000/latest.json"

            [render]
            embed_mode = true
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.fetch.data_url, "http://localhost:9000/latest.json");
        assert!(config.render.embed_mode);
        assert_eq!(config.refresh.interval_ms, 300_000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [refresh]
            interval_ms = 60000

            [language]
            supported = ["en"]
            default = "en"
            "#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.refresh.interval_ms, 60_000);
        assert_eq!(config.language.supported, vec!["en"]);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = Config::load(Path::new("/nonexistent/epiwatch.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_generated_default_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.refresh.interval_ms, 300_000);
    }
}
