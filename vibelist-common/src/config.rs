//! Configuration loading and credential resolution
//!
//! Bootstrap configuration comes from an optional TOML file. A missing file is
//! not an error: the built-in defaults are used and a warning is logged.
//! Credentials resolve with priority ENV → TOML; absence of a credential is a
//! configuration error, never a panic.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable holding the completion-service key
pub const COMPLETION_KEY_ENV: &str = "VIBELIST_COMPLETION_API_KEY";

/// Environment variable holding the catalog bearer token
pub const CATALOG_TOKEN_ENV: &str = "VIBELIST_CATALOG_TOKEN";

/// Full configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VibelistConfig {
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Completion service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Bearer key (prefer the environment variable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_completion_base_url")]
    pub base_url: String,

    /// Model used for text-only completions
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Model used for image understanding
    #[serde(default = "default_vision_model")]
    pub vision_model: String,

    /// Total request timeout
    #[serde(default = "default_completion_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_completion_base_url(),
            text_model: default_text_model(),
            vision_model: default_vision_model(),
            timeout_secs: default_completion_timeout_secs(),
        }
    }
}

impl CompletionConfig {
    /// Resolve the completion key: ENV → TOML
    pub fn resolve_api_key(&self) -> Result<String> {
        resolve_credential(
            "completion API key",
            COMPLETION_KEY_ENV,
            self.api_key.as_deref(),
            "[completion] api_key",
        )
    }
}

/// Music catalog settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Session bearer token (usually supplied by the host at runtime)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,

    /// Results requested per search query
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    /// Outbound request budget enforced by the client's rate limiter
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Songs resolved concurrently per enhancement batch
    #[serde(default = "default_enhance_batch_size")]
    pub enhance_batch_size: usize,

    /// Pause between enhancement batches
    #[serde(default = "default_batch_pause_ms")]
    pub batch_pause_ms: u64,

    /// Total request timeout
    #[serde(default = "default_catalog_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: default_catalog_base_url(),
            search_limit: default_search_limit(),
            requests_per_second: default_requests_per_second(),
            enhance_batch_size: default_enhance_batch_size(),
            batch_pause_ms: default_batch_pause_ms(),
            timeout_secs: default_catalog_timeout_secs(),
        }
    }
}

impl CatalogConfig {
    /// Same settings with a session token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Resolve the catalog token: ENV → TOML
    pub fn resolve_token(&self) -> Result<String> {
        resolve_credential(
            "catalog token",
            CATALOG_TOKEN_ENV,
            self.token.as_deref(),
            "[catalog] token",
        )
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_completion_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_text_model() -> String {
    "gpt-4".to_string()
}

fn default_vision_model() -> String {
    "gpt-4o".to_string()
}

fn default_completion_timeout_secs() -> u64 {
    60
}

fn default_catalog_base_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_search_limit() -> u32 {
    20
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_enhance_batch_size() -> usize {
    5
}

fn default_batch_pause_ms() -> u64 {
    250
}

fn default_catalog_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Validate credential (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

fn resolve_credential(
    what: &str,
    env_var: &str,
    toml_value: Option<&str>,
    toml_key: &str,
) -> Result<String> {
    let env_value = std::env::var(env_var).ok().filter(|k| is_valid_key(k));
    let toml_value = toml_value.filter(|k| is_valid_key(k));

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in both environment and TOML config. Using environment (highest priority).",
            what
        );
    }

    if let Some(key) = env_value {
        info!("{} loaded from environment variable", what);
        return Ok(key.trim().to_string());
    }

    if let Some(key) = toml_value {
        info!("{} loaded from TOML config", what);
        return Ok(key.trim().to_string());
    }

    Err(Error::Config(format!(
        "{what} not configured. Please configure using one of:\n\
         1. Environment: {env_var}=your-key-here\n\
         2. TOML config: {toml_key} = \"your-key\""
    )))
}

/// Default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("vibelist").join("config.toml"))
}

impl VibelistConfig {
    /// Load configuration from an explicit path or the platform default
    ///
    /// A missing file yields the defaults (with a warning). A file that exists
    /// but cannot be read or parsed is a configuration error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(p) => p,
            None => {
                warn!("Could not determine config directory, using built-in defaults");
                return Ok(Self::default());
            }
        };

        if !path.exists() {
            warn!(
                path = %path.display(),
                "Config file not found, using built-in defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }
}

/// Write configuration to a TOML file, creating parent directories
///
/// Writes to a sibling temp file first and renames it into place.
pub fn write_toml_config(config: &VibelistConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Create config directory failed: {}", e)))?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, content)
        .map_err(|e| Error::Config(format!("Write TOML failed: {}", e)))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| Error::Config(format!("Rename TOML failed: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("sk-123"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   \t"));
    }

    #[test]
    fn test_defaults() {
        let config = VibelistConfig::default();
        assert_eq!(config.completion.text_model, "gpt-4");
        assert_eq!(config.completion.vision_model, "gpt-4o");
        assert_eq!(config.catalog.search_limit, 20);
        assert_eq!(config.catalog.enhance_batch_size, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = VibelistConfig::from_toml_str(
            r#"
            [catalog]
            enhance_batch_size = 3

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.catalog.enhance_batch_size, 3);
        assert_eq!(config.catalog.base_url, "https://api.spotify.com/v1");
        assert_eq!(config.completion, CompletionConfig::default());
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let result = VibelistConfig::from_toml_str("[catalog\nbroken");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
