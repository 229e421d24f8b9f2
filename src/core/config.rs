//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.ragchat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RagchatConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    pub top_k: Option<u32>,
    pub history_limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UiConfig {
    pub health_poll_secs: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_TOP_K: u32 = 5;
pub const DEFAULT_HISTORY_LIMIT: usize = 10;
pub const DEFAULT_HEALTH_POLL_SECS: u64 = 10;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub top_k: u32,
    pub history_limit: usize,
    pub health_poll_interval: Duration,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.ragchat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".ragchat").join("config.toml"))
}

/// Load config from `~/.ragchat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `RagchatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<RagchatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(RagchatConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(RagchatConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: RagchatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# ragchat Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults, then this file, then env vars, then CLI flags.

# [api]
# base_url = "http://127.0.0.1:8000/api/v1"   # Or set RAGCHAT_API_URL env var
# timeout_secs = 60

# [chat]
# top_k = 5            # Retrieved chunks per question (RAGCHAT_TOP_K env var)
# history_limit = 10   # Prior messages sent as conversation history

# [ui]
# health_poll_secs = 10
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_api_url` is from the `--api-url` flag (None = not specified).
pub fn resolve(config: &RagchatConfig, cli_api_url: Option<&str>) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli_api_url
        .map(|s| s.to_string())
        .or_else(|| std::env::var("RAGCHAT_API_URL").ok())
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // top_k: env → config → default
    let top_k = std::env::var("RAGCHAT_TOP_K")
        .ok()
        .and_then(|v| v.parse().ok())
        .or(config.chat.top_k)
        .unwrap_or(DEFAULT_TOP_K);

    ResolvedConfig {
        base_url,
        timeout: Duration::from_secs(config.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        top_k,
        history_limit: config.chat.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
        health_poll_interval: Duration::from_secs(
            config.ui.health_poll_secs.unwrap_or(DEFAULT_HEALTH_POLL_SECS),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = RagchatConfig::default();
        assert!(config.api.base_url.is_none());
        assert!(config.chat.top_k.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = RagchatConfig::default();
        let resolved = resolve(&config, None);
        assert_eq!(resolved.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(resolved.top_k, DEFAULT_TOP_K);
        assert_eq!(resolved.history_limit, DEFAULT_HISTORY_LIMIT);
        assert_eq!(
            resolved.health_poll_interval,
            Duration::from_secs(DEFAULT_HEALTH_POLL_SECS)
        );
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = RagchatConfig {
            api: ApiConfig {
                base_url: Some("http://10.0.0.2:9000/api/v1".to_string()),
                timeout_secs: Some(30),
            },
            chat: ChatConfig {
                top_k: Some(8),
                history_limit: Some(4),
            },
            ui: UiConfig {
                health_poll_secs: Some(5),
            },
        };
        let resolved = resolve(&config, None);
        assert_eq!(resolved.base_url, "http://10.0.0.2:9000/api/v1");
        assert_eq!(resolved.timeout, Duration::from_secs(30));
        assert_eq!(resolved.top_k, 8);
        assert_eq!(resolved.history_limit, 4);
        assert_eq!(resolved.health_poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_resolve_cli_api_url_wins() {
        let config = RagchatConfig {
            api: ApiConfig {
                base_url: Some("http://from-config/api/v1".to_string()),
                timeout_secs: None,
            },
            ..Default::default()
        };
        let resolved = resolve(&config, Some("http://from-cli/api/v1"));
        assert_eq!(resolved.base_url, "http://from-cli/api/v1");
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let toml_str = r#"
[chat]
top_k = 3
"#;
        let config: RagchatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.chat.top_k, Some(3));
        assert!(config.api.base_url.is_none());
        assert!(config.ui.health_poll_secs.is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[api]
base_url = "http://192.168.1.50:8000/api/v1"
timeout_secs = 120

[chat]
top_k = 10
history_limit = 20

[ui]
health_poll_secs = 30
"#;
        let config: RagchatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.api.base_url.as_deref(),
            Some("http://192.168.1.50:8000/api/v1")
        );
        assert_eq!(config.api.timeout_secs, Some(120));
        assert_eq!(config.chat.history_limit, Some(20));
        assert_eq!(config.ui.health_poll_secs, Some(30));
    }
}
