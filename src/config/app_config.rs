//! Application configuration for gaan
//!
//! Settings live in settings.json inside the config directory. Missing fields
//! fall back to defaults and the file is written on first run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::Paths;

pub const COHERE_API_KEY_VAR: &str = "COHERE_API_KEY";
pub const CATALOG_PATH_VAR: &str = "GAAN_CATALOG";

/// Application configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Catalog CSV file, defaults to music.csv in the config directory
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Stream url used when audio resolution fails
    #[serde(default = "default_fallback_audio_url")]
    pub fallback_audio_url: String,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub ytdlp: YtDlpConfig,

    /// Idle minutes before a session is forgotten
    #[serde(default = "default_session_ttl_minutes")]
    pub session_ttl_minutes: i64,

    /// Seconds between idle session sweeps
    #[serde(default = "default_session_sweep_secs")]
    pub session_sweep_secs: u64,
}

/// Text generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(default = "default_generation_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_generation_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
}

/// yt-dlp settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YtDlpConfig {
    #[serde(default = "default_ytdlp_binary")]
    pub binary: String,
    #[serde(default = "default_ytdlp_timeout")]
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            fallback_audio_url: default_fallback_audio_url(),
            generation: GenerationConfig::default(),
            ytdlp: YtDlpConfig::default(),
            session_ttl_minutes: default_session_ttl_minutes(),
            session_sweep_secs: default_session_sweep_secs(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_generation_endpoint(),
            model: default_generation_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_generation_timeout(),
        }
    }
}

impl Default for YtDlpConfig {
    fn default() -> Self {
        Self {
            binary: default_ytdlp_binary(),
            timeout_secs: default_ytdlp_timeout(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the settings file
    pub fn load() -> Result<Self> {
        let paths = Paths::get()?;
        Self::load_from(&paths.settings_path())
    }

    /// Load configuration from `path`, writing the defaults if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).context("Failed to read settings file")?;
            serde_json::from_str(&content).context("Failed to parse settings file")
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, content).context("Failed to write settings file")?;
        Ok(())
    }

    /// Pick the catalog file: command line, then environment, then settings
    pub fn resolve_catalog_path(&self, cli: Option<PathBuf>, paths: &Paths) -> PathBuf {
        cli.or_else(|| std::env::var_os(CATALOG_PATH_VAR).map(PathBuf::from))
            .or_else(|| self.catalog_path.clone())
            .unwrap_or_else(|| paths.default_catalog_path())
    }
}

/// Read the Cohere api key from the environment
pub fn cohere_api_key() -> Result<String> {
    std::env::var(COHERE_API_KEY_VAR)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .with_context(|| format!("{} is not set", COHERE_API_KEY_VAR))
}

// Default value functions for serde

fn default_fallback_audio_url() -> String {
    "https://example.com/default.mp3".to_string()
}

fn default_generation_endpoint() -> String {
    "https://api.cohere.ai/v1/generate".to_string()
}

fn default_generation_model() -> String {
    "command".to_string()
}

fn default_max_tokens() -> u32 {
    150
}

fn default_temperature() -> f64 {
    0.7
}

fn default_generation_timeout() -> u64 {
    30
}

fn default_ytdlp_binary() -> String {
    "yt-dlp".to_string()
}

fn default_ytdlp_timeout() -> u64 {
    20
}

fn default_session_ttl_minutes() -> i64 {
    30
}

fn default_session_sweep_secs() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.session_ttl_minutes, 30);
        assert_eq!(config.generation.model, "command");
        assert_eq!(config.generation.max_tokens, 150);
        assert_eq!(config.fallback_audio_url, "https://example.com/default.mp3");
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let json = r#"{"sessionTtlMinutes": 5, "ytdlp": {"binary": "/opt/yt-dlp"}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.session_ttl_minutes, 5);
        assert_eq!(config.ytdlp.binary, "/opt/yt-dlp");
        assert_eq!(config.ytdlp.timeout_secs, 20);
        assert_eq!(config.generation, GenerationConfig::default());
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");

        let config = AppConfig::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config, AppConfig::default());

        let mut changed = config.clone();
        changed.fallback_audio_url = "https://cdn.example/silence.mp3".to_string();
        changed.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), changed);
    }

    #[test]
    fn test_cli_catalog_path_wins() {
        let config = AppConfig {
            catalog_path: Some(PathBuf::from("/data/settings.csv")),
            ..Default::default()
        };
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::init(Some(temp_dir.path().to_path_buf()), None).unwrap();

        let resolved = config.resolve_catalog_path(Some(PathBuf::from("/data/cli.csv")), &paths);
        assert_eq!(resolved, PathBuf::from("/data/cli.csv"));
    }
}
