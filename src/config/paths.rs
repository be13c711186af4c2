//! Path management for gaan
//!
//! This module manages all filesystem paths used by the application.

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

static PATHS: OnceCell<Arc<Paths>> = OnceCell::new();

/// Manages all filesystem paths for the application
#[derive(Debug, Clone)]
pub struct Paths {
    /// Parent directory of config folder
    config_parent: PathBuf,
    /// Path to web client files
    client_path: PathBuf,
    /// Config directory path
    config_dir: PathBuf,
}

impl Paths {
    /// Initialize the paths singleton
    pub fn init(config: Option<PathBuf>, client: Option<PathBuf>) -> Result<Arc<Paths>> {
        let paths = PATHS.get_or_try_init(|| {
            let paths = Self::new(config, client)?;
            Ok::<_, anyhow::Error>(Arc::new(paths))
        })?;
        Ok(Arc::clone(paths))
    }

    /// Get the global paths instance
    pub fn get() -> Result<Arc<Paths>> {
        PATHS.get().map(Arc::clone).context("Paths not initialized")
    }

    fn new(config_override: Option<PathBuf>, client_override: Option<PathBuf>) -> Result<Self> {
        let config_parent = if let Some(ref path) = config_override {
            path.clone()
        } else if let Ok(exe) = std::env::current_exe() {
            exe.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            directories::ProjectDirs::from("", "", "gaan")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        };

        let config_dir_name = if is_home_dir(&config_parent) {
            ".gaan"
        } else {
            "gaan"
        };

        let config_dir = config_parent.join(config_dir_name);
        let client_path = client_override.unwrap_or_else(|| config_dir.join("client"));

        std::fs::create_dir_all(&config_dir).with_context(|| {
            format!("Failed to create config directory {}", config_dir.display())
        })?;

        Ok(Self {
            config_parent,
            client_path,
            config_dir,
        })
    }

    /// Get the config directory
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get the config parent directory
    pub fn config_parent(&self) -> &Path {
        &self.config_parent
    }

    /// Get the client path
    pub fn client_path(&self) -> &Path {
        &self.client_path
    }

    /// Get the settings file path
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    /// Catalog location used when nothing else is configured
    pub fn default_catalog_path(&self) -> PathBuf {
        self.config_dir.join("music.csv")
    }
}

/// Check if a path is in the user's home directory
fn is_home_dir(path: &Path) -> bool {
    directories::UserDirs::new()
        .map(|dirs| path.starts_with(dirs.home_dir()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_creation() {
        let temp_dir = TempDir::new().unwrap();
        let config = Some(temp_dir.path().to_path_buf());

        // Note: Can't use init() in tests due to OnceCell
        let paths = Paths::new(config, None).unwrap();

        assert!(paths.config_dir().exists());
        assert_eq!(paths.config_parent(), temp_dir.path());
        assert_eq!(paths.settings_path(), paths.config_dir().join("settings.json"));
        assert_eq!(paths.default_catalog_path().file_name().unwrap(), "music.csv");
        assert!(paths.client_path().ends_with("client"));
    }

    #[test]
    fn test_client_override() {
        let temp_dir = TempDir::new().unwrap();
        let client = temp_dir.path().join("web");

        let paths = Paths::new(Some(temp_dir.path().to_path_buf()), Some(client.clone())).unwrap();
        assert_eq!(paths.client_path(), client.as_path());
    }
}
