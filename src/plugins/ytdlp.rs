//! Audio url resolution through yt-dlp

use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use super::{AudioResolver, UpstreamError};
use crate::config::YtDlpConfig;

/// Runs `yt-dlp --get-url` against a search for the song
pub struct YtDlpResolver {
    binary: String,
    timeout: Duration,
}

impl YtDlpResolver {
    pub fn new(config: &YtDlpConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn args(song_name: &str, artist_name: &str) -> Vec<String> {
        vec![
            format!("ytsearch1:{} {}", song_name, artist_name),
            "--get-url".to_string(),
            "-f".to_string(),
            "bestaudio".to_string(),
            "--no-playlist".to_string(),
        ]
    }
}

#[async_trait]
impl AudioResolver for YtDlpResolver {
    async fn resolve(&self, song_name: &str, artist_name: &str) -> Result<String, UpstreamError> {
        debug!("Resolving audio for '{}' by '{}'", song_name, artist_name);

        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.binary)
                .args(Self::args(song_name, artist_name))
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| UpstreamError::Timeout(self.timeout))?
        .map_err(|source| UpstreamError::Spawn {
            program: self.binary.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(UpstreamError::ProcessFailed {
                program: self.binary.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        first_url(&String::from_utf8_lossy(&output.stdout)).ok_or(UpstreamError::Empty)
    }
}

fn first_url(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
