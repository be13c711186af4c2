//! External collaborators used by the chat endpoints
//!
//! Text generation and audio resolution sit behind traits so handlers can be
//! exercised with in-process fakes.

pub mod cohere;
pub mod ytdlp;

pub use cohere::CohereGenerator;
pub use ytdlp::YtDlpResolver;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failure of an external collaborator
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    ProcessFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("empty response")]
    Empty,
}

/// Produces the natural-language part of a chat reply
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError>;
}

/// Finds a playable stream url for a song
#[async_trait]
pub trait AudioResolver: Send + Sync {
    async fn resolve(&self, song_name: &str, artist_name: &str) -> Result<String, UpstreamError>;
}
