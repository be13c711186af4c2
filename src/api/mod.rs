//! REST API routes for gaan

pub mod chat;
pub mod errors;
pub mod session;
pub mod stream;

use actix_web::web;
use std::sync::Arc;
use std::time::Duration;

use crate::plugins::{AudioResolver, TextGenerator};
use crate::stores::{Catalog, ReferenceIndex, SessionStore};

pub use errors::ApiError;

/// Everything the handlers share
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub index: Arc<ReferenceIndex>,
    pub sessions: Arc<SessionStore>,
    pub generator: Arc<dyn TextGenerator>,
    pub resolver: Arc<dyn AudioResolver>,
    /// Stream url used when audio resolution fails
    pub fallback_audio_url: String,
    /// Client for the audio relay
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(
        catalog: Arc<Catalog>,
        sessions: Arc<SessionStore>,
        generator: Arc<dyn TextGenerator>,
        resolver: Arc<dyn AudioResolver>,
        fallback_audio_url: String,
    ) -> Self {
        let index = Arc::new(ReferenceIndex::build(&catalog));
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            catalog,
            index,
            sessions,
            generator,
            resolver,
            fallback_audio_url,
            http,
        }
    }
}

/// Configure all API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Chat routes
        .configure(chat::configure)
        // Audio relay
        .configure(stream::configure);
}
