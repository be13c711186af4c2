//! Configuration module for gaan
//!
//! This module contains the application configuration structures and path management.

mod app_config;
mod paths;

pub use app_config::{cohere_api_key, AppConfig, GenerationConfig, YtDlpConfig};
pub use paths::Paths;

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "gaan_session";
