//! gaan - a conversational music recommendation server
//!
//! Users chat in free text; the server extracts artists, moods, languages,
//! albums and song titles from each message, picks matching tracks from a
//! CSV catalog and answers with a generated reply and a playable stream.

mod api;
mod config;
mod core;
mod models;
mod plugins;
mod stores;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::api::AppState;
use crate::config::{AppConfig, Paths};
use crate::plugins::{CohereGenerator, YtDlpResolver};
use crate::stores::{Catalog, SessionStore};

/// gaan - conversational music recommendations
#[derive(Parser, Debug)]
#[command(name = "gaan")]
#[command(version)]
#[command(about = "A chat server that recommends and streams music from a CSV catalog")]
struct Args {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Enable debug mode
    #[arg(long)]
    debug: bool,

    /// Path to config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to web client
    #[arg(long)]
    client: Option<PathBuf>,

    /// Path to the catalog CSV file
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    info!("gaan v{} starting...", env!("CARGO_PKG_VERSION"));

    // Initialize paths
    let paths = config::Paths::init(args.config, args.client)?;
    info!("Config directory: {:?}", paths.config_dir());

    start_gaan(args.host, args.port, args.catalog, &paths).await
}

async fn start_gaan(host: String, port: u16, catalog: Option<PathBuf>, paths: &Paths) -> Result<()> {
    let config = AppConfig::load()?;
    let api_key = config::cohere_api_key()?;

    // Load the catalog into memory
    let catalog_path = config.resolve_catalog_path(catalog, paths);
    info!("Loading catalog from {:?}...", catalog_path);
    let catalog = Catalog::load_csv(&catalog_path)
        .with_context(|| format!("Could not load the music catalog at {:?}", catalog_path))?;
    if catalog.is_empty() {
        tracing::warn!("Catalog is empty, every request will get empty suggestions");
    }

    let sessions = Arc::new(SessionStore::new(config.session_ttl_minutes));
    let state = AppState::new(
        Arc::new(catalog),
        Arc::clone(&sessions),
        Arc::new(CohereGenerator::new(api_key, &config.generation)),
        Arc::new(YtDlpResolver::new(&config.ytdlp)),
        config.fallback_audio_url.clone(),
    );
    info!(
        "Reference index ready: {} artists, {} albums, {} songs",
        state.index.artists().len(),
        state.index.albums().len(),
        state.index.song_names().len()
    );
    let state = actix_web::web::Data::new(state);

    // Start background tasks
    info!("Starting background tasks...");
    core::crons::start_cron_jobs(sessions, Duration::from_secs(config.session_sweep_secs));

    let client_path = paths.client_path().to_path_buf();
    let serve_client = client_path.join("index.html").exists();
    if serve_client {
        info!("Serving web client from {:?}", client_path);
    }

    // Start the server
    let addr = format!("{}:{}", host, port);
    info!("Server listening on http://{}", addr);

    use actix_cors::Cors;
    use actix_web::{middleware, App, HttpServer};

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        let mut app = App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(api::configure);

        if serve_client {
            app = app.service(
                actix_files::Files::new("/", client_path.clone()).index_file("index.html"),
            );
        }

        app
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
