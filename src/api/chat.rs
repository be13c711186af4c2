//! Chat API routes

use actix_web::{get, post, route, web, HttpRequest, HttpResponse, Responder, ResponseError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, warn};

use super::session::{expired_cookie, SessionCookie};
use super::{ApiError, AppState};
use crate::config::SESSION_COOKIE;
use crate::core::conversation::{self, ConversationEngine, NextSong, Reply, GREETING_REPLY};
use crate::core::prompt::{conversation_prompt, recommendation_prompt};
use crate::models::SessionContext;
use crate::plugins::UpstreamError;

const NO_SONGS: &str = "No songs in the queue. Please request some songs first!";
const END_OF_LIST: &str = "You've reached the end of the song list. Want more recommendations?";

/// Chat request body
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub user_input: String,
    /// The user answered "yes" to the last follow-up question
    #[serde(default)]
    pub is_affirmation: bool,
}

/// Song announced by /next_song
#[derive(Debug, Serialize)]
struct NowPlaying<'a> {
    song_name: &'a str,
    artist_name: &'a str,
    audio_url: &'a str,
}

/// Answer a chat message or an affirmation
#[post("/chat")]
pub async fn chat(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<ChatRequest>,
) -> impl Responder {
    let session = SessionCookie::from_request(&req, &state.sessions);
    let user_input = body.user_input.trim();

    if user_input.is_empty() && !body.is_affirmation {
        return session.attach(ApiError::MissingInput.error_response());
    }

    let mut ctx = state.sessions.load(session.id());
    let engine = ConversationEngine::new(&state.catalog, &state.index);

    if body.is_affirmation {
        debug!("Affirmation for session {}: {:?}", session.id(), ctx);
        let turn = engine.handle_affirmation(&mut ctx, &mut rand::thread_rng());
        let song = prepare_first_song(&state, &mut ctx).await;

        let resp = HttpResponse::Ok().json(json!({
            "response": turn.message,
            "suggestions": ctx.recommended_songs,
            "song": song,
        }));
        state.sessions.save(session.id(), ctx);
        return session.attach(resp);
    }

    let reply = engine.respond(&mut ctx, user_input, &mut rand::thread_rng());
    let resp = match reply {
        Reply::Greeting => HttpResponse::Ok().json(json!({ "response": GREETING_REPLY })),
        Reply::SmallTalk => match state.generator.generate(&conversation_prompt(user_input)).await {
            Ok(text) => HttpResponse::Ok().json(json!({
                "response": text,
                "suggestions": [],
                "song": {},
            })),
            Err(e) => generation_failed(e),
        },
        Reply::Recommendation(turn) => {
            let song = prepare_first_song(&state, &mut ctx).await;
            let prompt = recommendation_prompt(
                user_input,
                turn.entities.artist.as_deref(),
                turn.entities.mood.as_deref(),
                turn.entities.language.as_deref(),
                &ctx.recommended_songs,
                &turn.follow_up,
            );
            let suggestions = ctx.recommended_songs.clone();
            // the new batch is kept even if the reply text cannot be generated
            state.sessions.save(session.id(), ctx);

            match state.generator.generate(&prompt).await {
                Ok(text) => HttpResponse::Ok().json(json!({
                    "response": text,
                    "suggestions": suggestions,
                    "song": song,
                })),
                Err(e) => generation_failed(e),
            }
        }
    };

    session.attach(resp)
}

/// Step to the next song of the current batch
#[get("/next_song")]
pub async fn next_song(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    let session = SessionCookie::from_request(&req, &state.sessions);
    let mut ctx = state.sessions.load(session.id());

    let resp = match conversation::next_song(&mut ctx) {
        NextSong::Empty => HttpResponse::BadRequest().json(json!({ "response": NO_SONGS })),
        NextSong::EndOfList => HttpResponse::Ok().json(json!({ "response": END_OF_LIST })),
        NextSong::Track { index, track } => {
            let url = match &track.audio_url {
                Some(url) => url.clone(),
                None => resolve_audio(&state, &track.song_name, &track.artist_name).await,
            };
            ctx.set_audio_url(index, &url);

            let song = NowPlaying {
                song_name: &track.song_name,
                artist_name: &track.artist_name,
                audio_url: &url,
            };
            HttpResponse::Ok().json(json!({
                "response": format!("Next song: {} by {}", track.song_name, track.artist_name),
                "song": song,
            }))
        }
    };

    state.sessions.save(session.id(), ctx);
    session.attach(resp)
}

/// Forget the session and its cookie
#[route("/logout", method = "GET", method = "POST")]
pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        state.sessions.remove(cookie.value());
    }

    HttpResponse::Ok()
        .cookie(expired_cookie())
        .json(json!({ "msg": "Logged out" }))
}

/// Clear the conversation context but keep the session
#[post("/reset")]
pub async fn reset(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    let session = SessionCookie::from_request(&req, &state.sessions);
    state.sessions.reset(session.id());

    session.attach(HttpResponse::Ok().json(json!({ "msg": "Session reset" })))
}

// helpers

/// Resolve audio for the head of the batch and remember it in the session
async fn prepare_first_song(state: &AppState, ctx: &mut SessionContext) -> serde_json::Value {
    match ctx.recommended_songs.first_mut() {
        Some(first) => {
            let url = resolve_audio(state, &first.song_name, &first.artist_name).await;
            first.audio_url = Some(url);
            json!(first)
        }
        None => json!({}),
    }
}

async fn resolve_audio(state: &AppState, song_name: &str, artist_name: &str) -> String {
    match state.resolver.resolve(song_name, artist_name).await {
        Ok(url) => url,
        Err(e) => {
            warn!("Audio resolution failed for '{}' by '{}': {}", song_name, artist_name, e);
            state.fallback_audio_url.clone()
        }
    }
}

fn generation_failed(e: UpstreamError) -> HttpResponse {
    error!("Text generation failed: {}", e);
    ApiError::Generation(e).error_response()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(chat)
        .service(next_song)
        .service(logout)
        .service(reset);
}
