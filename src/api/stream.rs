//! Audio relay API routes
//!
//! Resolved stream urls usually refuse cross-origin browser requests, so the
//! client plays them through this relay. Range requests are forwarded to keep
//! seeking working.

use actix_web::http::{header, StatusCode};
use actix_web::{get, web, HttpRequest, HttpResponse};
use futures::TryStreamExt;
use serde::Deserialize;

use super::{ApiError, AppState};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const REFERER: &str = "https://www.youtube.com/";
const DEFAULT_CONTENT_TYPE: &str = "audio/mpeg";

/// Upstream headers passed through to the client.
///
/// Content-Length is set separately so the body is not chunked.
const RELAYED_HEADERS: [&str; 3] = ["content-range", "accept-ranges", "content-disposition"];

/// Relay query parameters
#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

/// Stream remote audio through the server
#[get("/proxy_audio")]
pub async fn proxy_audio(
    req: HttpRequest,
    query: web::Query<ProxyQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let url = query
        .url
        .as_deref()
        .filter(|url| !url.is_empty())
        .ok_or(ApiError::MissingUrl)?;

    let mut upstream = state
        .http
        .get(url)
        .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
        .header(reqwest::header::REFERER, REFERER);

    if let Some(range) = req
        .headers()
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
    {
        upstream = upstream.header(reqwest::header::RANGE, range);
    }

    let resp = upstream.send().await.map_err(|e| {
        tracing::warn!("Audio relay request failed: {}", e);
        ApiError::Relay(e.to_string())
    })?;

    let status = resp.status();
    if status == reqwest::StatusCode::FORBIDDEN {
        return Err(ApiError::UpstreamForbidden);
    }

    let mut builder =
        HttpResponse::build(StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY));

    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();
    builder
        .content_type(content_type)
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        // Compress leaves responses with an explicit encoding alone
        .insert_header((header::CONTENT_ENCODING, "identity"))
        .insert_header((header::ACCEPT_RANGES, "bytes"));

    for (name, value) in relayed_headers(resp.headers()) {
        builder.insert_header((name, value));
    }

    if let Some(len) = resp.content_length() {
        builder.no_chunking(len);
    }

    let body = resp.bytes_stream().map_err(|e| {
        tracing::warn!("Audio relay interrupted: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    });

    Ok(builder.streaming(body))
}

/// Pick the headers the client needs for seeking and downloads
fn relayed_headers(headers: &reqwest::header::HeaderMap) -> Vec<(&'static str, String)> {
    RELAYED_HEADERS
        .iter()
        .filter_map(|name| {
            headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .map(|v| (*name, v.to_string()))
        })
        .collect()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(proxy_audio);
}
