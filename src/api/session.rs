//! Cookie-backed session lookup for the chat endpoints

use actix_web::cookie::{time::Duration as CookieDuration, Cookie};
use actix_web::{HttpRequest, HttpResponse};

use crate::config::SESSION_COOKIE;
use crate::stores::SessionStore;

/// The session a request belongs to
#[derive(Debug, Clone)]
pub struct SessionCookie {
    id: String,
    max_age_secs: i64,
}

impl SessionCookie {
    /// Reuse the live session named by the request's cookie, or start a new one
    pub fn from_request(req: &HttpRequest, sessions: &SessionStore) -> Self {
        let id = match req.cookie(SESSION_COOKIE) {
            Some(cookie) if sessions.contains(cookie.value()) => cookie.value().to_string(),
            _ => {
                let id = sessions.create();
                tracing::debug!("Started session {}", id);
                id
            }
        };

        Self {
            id,
            max_age_secs: sessions.ttl().num_seconds(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set (and refresh) the session cookie on a response
    pub fn attach(&self, mut resp: HttpResponse) -> HttpResponse {
        let cookie = Cookie::build(SESSION_COOKIE, self.id.clone())
            .path("/")
            .http_only(true)
            .max_age(CookieDuration::seconds(self.max_age_secs))
            .finish();

        if let Err(e) = resp.add_cookie(&cookie) {
            tracing::warn!("Failed to set session cookie: {}", e);
        }
        resp
    }
}

/// Cookie that makes the browser forget its session
pub fn expired_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .max_age(CookieDuration::seconds(0))
        .http_only(true)
        .finish()
}
