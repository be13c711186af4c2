//! Request-level errors and their JSON bodies

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::plugins::UpstreamError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No user input provided.")]
    MissingInput,

    #[error("Error generating response from the LLM")]
    Generation(#[source] UpstreamError),

    #[error("Missing url parameter")]
    MissingUrl,

    #[error("Upstream refused the audio request")]
    UpstreamForbidden,

    #[error("Failed to fetch audio: {0}")]
    Relay(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingInput | ApiError::MissingUrl => StatusCode::BAD_REQUEST,
            ApiError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UpstreamForbidden => StatusCode::FORBIDDEN,
            ApiError::Relay(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Generation(source) => serde_json::json!({
                "error": self.to_string(),
                "details": source.to_string(),
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
