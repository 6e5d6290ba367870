use axum::{ http::StatusCode, response::{ IntoResponse, Response }, Json };
use log::error;
use thiserror::Error;

use crate::models::chat::ChatResponse;

/// The only failure text a caller ever sees.
pub const GENERIC_ERROR_MESSAGE: &str = "Failed to process your request";

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid chat request: {0}")]
    InvalidRequest(String),

    #[error("provider returned {status}")]
    ProviderStatus {
        status: reqwest::StatusCode,
    },

    #[error("provider request failed: {0}")]
    Transport(reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

// The provider URL carries the API key as a query parameter.
impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        ProxyError::Transport(err.without_url())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        error!("Chat request failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ChatResponse::Failure {
                error: GENERIC_ERROR_MESSAGE.to_string(),
            }),
        ).into_response()
    }
}
