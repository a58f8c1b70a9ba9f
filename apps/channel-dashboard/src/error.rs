use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::render;

/// Terminal failure of a feed fetch. Data-quality issues never end up here.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to reach the feed API: {message}")]
    Transport { message: String },
    #[error("feed API responded with status {status} ({message})")]
    BadStatus { status: u16, message: String },
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn bad_status(status: u16, message: impl Into<String>) -> Self {
        Self::BadStatus {
            status,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::BadStatus { .. } => "bad_status",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { .. } => None,
            Self::BadStatus { status, .. } => Some(*status),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest embeds the full URL (query string included) in its Display impl.
        let err = err.without_url();
        if err.is_timeout() {
            return Self::transport(format!("request timed out ({err})"));
        }
        Self::transport(err.to_string())
    }
}

/// How a failed request is answered: an HTML page for the dashboard view,
/// a JSON body for the API.
#[derive(Debug)]
pub enum AppError {
    Page(FetchError),
    Api(FetchError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Page(err) => {
                (StatusCode::BAD_GATEWAY, Html(render::error_page(&err))).into_response()
            }
            Self::Api(err) => {
                let body = json!({
                    "error": err.kind(),
                    "status": err.status(),
                    "message": err.to_string(),
                });
                (StatusCode::BAD_GATEWAY, Json(body)).into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_status_message_carries_the_code() {
        let err = FetchError::bad_status(404, "Not Found");
        assert_eq!(err.kind(), "bad_status");
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn transport_has_no_status() {
        let err = FetchError::transport("connection refused");
        assert_eq!(err.kind(), "transport");
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn page_error_is_bad_gateway() {
        let response = AppError::Page(FetchError::bad_status(500, "boom")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
