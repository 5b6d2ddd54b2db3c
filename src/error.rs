use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;
use crate::validator::ValidationError;

// Everything that can end a lead submission early
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Too many requests. Please try again later.")]
    RateLimitExceeded,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    // parse details stay in the log
    #[error("Internal server error")]
    MalformedRequest(#[source] serde_json::Error),
}

impl IntakeError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::MalformedRequest(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // label for the rejection counter
    pub fn code(&self) -> &'static str {
        match self {
            Self::RateLimitExceeded => "rate_limited",
            Self::Invalid(e) => e.code(),
            Self::MalformedRequest(_) => "malformed",
        }
    }
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        if let Self::MalformedRequest(e) = &self {
            error!(error = %e, "could not parse lead submission body");
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
