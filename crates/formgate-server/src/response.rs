// File: src/response.rs
// Purpose: Map failed validation onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use formgate::{MessageBag, ValidationFailure};

/// 400 response carrying the field -> messages map as JSON
#[derive(Debug)]
pub struct ValidationErrorResponse {
    errors: MessageBag,
}

impl ValidationErrorResponse {
    pub fn new(errors: MessageBag) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &MessageBag {
        &self.errors
    }
}

impl From<ValidationFailure> for ValidationErrorResponse {
    fn from(failure: ValidationFailure) -> Self {
        Self::new(failure.into_errors())
    }
}

impl IntoResponse for ValidationErrorResponse {
    fn into_response(self) -> Response {
        tracing::info!(
            errors = %serde_json::to_string(&self.errors).unwrap_or_default(),
            "Rejected form submission"
        );
        (StatusCode::BAD_REQUEST, Json(self.errors)).into_response()
    }
}
