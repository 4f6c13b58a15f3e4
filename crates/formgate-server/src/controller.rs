// File: src/controller.rs
// Purpose: Login form handlers

use crate::request::FormRequest;
use crate::response::ValidationErrorResponse;
use crate::views;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use formgate::{MessageBag, RuleParseError, RuleSet, ValidationResult, Validator, Value};

/// `username` and `password` are both required
pub fn login_validator() -> Result<Validator, RuleParseError> {
    let rules = RuleSet::parse([("username", "required"), ("password", "required")])?;
    Ok(Validator::new(rules))
}

/// POST /form/login
pub async fn login(
    State(state): State<AppState>,
    form: FormRequest,
) -> Result<(StatusCode, &'static str), ValidationErrorResponse> {
    state.login.validate(form.data()).into_result()?;
    Ok((StatusCode::OK, "OK"))
}

/// GET /form
pub async fn form() -> Html<String> {
    Html(views::login_form(&MessageBag::new(), &Value::object()).into_string())
}

/// POST /form
pub async fn submit_form(State(state): State<AppState>, form: FormRequest) -> Response {
    match state.login.validate(form.data()) {
        ValidationResult::Valid(valid) => {
            let username = valid.get_path("username").map(|v| v.to_string()).unwrap_or_default();
            tracing::info!(username = %username, "Login form accepted");
            Html(views::login_succeeded(&username).into_string()).into_response()
        }
        ValidationResult::Invalid(errors) if form.accepts_json() => {
            ValidationErrorResponse::new(errors).into_response()
        }
        ValidationResult::Invalid(errors) => {
            tracing::info!(fields = errors.len(), "Login form rejected");
            (
                StatusCode::BAD_REQUEST,
                Html(views::login_form(&errors, form.data()).into_string()),
            )
                .into_response()
        }
    }
}
