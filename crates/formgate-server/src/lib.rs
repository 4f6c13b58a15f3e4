// formgate-server - login form service
// Validates submissions with formgate and answers with text, JSON or Maud HTML

pub mod config;
pub mod controller;
pub mod request;
pub mod response;
pub mod views;

use axum::routing::{get, post};
use axum::Router;
use formgate::{RuleParseError, Validator};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub login: Arc<Validator>,
}

impl AppState {
    pub fn new() -> Result<Self, RuleParseError> {
        Ok(Self {
            login: Arc::new(controller::login_validator()?),
        })
    }
}

/// Build the router with its routes and request tracing
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/form/login", post(controller::login))
        .route("/form", get(controller::form).post(controller::submit_form))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
