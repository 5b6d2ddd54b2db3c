// Lead intake service: POST /api/lead behind a per-client fixed-window
// rate limiter, plus health and metrics routes.

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod state;
pub mod validator;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

pub use error::IntakeError;
pub use models::{LeadSubmission, NormalizedLead};
pub use rate_limit::RateLimiter;
pub use state::AppState;
pub use validator::{ValidationError, validate};

// router with all routes
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api/lead", post(handlers::lead_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(state)
}
