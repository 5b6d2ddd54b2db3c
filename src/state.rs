use crate::rate_limit::RateLimiter;
use std::sync::Arc;

// app's shared state
pub struct AppState {
    pub rate_limiter: Arc<RateLimiter>, // shared with the sweeper task
}

impl AppState {
    pub fn new(rate_limiter: Arc<RateLimiter>) -> Self {
        Self { rate_limiter }
    }
}
