mod health;
mod lead;
mod metrics;

pub use health::health_handler;
pub use lead::{client_id, lead_handler};
pub use metrics::metrics_handler;
