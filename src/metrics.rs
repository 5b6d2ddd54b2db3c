use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Gauge, register_counter, register_counter_vec, register_gauge,
};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("lead_requests_total", "Total number of lead submissions received").unwrap();
    pub static ref LEADS_ACCEPTED: Counter =
        register_counter!("lead_accepted_total", "Lead submissions that passed validation").unwrap();
    pub static ref LEADS_REJECTED: CounterVec = register_counter_vec!(
        "lead_rejected_total",
        "Lead submissions rejected, by reason",
        &["reason"]
    )
    .unwrap();
    pub static ref RATE_LIMIT_CLIENTS: Gauge =
        register_gauge!("lead_rate_limit_clients", "Client ids currently tracked by the rate limiter").unwrap();
}
