use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use serde::de::Error as _;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::IntakeError;
use crate::fingerprint::lead_key;
use crate::metrics::{LEADS_ACCEPTED, LEADS_REJECTED, RATE_LIMIT_CLIENTS, REQUEST_TOTAL};
use crate::models::{LeadSubmission, NormalizedLead, SubmitResponse};
use crate::state::AppState;
use crate::validator;

const FORWARDED_FOR: &str = "x-forwarded-for";
const UNKNOWN_CLIENT: &str = "unknown";

// Client id = first x-forwarded-for hop, "unknown" when there is none
pub fn client_id(headers: &HeaderMap) -> &str {
    headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
}

// Body must be a JSON object; field types are checked by the validator
fn parse_submission(body: &[u8]) -> Result<LeadSubmission, IntakeError> {
    let value: Value = serde_json::from_slice(body).map_err(IntakeError::MalformedRequest)?;
    if !value.is_object() {
        return Err(IntakeError::MalformedRequest(serde_json::Error::custom(
            "lead submission must be a JSON object",
        )));
    }
    serde_json::from_value(value).map_err(IntakeError::MalformedRequest)
}

fn submit(state: &AppState, client: &str, body: &[u8]) -> Result<NormalizedLead, IntakeError> {
    let admitted = state.rate_limiter.check(client);
    RATE_LIMIT_CLIENTS.set(state.rate_limiter.len() as f64);
    if !admitted {
        return Err(IntakeError::RateLimitExceeded);
    }

    let submission = parse_submission(body)?;
    Ok(validator::validate(&submission)?)
}

pub async fn lead_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SubmitResponse>, IntakeError> {
    REQUEST_TOTAL.inc();
    let client = client_id(&headers);

    let lead = match submit(&state, client, &body) {
        Ok(lead) => lead,
        Err(e) => {
            LEADS_REJECTED.with_label_values(&[e.code()]).inc();
            match &e {
                IntakeError::RateLimitExceeded => warn!(client, "lead submission rate limited"),
                other => info!(client, reason = other.code(), "lead submission rejected"),
            }
            return Err(e);
        }
    };

    LEADS_ACCEPTED.inc();

    // no CRM or mail hookup, the log line is the hand-off
    info!(
        lead_id = %lead_key(&lead),
        company = %lead.company,
        email = %lead.email,
        description = %lead.description,
        offer_expires = ?lead.offer_expires,
        submitted_at = %lead.submitted_at,
        client,
        "new lead submission"
    );

    Ok(Json(SubmitResponse {
        success: true,
        message: "Lead submitted successfully".to_string(),
    }))
}
