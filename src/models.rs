use serde::{Deserialize, Serialize};
use serde_json::Value;

// Lead form payload. Fields stay raw JSON so wrong types surface as
// validation errors instead of parse errors.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct LeadSubmission {
    #[serde(default)]
    pub company: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub offer_expires: Option<Value>, // opaque, passed through
}

// Validated, trimmed lead ready to hand off
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct NormalizedLead {
    pub company: String,
    pub email: String,
    pub description: String,
    pub offer_expires: Option<Value>,
    pub submitted_at: String,
}

// Body for a successful submission
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

// Body for every failure
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ErrorResponse {
    pub error: String,
}
