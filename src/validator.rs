// Lead submission validation. Rules run in a fixed order and the first
// failure wins: company, email presence, email shape, description length.

use chrono::{DateTime, SecondsFormat, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::{LeadSubmission, NormalizedLead};

// measured in UTF-16 code units, the unit browsers count form input in
pub const MAX_DESCRIPTION_CHARS: usize = 250;

const BOM: char = '\u{FEFF}';

lazy_static! {
    // coarse shape check, not RFC 5322
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s\x{FEFF}@]+@[^\s\x{FEFF}@]+\.[^\s\x{FEFF}@]+$").unwrap();
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Company name is required")]
    MissingCompany,

    #[error("Email is required")]
    MissingEmail,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Description must be 250 characters or less")]
    DescriptionTooLong,
}

impl ValidationError {
    // short label for logs and metrics
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCompany => "missing_company",
            Self::MissingEmail => "missing_email",
            Self::InvalidEmail => "invalid_email",
            Self::DescriptionTooLong => "description_too_long",
        }
    }
}

// Validate and stamp with the current time
pub fn validate(input: &LeadSubmission) -> Result<NormalizedLead, ValidationError> {
    validate_at(input, Utc::now())
}

// validate() with an explicit submission time
pub fn validate_at(
    input: &LeadSubmission,
    now: DateTime<Utc>,
) -> Result<NormalizedLead, ValidationError> {
    let company = check_company(input.company.as_ref())?;
    let email = check_email_present(input.email.as_ref())?;
    let email = check_email_shape(email)?;
    let description = check_description(input.description.as_ref())?;

    Ok(NormalizedLead {
        company: company.to_string(),
        email: email.to_string(),
        description: description.to_string(),
        offer_expires: input.offer_expires.clone(),
        submitted_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

fn check_company(company: Option<&Value>) -> Result<&str, ValidationError> {
    match company {
        Some(Value::String(s)) if !trim(s).is_empty() => Ok(trim(s)),
        _ => {
            debug!(company = ?company, "company missing or blank");
            Err(ValidationError::MissingCompany)
        }
    }
}

fn check_email_present(email: Option<&Value>) -> Result<&str, ValidationError> {
    match email {
        Some(Value::String(s)) if !s.is_empty() => Ok(s),
        _ => Err(ValidationError::MissingEmail),
    }
}

fn check_email_shape(email: &str) -> Result<&str, ValidationError> {
    let email = trim(email);
    if EMAIL_RE.is_match(email) {
        Ok(email)
    } else {
        debug!(email, "email failed shape check");
        Err(ValidationError::InvalidEmail)
    }
}

// Absent or falsy (null, false, 0, "") means no description
fn check_description(description: Option<&Value>) -> Result<&str, ValidationError> {
    match description {
        None => Ok(""),
        Some(v) if !is_truthy(v) => Ok(""),
        Some(Value::String(s)) if s.encode_utf16().count() <= MAX_DESCRIPTION_CHARS => Ok(trim(s)),
        Some(_) => Err(ValidationError::DescriptionTooLong),
    }
}

// whitespace plus the byte order mark, like a browser's String.trim
fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == BOM)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
