use sha2::{Digest, Sha256};
use crate::models::NormalizedLead;

// Correlation key for a lead (hash of company + lowercased email)
pub fn lead_key(lead: &NormalizedLead) -> String {
    let mut hasher = Sha256::new();
    hasher.update(lead.company.as_bytes());
    hasher.update([0u8]);
    hasher.update(lead.email.to_lowercase().as_bytes());
    format!("{:x}", hasher.finalize())
}
