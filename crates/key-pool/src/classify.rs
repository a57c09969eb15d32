//! Failure classification for upstream responses
//!
//! All matching rules live here so that a change in the upstream's error
//! wording touches one function. Matching is case-insensitive and checks the
//! status code first, then the message.
//!
//! Quota is checked before permission: a message mentioning both is a quota
//! failure and rotates.
//!
//! "Requested entity was not found." is treated as a permission failure. The
//! upstream uses it both for missing models and for keys on a tier without
//! access to the model.

use provider::{ErrorClassification, Failure};

/// Message fragments that mean the key has run out of call volume.
const QUOTA_PATTERNS: &[&str] = &["429", "quota", "exhausted"];

/// Message fragments that mean the key may not use the model.
const PERMISSION_PATTERNS: &[&str] = &["permission", "403", "requested entity was not found"];

/// Classify one failed call.
pub fn classify_failure(failure: &Failure) -> ErrorClassification {
    match failure.status {
        Some(429) => return ErrorClassification::QuotaExceeded,
        Some(403) => return ErrorClassification::PermissionDenied,
        _ => {}
    }

    let lower = failure.message.to_lowercase();
    if QUOTA_PATTERNS.iter().any(|p| lower.contains(p)) {
        return ErrorClassification::QuotaExceeded;
    }
    if PERMISSION_PATTERNS.iter().any(|p| lower.contains(p)) {
        return ErrorClassification::PermissionDenied;
    }
    ErrorClassification::Other
}
