//! Error types for generation operations

use provider::Failure;

/// Every way a generation call can fail.
///
/// `QuotaExceeded`, `PermissionDenied` and `Transport` carry the upstream
/// failure unchanged so its message reaches the caller verbatim.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no API keys configured")]
    PoolEmpty,

    /// Quota failure on the last key tried.
    #[error("{0}")]
    QuotaExceeded(Failure),

    #[error("{0}")]
    PermissionDenied(Failure),

    /// Synthesis call hit a key without access to the image model.
    #[error("PRO_KEY_REQUIRED")]
    ProKeyRequired,

    /// Upstream answered but carried no image.
    #[error("Synthesis failed.")]
    EmptySynthesis,

    /// Upstream answered but carried no text.
    #[error("model returned no text")]
    EmptyText,

    #[error("{0}")]
    Transport(Failure),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid image reference: {0}")]
    InvalidImage(String),

    #[error("gallery store error: {0}")]
    Gallery(String),
}

impl From<key_pool::Error> for Error {
    fn from(err: key_pool::Error) -> Self {
        match err {
            key_pool::Error::PoolEmpty => Error::PoolEmpty,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_messages_pass_through_verbatim() {
        let err = Error::Transport(Failure::http(500, "Internal error encountered."));
        assert_eq!(err.to_string(), "Internal error encountered.");
    }

    #[test]
    fn pro_key_required_displays_signal() {
        assert_eq!(
            Error::ProKeyRequired.to_string(),
            crate::constants::PRO_KEY_REQUIRED
        );
    }

    #[test]
    fn pool_empty_converts_from_pool_error() {
        let err: Error = key_pool::Error::PoolEmpty.into();
        assert!(matches!(err, Error::PoolEmpty));
    }
}
