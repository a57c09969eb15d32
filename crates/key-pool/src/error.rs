//! Error types for pool operations

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No credentials were configured. Fatal: no call can be made.
    #[error("credential pool is empty: configure GEMINI_API_KEY or a credentials file")]
    PoolEmpty,
}

pub type Result<T> = std::result::Result<T, Error>;
