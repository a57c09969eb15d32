//! Credential pool for the generative model service
//!
//! Holds an ordered set of interchangeable API keys and one shared cursor
//! naming the active key. Rotation is plain round-robin with no memory of
//! which keys failed: a retry sequence may come back to a key that is still
//! rate-limited. The pool never evicts keys.
//!
//! Also owns failure classification, which decides whether a failed call
//! should rotate to the next key.

pub mod classify;
pub mod error;
pub mod pool;

pub use classify::classify_failure;
pub use error::{Error, Result};
pub use pool::CredentialPool;
