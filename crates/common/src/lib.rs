//! Shared building blocks for the Luminary workspace: the redacting
//! `Secret` wrapper used for API keys and the configuration error type.

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
