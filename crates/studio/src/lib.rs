//! Image generation core for Luminary
//!
//! Turns a validated `GenerationRequest` into images through the hosted model,
//! rotating API keys on quota failures. The pieces, leaves first:
//!
//! 1. `Executor` runs one logical call: pick the active key, send, map the
//!    response, rotate and resend on quota failures (at most one attempt per key)
//! 2. `enhance` expands a short prompt; it never fails and falls back to the input
//! 3. `synthesize` produces one data-URI image, translating permission failures
//!    into `Error::ProKeyRequired`
//! 4. `Studio` bundles the above with model names and fans out batches
//! 5. `Gallery` keeps the latest batch on disk under a fixed key

pub mod constants;
pub mod enhance;
pub mod error;
pub mod executor;
pub mod gallery;
pub mod inspiration;
pub mod service;
pub mod synthesize;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use constants::*;
pub use enhance::enhance;
pub use error::{Error, Result};
pub use executor::{Executor, Operation};
pub use gallery::{Gallery, download_filename};
pub use inspiration::random_inspiration;
pub use service::{Models, Studio};
pub use synthesize::{build_prompt, synthesize};
pub use types::{
    AspectRatio, GenerationRequest, GenerationResult, ImageParams, ImageReference, ImageStyle,
};
