//! The seam between the session core and the external generation service.
//!
//! The session core never talks to the model runtime directly; it goes
//! through the [`Generator`] trait, which a real HTTP client implements
//! in production and a mock implements in tests.

use std::future::Future;

use crate::error::Result;
use crate::prompts::{GenOptions, ModelRole};

/// A client for the external generation service.
///
/// Implementations resolve a [`ModelRole`] to a concrete model
/// identifier and issue the request. Futures must be `Send` so handlers
/// can await them on a multi-threaded runtime.
pub trait Generator: Send + Sync {
    /// Generates text from a prompt using the model behind `role`.
    fn generate(
        &self,
        role: ModelRole,
        prompt: &str,
        options: GenOptions,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Describes an image using the vision model.
    ///
    /// `image` is the raw encoded image bytes (PNG or JPEG).
    fn describe(&self, prompt: &str, image: &[u8]) -> impl Future<Output = Result<String>> + Send;
}
